//! The slow-inward-current (SIC) connection: a directed, weighted, delayed
//! link carrying a continuous current from an astrocyte to a neuron. The
//! connection is validated once against the capabilities of its endpoints,
//! then scales and forwards one event per delivery cycle. It is a pure
//! scale-and-forward stage: no clipping, no accumulation, no buffering.

use crate::error::{Result, SimError};
use crate::properties::{ConnectionStatus, StatusUpdate};
use crate::unit::Unit;
use event_lib::event::{Event, EventKind, SicEvent};
use std::fmt;
use std::mem;

/// How a link identifies and stores its bound target. The connection is
/// written once against this trait; kernels with other unit-addressing
/// schemes (arena indices, distributed ids) supply their own handle.
pub trait TargetHandle: Default {
    /// Record the resolved target and receptor port. Called once, by
    /// [`SicConnection::validate`].
    fn bind(&mut self, target: &dyn Unit, rport: usize);

    /// Routable identity of the bound target, if any.
    fn target(&self) -> Option<&str>;

    fn rport(&self) -> Option<usize>;

    fn is_bound(&self) -> bool {
        self.target().is_some() && self.rport().is_some()
    }
}

/// Identifies the bound target by unit name; the connector resolves the name
/// through its unit table at dispatch time.
#[derive(Clone, Debug, Default)]
pub struct NameHandle {
    target: Option<String>,
    rport: Option<usize>,
}

impl TargetHandle for NameHandle {
    fn bind(&mut self, target: &dyn Unit, rport: usize) {
        self.target = Some(target.whoami().to_string());
        self.rport = Some(rport);
    }

    fn target(&self) -> Option<&str> {
        self.target.as_deref()
    }

    fn rport(&self) -> Option<usize> {
        self.rport
    }
}

/// Common weighted/delayed link plumbing shared by connection kinds. Held by
/// value; connection kinds delegate to it instead of inheriting from it.
#[derive(Clone, Debug, Default)]
pub struct BaseLink<H: TargetHandle> {
    delay_steps: u64,
    target: H,
}

impl<H: TargetHandle> BaseLink<H> {
    pub fn new(delay_steps: u64) -> Self {
        BaseLink {
            delay_steps,
            target: H::default(),
        }
    }

    pub fn delay_steps(&self) -> u64 {
        self.delay_steps
    }

    pub fn handle(&self) -> &H {
        &self.target
    }

    pub fn handle_mut(&mut self) -> &mut H {
        &mut self.target
    }

    /// Fold the base fields into a status snapshot.
    pub fn status_into(&self, status: &mut ConnectionStatus) {
        status.delay_steps = self.delay_steps;
    }

    /// Apply the base portion of an update. Delay is fixed at construction,
    /// so an update naming it is rejected outright.
    pub fn apply(&mut self, update: &StatusUpdate) -> Result<()> {
        if update.delay_steps.is_some() {
            return Err(SimError::BadProperty(
                "delay is fixed at construction for this connection kind".to_string(),
            ));
        }
        Ok(())
    }
}

/// Construction-time parameters for a [`SicConnection`].
#[derive(Clone, Copy, Debug)]
pub struct ConnectionConfig {
    pub weight: f64,
    pub delay_steps: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        ConnectionConfig {
            weight: 1.0,
            delay_steps: 1,
        }
    }
}

pub struct SicConnection<H: TargetHandle = NameHandle> {
    base: BaseLink<H>,
    weight: f64,
}

impl<H: TargetHandle> fmt::Display for SicConnection<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let target = self.base.handle().target().unwrap_or("<unbound>");
        if let Some(width) = f.width() {
            write!(
                f,
                "{:width$}",
                &format!(
                    "SicConnection {{ weight : {}, delay : {}, target : {} }}",
                    self.weight,
                    self.base.delay_steps(),
                    target
                ),
                width = width
            )
        } else {
            write!(
                f,
                "SicConnection {{ weight : {}, delay : {}, target : {} }}",
                self.weight,
                self.base.delay_steps(),
                target
            )
        }
    }
}

impl<H: TargetHandle> SicConnection<H> {
    pub fn new(config: ConnectionConfig) -> Self {
        SicConnection {
            base: BaseLink::new(config.delay_steps),
            weight: config.weight,
        }
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn delay_steps(&self) -> u64 {
        self.base.delay_steps()
    }

    pub fn target(&self) -> Option<&str> {
        self.base.handle().target()
    }

    pub fn rport(&self) -> Option<usize> {
        self.base.handle().rport()
    }

    /// One-time capability negotiation, before any delivery.
    ///
    /// The source must emit SIC events; the target must accept them at the
    /// requested receptor, and names the concrete port to use. On success the
    /// target and port are bound into the handle. Nothing is sent, and a
    /// failed negotiation leaves the link unbound.
    pub fn validate(
        &mut self,
        source: &dyn Unit,
        target: &dyn Unit,
        receptor_type: usize,
    ) -> Result<()> {
        if self.base.handle().is_bound() {
            return Err(SimError::AlreadyBound {
                target: self.base.handle().target().unwrap_or("").to_string(),
            });
        }
        if !source.capabilities().emits(EventKind::SlowInwardCurrent) {
            return Err(SimError::EventTypeMismatch {
                unit: source.whoami().to_string(),
                kind: EventKind::SlowInwardCurrent,
            });
        }
        // Probe event carrying the prospective sender identity.
        let probe = Event::Sic(SicEvent::new(source.whoami(), 0.0));
        let rport = match target.capabilities().accept(&probe, receptor_type) {
            Some(rport) => rport,
            None => {
                return Err(SimError::IllegalConnection {
                    from: source.whoami().to_string(),
                    to: target.whoami().to_string(),
                    kind: EventKind::SlowInwardCurrent,
                    receptor: receptor_type,
                });
            }
        };
        self.base.handle_mut().bind(target, rport);
        log::debug!(
            "bound sic connection {0} -> {1} at port {2}",
            source.whoami(),
            target.whoami(),
            rport
        );
        Ok(())
    }

    /// Stamp an outgoing event for delivery at `step`: the link's current
    /// weight, its delay in steps, and the bound receiver and port, in that
    /// order. The caller dispatches the stamped event to the target.
    pub fn send(&self, event: &mut SicEvent, step: u64) -> Result<()> {
        let (target, rport) = match (self.base.handle().target(), self.base.handle().rport()) {
            (Some(target), Some(rport)) => (target, rport),
            _ => return Err(SimError::Unbound),
        };
        event.weight = self.weight;
        event.delay_steps = self.base.delay_steps();
        event.receiver = target.to_string();
        event.rport = rport;
        log::trace!(
            "step {0}: stamped sic event {1} -> {2}:{3}",
            step,
            event.sender(),
            target,
            rport
        );
        Ok(())
    }

    pub fn get_status(&self) -> ConnectionStatus {
        let mut status = ConnectionStatus::default();
        // Base fields first, so the snapshot always carries the delay.
        self.base.status_into(&mut status);
        status.weight = self.weight;
        status.size_of = mem::size_of::<Self>();
        status
    }

    /// Apply a property update. The base portion is applied first; a present
    /// weight then overwrites the link's weight. Every field is checked
    /// before anything is written, so a rejected update leaves the prior
    /// state untouched.
    pub fn set_status(&mut self, update: &StatusUpdate) -> Result<()> {
        self.base.apply(update)?;
        if let Some(weight) = update.weight {
            if !weight.is_finite() {
                return Err(SimError::BadProperty(format!(
                    "weight must be finite, got {}",
                    weight
                )));
            }
            self.weight = weight;
        }
        Ok(())
    }

    /// A fresh, empty instance of the event kind this link kind introduces.
    /// The kernel collects these at build time to learn which concrete event
    /// kinds exist in the network.
    pub fn secondary_event(&self) -> Event {
        Event::Sic(SicEvent::default())
    }
}

#[cfg(test)]
mod tests {
    // Note this useful idiom: importing names from outer (for mod tests) scope.
    use super::*;
    use crate::astrocyte::Astrocyte;
    use crate::neuron::Neuron;

    #[test]
    fn test_default_config() {
        let connection: SicConnection = SicConnection::new(ConnectionConfig::default());
        assert!(connection.weight() == 1.0);
        assert!(connection.delay_steps() == 1);
        assert!(connection.target().is_none());
    }

    #[test]
    fn test_validate_binds_target_and_port() {
        let astro = Astrocyte::new("astro", 1.0);
        let neuron = Neuron::new("n1", 2);
        let mut connection: SicConnection = SicConnection::new(ConnectionConfig::default());
        connection.validate(&astro, &neuron, 1).unwrap();
        assert!(connection.target() == Some("n1"));
        assert!(connection.rport() == Some(1));
    }

    #[test]
    fn test_validate_rejects_non_emitting_source() {
        let n1 = Neuron::new("n1", 1);
        let n2 = Neuron::new("n2", 1);
        let mut connection: SicConnection = SicConnection::new(ConnectionConfig::default());
        let err = connection.validate(&n1, &n2, 0).unwrap_err();
        assert!(
            err == SimError::EventTypeMismatch {
                unit: "n1".to_string(),
                kind: EventKind::SlowInwardCurrent,
            }
        );
        assert!(connection.target().is_none());
    }

    #[test]
    fn test_validate_rejects_non_accepting_target() {
        let astro1 = Astrocyte::new("astro1", 1.0);
        let astro2 = Astrocyte::new("astro2", 1.0);
        let mut connection: SicConnection = SicConnection::new(ConnectionConfig::default());
        let err = connection.validate(&astro1, &astro2, 0).unwrap_err();
        assert!(
            err == SimError::IllegalConnection {
                from: "astro1".to_string(),
                to: "astro2".to_string(),
                kind: EventKind::SlowInwardCurrent,
                receptor: 0,
            }
        );
        // A refused negotiation must leave the link unbound.
        assert!(connection.target().is_none());
        assert!(connection.rport().is_none());
    }

    #[test]
    fn test_validate_rejects_missing_receptor() {
        let astro = Astrocyte::new("astro", 1.0);
        let neuron = Neuron::new("n1", 1);
        let mut connection: SicConnection = SicConnection::new(ConnectionConfig::default());
        assert!(connection.validate(&astro, &neuron, 5).is_err());
        assert!(connection.target().is_none());
    }

    #[test]
    fn test_second_validate_is_rejected() {
        let astro = Astrocyte::new("astro", 1.0);
        let neuron = Neuron::new("n1", 1);
        let mut connection: SicConnection = SicConnection::new(ConnectionConfig::default());
        connection.validate(&astro, &neuron, 0).unwrap();
        let err = connection.validate(&astro, &neuron, 0).unwrap_err();
        assert!(
            err == SimError::AlreadyBound {
                target: "n1".to_string(),
            }
        );
        // The original binding survives.
        assert!(connection.target() == Some("n1"));
    }

    #[test]
    fn test_send_before_validate_is_rejected() {
        let connection: SicConnection = SicConnection::new(ConnectionConfig::default());
        let mut event = SicEvent::new("astro", 3.0);
        assert!(connection.send(&mut event, 0).unwrap_err() == SimError::Unbound);
    }

    #[test]
    fn test_send_stamps_in_order() {
        let astro = Astrocyte::new("astro", 1.0);
        let neuron = Neuron::new("n1", 2);
        let mut connection: SicConnection = SicConnection::new(ConnectionConfig {
            weight: 2.0,
            delay_steps: 3,
        });
        connection.validate(&astro, &neuron, 1).unwrap();

        let mut event = SicEvent::new("astro", 3.0);
        connection.send(&mut event, 7).unwrap();
        assert!(event.weight == 2.0);
        assert!(event.delay_steps == 3);
        assert!(event.receiver == "n1");
        assert!(event.rport == 1);
        // The payload itself is untouched; the receiver observes the product.
        assert!(event.amplitude() == 3.0);
        assert!(event.observed_amplitude() == 6.0);
    }

    #[test]
    fn test_send_is_linear_in_weight() {
        let astro = Astrocyte::new("astro", 1.0);
        let neuron = Neuron::new("n1", 1);
        let mut connection: SicConnection = SicConnection::new(ConnectionConfig::default());
        connection.validate(&astro, &neuron, 0).unwrap();

        connection.set_status(&StatusUpdate::weight(-1.0)).unwrap();
        let mut event = SicEvent::new("astro", 3.0);
        connection.send(&mut event, 0).unwrap();
        assert!(event.observed_amplitude() == -3.0);
    }

    #[test]
    fn test_status_roundtrip() {
        let mut connection: SicConnection = SicConnection::new(ConnectionConfig::default());
        connection.set_status(&StatusUpdate::weight(2.5)).unwrap();
        let status = connection.get_status();
        assert!(status.weight == 2.5);
        assert!(status.delay_steps == 1);
        assert!(status.size_of == mem::size_of::<SicConnection>());
    }

    #[test]
    fn test_reapplying_snapshot_is_idempotent() {
        let mut connection: SicConnection = SicConnection::new(ConnectionConfig {
            weight: 4.0,
            delay_steps: 2,
        });
        let before = connection.get_status();
        connection.set_status(&before.as_update()).unwrap();
        assert!(connection.get_status() == before);
    }

    #[test]
    fn test_delay_update_is_rejected() {
        let mut connection: SicConnection = SicConnection::new(ConnectionConfig::default());
        let update = StatusUpdate {
            weight: Some(9.0),
            delay_steps: Some(5),
        };
        assert!(connection.set_status(&update).is_err());
        // Rejection applies to the whole update, never partially.
        assert!(connection.weight() == 1.0);
        assert!(connection.delay_steps() == 1);
    }

    #[test]
    fn test_non_finite_weight_is_rejected() {
        let mut connection: SicConnection = SicConnection::new(ConnectionConfig::default());
        assert!(connection
            .set_status(&StatusUpdate::weight(f64::NAN))
            .is_err());
        assert!(connection.weight() == 1.0);
    }

    #[test]
    fn test_secondary_event_kind() {
        let connection: SicConnection = SicConnection::new(ConnectionConfig::default());
        let event = connection.secondary_event();
        assert!(event.kind() == EventKind::SlowInwardCurrent);
        assert!(event.sender() == "");
    }

    // A handle that counts bind calls, standing in for a kernel with its own
    // target-addressing scheme. The connection compiles against it unchanged.
    #[derive(Default)]
    struct CountingHandle {
        inner: NameHandle,
        binds: usize,
    }

    impl TargetHandle for CountingHandle {
        fn bind(&mut self, target: &dyn Unit, rport: usize) {
            self.binds += 1;
            self.inner.bind(target, rport);
        }
        fn target(&self) -> Option<&str> {
            self.inner.target()
        }
        fn rport(&self) -> Option<usize> {
            self.inner.rport()
        }
    }

    #[test]
    fn test_connection_is_generic_over_handles() {
        let astro = Astrocyte::new("astro", 1.0);
        let neuron = Neuron::new("n1", 1);
        let mut connection: SicConnection<CountingHandle> =
            SicConnection::new(ConnectionConfig::default());
        connection.validate(&astro, &neuron, 0).unwrap();
        assert!(connection.validate(&astro, &neuron, 0).is_err());
        assert!(connection.base.handle().binds == 1);
    }
}
