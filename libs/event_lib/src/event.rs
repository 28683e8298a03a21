//! The messages exchanged between units. A spike is a discrete pulse; a slow
//! inward current (SIC) is a continuous signal, and the two are told apart by
//! their kind tag.

/// Tag for the concrete event kinds known to the network.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Spike,
    SlowInwardCurrent,
}

/// One delivery of a continuous current from an astrocyte to a neuron.
///
/// The payload (`sender`, `amplitude`) is fixed at construction; the delivery
/// fields (`weight`, `delay_steps`, `receiver`, `rport`) are stamped by the
/// connection just before dispatch. The amplitude observed at the receiver is
/// `amplitude * weight`.
#[derive(Clone, Debug, PartialEq)]
pub struct SicEvent {
    sender: String,
    amplitude: f64,
    pub weight: f64,
    pub delay_steps: u64,
    pub receiver: String,
    pub rport: usize,
}

impl SicEvent {
    pub fn new(sender: &str, amplitude: f64) -> Self {
        SicEvent {
            sender: sender.to_string(),
            amplitude,
            weight: 1.0,
            delay_steps: 0,
            receiver: String::new(),
            rport: 0,
        }
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    /// The amplitude the receiver observes once the connection weight has
    /// been stamped.
    pub fn observed_amplitude(&self) -> f64 {
        self.amplitude * self.weight
    }
}

impl Default for SicEvent {
    fn default() -> Self {
        SicEvent::new("", 0.0)
    }
}

/// A discrete spike, e.g. from a neuron back onto an astrocyte.
#[derive(Clone, Debug, PartialEq)]
pub struct SpikeEvent {
    sender: String,
    pub multiplicity: u32,
    pub receiver: String,
    pub rport: usize,
}

impl SpikeEvent {
    pub fn new(sender: &str, multiplicity: u32) -> Self {
        SpikeEvent {
            sender: sender.to_string(),
            multiplicity,
            receiver: String::new(),
            rport: 0,
        }
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }
}

/// Sum over the known event kinds. The connector routes these, and link kinds
/// hand out empty instances of their variant so the kernel can learn which
/// kinds exist before a run starts.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Spike(SpikeEvent),
    Sic(SicEvent),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Spike(_) => EventKind::Spike,
            Event::Sic(_) => EventKind::SlowInwardCurrent,
        }
    }

    pub fn sender(&self) -> &str {
        match self {
            Event::Spike(e) => e.sender(),
            Event::Sic(e) => e.sender(),
        }
    }
}
