//! An astrocyte unit: the source side of a SIC connection. It emits one SIC
//! event per step carrying its output current, and takes spikes on receptor
//! 0. The calcium dynamics that would drive the output in a full model are
//! out of scope; the output current is simply configured.

use crate::unit::{CapabilitySet, Unit};
use core::any::Any;
use event_lib::event::{Event, EventKind, SicEvent};
use std::fmt;

pub struct Astrocyte {
    id: String,
    output_current: f64,
    spikes_seen: u64,
    capabilities: CapabilitySet,
}

impl fmt::Display for Astrocyte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(width) = f.width() {
            write!(
                f,
                "{:width$}",
                &format!(
                    "Astrocyte {{ id : {}, output_current : {}, spikes_seen : {} }}",
                    self.id, self.output_current, self.spikes_seen
                ),
                width = width
            )
        } else {
            write!(
                f,
                "Astrocyte {{ id : {}, output_current : {}, spikes_seen : {} }}",
                self.id, self.output_current, self.spikes_seen
            )
        }
    }
}

impl Unit for Astrocyte {
    fn whoami(&self) -> &str {
        &self.id
    }

    fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    fn emit(&mut self, _step: u64) -> Vec<Event> {
        vec![Event::Sic(SicEvent::new(&self.id, self.output_current))]
    }

    fn deliver(&mut self, event: Event, _step: u64) {
        match event {
            Event::Spike(spike) => self.spikes_seen += u64::from(spike.multiplicity),
            other => log::debug!("{0} dropping unexpected {1:?} event", self.id, other.kind()),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Astrocyte {
    pub fn new(id: &str, output_current: f64) -> Astrocyte {
        Astrocyte {
            id: id.to_string(),
            output_current,
            spikes_seen: 0,
            capabilities: CapabilitySet::new()
                .emitting(EventKind::SlowInwardCurrent)
                .accepting(EventKind::Spike),
        }
    }

    pub fn set_output_current(&mut self, output_current: f64) {
        self.output_current = output_current;
    }

    pub fn output_current(&self) -> f64 {
        self.output_current
    }

    pub fn spikes_seen(&self) -> u64 {
        self.spikes_seen
    }
}
