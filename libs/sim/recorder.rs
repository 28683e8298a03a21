//! A recording sink. It accepts SIC events, notes the observed amplitude and
//! the step the current lands on, and answers queries over what it saw.
//! Useful as a probe target in environments and tests.

use crate::unit::{CapabilitySet, Unit};
use core::any::Any;
use event_lib::event::{Event, EventKind};
use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub struct RecordedCurrent {
    pub arrival_step: u64,
    pub sender: String,
    pub amplitude: f64,
}

#[derive(Default)]
pub struct Recorder {
    id: String,
    entries: Vec<RecordedCurrent>,
    capabilities: CapabilitySet,
}

impl fmt::Display for Recorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(width) = f.width() {
            write!(
                f,
                "{:width$}",
                &format!(
                    "Recorder {{ id : {}, entries : {} }}",
                    self.id,
                    self.entries.len()
                ),
                width = width
            )
        } else {
            write!(
                f,
                "Recorder {{ id : {}, entries : {} }}",
                self.id,
                self.entries.len()
            )
        }
    }
}

impl Unit for Recorder {
    // A recorder never sends anything out, so we return an empty vector.
    fn emit(&mut self, _step: u64) -> Vec<Event> {
        vec![]
    }

    fn deliver(&mut self, event: Event, step: u64) {
        match event {
            Event::Sic(sic) => self.entries.push(RecordedCurrent {
                arrival_step: step + sic.delay_steps,
                sender: sic.sender().to_string(),
                amplitude: sic.observed_amplitude(),
            }),
            other => log::debug!("{0} dropping unexpected {1:?} event", self.id, other.kind()),
        }
    }

    fn whoami(&self) -> &str {
        &self.id
    }

    fn capabilities(&self) -> &CapabilitySet {
        &self.capabilities
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Recorder {
    pub fn new(id: &str) -> Recorder {
        Recorder {
            id: id.to_string(),
            entries: Vec::new(),
            capabilities: CapabilitySet::new().accepting(EventKind::SlowInwardCurrent),
        }
    }

    pub fn entries(&self) -> &[RecordedCurrent] {
        &self.entries
    }

    /// One line per recorded current: arrival step, sender, amplitude.
    pub fn query(&self) -> String {
        let mut out = String::new();
        for entry in &self.entries {
            out.push_str(&format!(
                "{} {} {}\n",
                entry.arrival_step, entry.sender, entry.amplitude
            ));
        }
        out
    }
}
