//! A neuron unit: the target side of a SIC connection. Delivered events wait
//! in a queue until their stamped delay has elapsed; due entries are folded
//! into the neuron's input current when it is ticked. Membrane dynamics are
//! out of scope.

use crate::unit::{CapabilitySet, Unit};
use core::any::Any;
use event_lib::event::{Event, EventKind};
use queues::*;
use std::fmt;

#[derive(Clone)]
struct PendingCurrent {
    arrival_step: u64,
    amplitude: f64,
}

pub struct Neuron {
    id: String,
    pending: Queue<PendingCurrent>,
    sic_input: f64,
    capabilities: CapabilitySet,
}

impl fmt::Display for Neuron {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(width) = f.width() {
            write!(
                f,
                "{:width$}",
                &format!(
                    "Neuron {{ id : {}, sic_input : {}, pending : {} }}",
                    self.id,
                    self.sic_input,
                    self.pending.size()
                ),
                width = width
            )
        } else {
            write!(
                f,
                "Neuron {{ id : {}, sic_input : {}, pending : {} }}",
                self.id,
                self.sic_input,
                self.pending.size()
            )
        }
    }
}

impl Unit for Neuron {
    fn emit(&mut self, step: u64) -> Vec<Event> {
        // Fold everything due by now into this step's input current. Spiking
        // output is out of scope, so nothing is emitted.
        self.sic_input = self.drain_due(step);
        vec![]
    }

    fn deliver(&mut self, event: Event, step: u64) {
        match event {
            Event::Sic(sic) => {
                self.pending
                    .add(PendingCurrent {
                        arrival_step: step + sic.delay_steps,
                        amplitude: sic.observed_amplitude(),
                    })
                    .unwrap();
            }
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

impl Neuron {
    pub fn new(id: &str, receptor_count: usize) -> Neuron {
        assert!(receptor_count >= 1);
        let mut capabilities = CapabilitySet::new();
        for _ in 0..receptor_count {
            capabilities = capabilities.accepting(EventKind::SlowInwardCurrent);
        }
        Neuron {
            id: id.to_string(),
            pending: queue![],
            sic_input: 0.0,
            capabilities,
        }
    }

    /// The input current accumulated at the most recent tick.
    pub fn sic_input(&self) -> f64 {
        self.sic_input
    }

    pub fn pending_count(&self) -> usize {
        self.pending.size()
    }

    // Entries can carry different delays, so the queue is not ordered by
    // arrival; scan it once, keeping what is not yet due.
    fn drain_due(&mut self, now: u64) -> f64 {
        let mut due = 0.0;
        for _ in 0..self.pending.size() {
            let entry = self.pending.remove().unwrap();
            if entry.arrival_step <= now {
                due += entry.amplitude;
            } else {
                self.pending.add(entry).unwrap();
            }
        }
        due
    }
}
