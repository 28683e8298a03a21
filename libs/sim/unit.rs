//! A unit is an endpoint of the simulated network. Units declare what they
//! can emit and what each receptor slot accepts; connections negotiate
//! against these capability sets once, at build time.

use core::any::Any;
use event_lib::event::{Event, EventKind};

/// What a unit can emit, and what each receptor slot accepts. Negotiation is
/// a pure query against this value, so it can be tested without a network.
#[derive(Clone, Debug, Default)]
pub struct CapabilitySet {
    emits: Vec<EventKind>,
    receptors: Vec<EventKind>,
}

impl CapabilitySet {
    pub fn new() -> Self {
        CapabilitySet {
            emits: Vec::new(),
            receptors: Vec::new(),
        }
    }

    /// Declare an event kind this unit emits.
    pub fn emitting(mut self, kind: EventKind) -> Self {
        self.emits.push(kind);
        self
    }

    /// Append a receptor slot accepting the given kind. Slots are indexed in
    /// the order they are declared.
    pub fn accepting(mut self, kind: EventKind) -> Self {
        self.receptors.push(kind);
        self
    }

    pub fn emits(&self, kind: EventKind) -> bool {
        self.emits.contains(&kind)
    }

    pub fn receptor_count(&self) -> usize {
        self.receptors.len()
    }

    /// Capability query: can `event` be accepted at `receptor_type`? Returns
    /// the concrete port on success, `None` on refusal.
    pub fn accept(&self, event: &Event, receptor_type: usize) -> Option<usize> {
        match self.receptors.get(receptor_type) {
            Some(kind) if *kind == event.kind() => Some(receptor_type),
            _ => None,
        }
    }
}

/// Something the connector can own and drive: it produces events when ticked
/// and accepts events routed to it.
pub trait Unit {
    fn whoami(&self) -> &str;

    fn capabilities(&self) -> &CapabilitySet;

    /// Produce this step's outgoing events.
    fn emit(&mut self, step: u64) -> Vec<Event>;

    /// Accept a stamped event routed here by the connector.
    fn deliver(&mut self, event: Event, step: u64);

    fn as_any(&self) -> &dyn Any;
}
