//! The connector owns every unit and every connection and coordinates
//! delivery. It is tick-based: at every step, each unit first produces its
//! outgoing events, then each SIC event is run through the connections
//! registered under its sender and dispatched to the bound target.

use crate::connection::{ConnectionConfig, NameHandle, SicConnection};
use crate::error::{Result, SimError};
use crate::properties::{ConnectionStatus, StatusUpdate};
use crate::recorder::Recorder;
use crate::unit::Unit;
use event_lib::event::{Event, EventKind, SicEvent};
use petgraph::dot::{Config, Dot};
use petgraph::graph::{Graph, NodeIndex};
use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::fs;
use std::process::Command;

// Need to combine Unit for simulation and Display for printing.
pub trait PrintableUnit: Unit + Display {
    fn as_unit(&self) -> &dyn Unit;
}
impl<T: Unit + Display> PrintableUnit for T {
    fn as_unit(&self) -> &dyn Unit {
        self
    }
}

#[derive(Default)]
pub struct Connector {
    units: HashMap<String, Box<dyn PrintableUnit>>,
    graph: Graph<String, String>,
    node_indices: HashMap<String, NodeIndex>,
    connections: HashMap<String, Vec<SicConnection<NameHandle>>>,
    event_kinds: HashSet<EventKind>,
}

impl Connector {
    pub fn new() -> Self {
        Connector {
            units: HashMap::new(),
            graph: Graph::new(),
            node_indices: HashMap::new(),
            connections: HashMap::new(),
            event_kinds: HashSet::new(),
        }
    }

    pub fn add_unit<T: 'static + PrintableUnit>(&mut self, id: &str, unit: T) {
        self.units.insert(id.to_string(), Box::new(unit));
        self.node_indices
            .insert(id.to_string(), self.graph.add_node(id.to_string()));
    }

    /// Build, validate, and install a SIC connection. Validation failures
    /// propagate and the connection is never installed.
    pub fn connect(
        &mut self,
        source: &str,
        target: &str,
        receptor_type: usize,
        config: ConnectionConfig,
    ) -> Result<()> {
        let source_unit = self
            .units
            .get(source)
            .ok_or_else(|| SimError::UnknownUnit(source.to_string()))?;
        let target_unit = self
            .units
            .get(target)
            .ok_or_else(|| SimError::UnknownUnit(target.to_string()))?;

        let mut connection = SicConnection::new(config);
        connection.validate(source_unit.as_unit(), target_unit.as_unit(), receptor_type)?;

        // Register the event kind this link kind introduces, so dispatch
        // tables can be sized before the run starts.
        self.event_kinds.insert(connection.secondary_event().kind());

        let source_index = self.node_indices[source];
        let target_index = self.node_indices[target];
        self.graph.add_edge(source_index, target_index, String::new());
        self.connections
            .entry(source.to_string())
            .or_insert_with(Vec::new)
            .push(connection);
        Ok(())
    }

    /// The concrete event kinds registered so far.
    pub fn event_kinds(&self) -> &HashSet<EventKind> {
        &self.event_kinds
    }

    pub fn connection_count(&self, source: &str) -> usize {
        self.connections.get(source).map_or(0, |links| links.len())
    }

    pub fn connection_status(&self, source: &str, index: usize) -> Result<ConnectionStatus> {
        let links = self
            .connections
            .get(source)
            .ok_or_else(|| SimError::UnknownUnit(source.to_string()))?;
        match links.get(index) {
            Some(link) => Ok(link.get_status()),
            None => Err(SimError::UnknownConnection {
                from: source.to_string(),
                index,
            }),
        }
    }

    pub fn update_connection(
        &mut self,
        source: &str,
        index: usize,
        update: &StatusUpdate,
    ) -> Result<()> {
        let links = self
            .connections
            .get_mut(source)
            .ok_or_else(|| SimError::UnknownUnit(source.to_string()))?;
        match links.get_mut(index) {
            Some(link) => link.set_status(update),
            None => Err(SimError::UnknownConnection {
                from: source.to_string(),
                index,
            }),
        }
    }

    /// Hand an event straight to a unit, bypassing any connection. Useful to
    /// seed a network before the first step.
    pub fn inject(&mut self, target: &str, event: Event) {
        let unit = self.units.get_mut(target).unwrap();
        unit.deliver(event, 0);
    }

    /// Fetch a unit by its concrete type, e.g. to inspect a neuron's input.
    pub fn get_element<T: 'static>(&self, id: &str) -> &T {
        let unit_box = &self.units[id];
        match unit_box.as_any().downcast_ref::<T>() {
            Some(unit) => unit,
            None => panic!("Expected {0} to have the requested type", unit_box),
        }
    }

    pub fn query_recorder(&self, recorder_id: &str) -> String {
        self.get_element::<Recorder>(recorder_id).query()
    }

    pub fn print_graph(&mut self) {
        let dot_info = Dot::with_config(&self.graph, &[Config::EdgeNoLabel]).to_string();
        // print dot_info to a file
        let _ret = fs::write("graph.gv", dot_info);
        // render the dot file as a pdf dot -Tpdf graph.gv -o graph.pdf
        Command::new("dot")
            .arg("-Tpdf")
            .arg("graph.gv")
            .arg("-o")
            .arg("graph.pdf")
            .output()
            .expect("failed to execute process");
    }

    pub fn tick(&mut self, step: u64) {
        log::info!("################# STEP {0} START #################", step);
        let mut event_buffer = vec![];
        // tick all units to generate events
        // this is the send phase. collect all the events
        for (_unit_id, unit) in self.units.iter_mut() {
            let events = unit.emit(step);
            log::info!("{:45}", unit);
            log::info!("\toutputs {:?}", events);
            event_buffer.extend(events);
        }

        // now the route phase: run each event through the connections
        // registered under its sender
        for event in event_buffer {
            match event {
                Event::Sic(sic) => self.route_sic(sic, step),
                other => log::debug!("no link kind routes {0:?}, dropping", other.kind()),
            }
        }
        log::info!("################# STEP {0} END #################", step);
    }

    fn route_sic(&mut self, event: SicEvent, step: u64) {
        let links = match self.connections.get(event.sender()) {
            Some(links) => links,
            None => return,
        };
        // Stamp one copy per link first; dispatch needs the units mutably.
        let mut stamped = vec![];
        for link in links {
            let mut copy = event.clone();
            if let Err(err) = link.send(&mut copy, step) {
                panic!("installed connection under {0} failed: {1}", event.sender(), err);
            }
            stamped.push(copy);
        }
        for event in stamped {
            let receiver = event.receiver.clone();
            match self.units.get_mut(&receiver) {
                Some(unit) => unit.deliver(Event::Sic(event), step),
                None => panic!("expected {0} to be in units, but it was not", receiver),
            }
        }
    }
}
