//! Typed property snapshot and update for connections. A snapshot reports
//! everything a connection exposes; an update names only the fields it wants
//! to change, and is checked in full before anything is written.

/// Read-only snapshot of a connection's observable state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ConnectionStatus {
    pub weight: f64,
    pub delay_steps: u64,
    /// In-memory footprint of the connection, for diagnostics.
    pub size_of: usize,
}

impl ConnectionStatus {
    /// An update that re-applies the writable portion of this snapshot.
    /// Read-only fields (delay, size) are not carried over, so re-applying a
    /// snapshot is always accepted and leaves the connection unchanged.
    pub fn as_update(&self) -> StatusUpdate {
        StatusUpdate {
            weight: Some(self.weight),
            delay_steps: None,
        }
    }
}

/// A partial update against a connection's properties. Fields left `None`
/// are untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StatusUpdate {
    pub weight: Option<f64>,
    /// Present only to be rejected: delay is fixed at construction for SIC
    /// connections.
    pub delay_steps: Option<u64>,
}

impl StatusUpdate {
    pub fn weight(weight: f64) -> Self {
        StatusUpdate {
            weight: Some(weight),
            delay_steps: None,
        }
    }

    pub fn delay_steps(delay_steps: u64) -> Self {
        StatusUpdate {
            weight: None,
            delay_steps: Some(delay_steps),
        }
    }
}
