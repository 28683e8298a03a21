//! Error types for network construction and configuration.

use event_lib::event::EventKind;
use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum SimError {
    /// The target refused the event kind at the requested receptor. Fatal to
    /// the link being built; the connector must not install it.
    #[error("illegal connection from {from} to {to}: {kind:?} events are not accepted at receptor {receptor}")]
    IllegalConnection {
        from: String,
        to: String,
        kind: EventKind,
        receptor: usize,
    },

    /// The source does not emit the event kind this link kind carries.
    #[error("event type mismatch: {unit} does not emit {kind:?} events")]
    EventTypeMismatch { unit: String, kind: EventKind },

    /// A property update was malformed; the prior state is unchanged.
    #[error("bad property: {0}")]
    BadProperty(String),

    /// A second validation was attempted on a link that is already bound.
    #[error("connection to {target} is already bound")]
    AlreadyBound { target: String },

    /// The link was asked to send before validation bound a target.
    #[error("connection has not been validated against a target")]
    Unbound,

    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    #[error("no connection at index {index} under {from}")]
    UnknownConnection { from: String, index: usize },
}

pub type Result<T> = std::result::Result<T, SimError>;
