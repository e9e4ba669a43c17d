//! Error types for the pitch-volume crate.
//!
//! Three layers of failure are kept apart:
//!
//! - [`DecodeError`] - a single record could not be decoded
//! - [`Rejection`] - a decoded message could not be applied to the open
//!   orders (unknown order, over-draw); always recoverable
//! - [`Error`] - anything that stops a run (I/O, configuration, a malformed
//!   record under the abort policy)

use thiserror::Error;

use crate::types::{OrderId, Shares};

/// The main error type for this crate
#[derive(Debug, Error)]
pub enum Error {
    /// Reading the feed failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be read
    #[error("failed to read config '{path}'")]
    ConfigRead {
        /// Path that was opened
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is not valid TOML for [`crate::Config`]
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration values are inconsistent
    #[error("Configuration error: {0}")]
    Config(String),

    /// A record could not be decoded and the run was aborted
    #[error("line {line}: {source}")]
    Decode {
        /// 1-based line number in the feed
        line: u64,
        /// What was wrong with the record
        #[source]
        source: DecodeError,
    },
}

/// Why a single record failed to decode
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Nothing left after framing was removed
    #[error("empty record")]
    Empty,

    /// Record ends before a field's declared range
    #[error("record too short for {field}: need {needed} bytes, have {len}")]
    Truncated {
        /// Field being extracted
        field: &'static str,
        /// Bytes required to cover the field
        needed: usize,
        /// Actual record length
        len: usize,
    },

    /// Share field is not a plain decimal number
    #[error("invalid share count in {field}: {value:?}")]
    InvalidShares {
        /// Field being extracted
        field: &'static str,
        /// Raw field text
        value: String,
    },

    /// Field range does not fall on character boundaries
    #[error("field {field} is not valid text at its declared offset")]
    InvalidText {
        /// Field being extracted
        field: &'static str,
    },

    /// Discriminator is neither handled nor explicitly ignored
    #[error("unknown message type {0:?}")]
    UnknownKind(char),
}

/// Why a cancel or execute (or add) was not applied to the open orders
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Order id is not currently open
    #[error("order {order_id} is not open")]
    UnknownOrder {
        /// Referenced order
        order_id: OrderId,
    },

    /// More shares requested than remain open
    #[error("order {order_id}: requested {requested} shares from an open balance of {open}")]
    Overdraw {
        /// Referenced order
        order_id: OrderId,
        /// Shares currently open
        open: Shares,
        /// Shares the message tried to remove
        requested: Shares,
    },

    /// Add order with nothing to rest
    #[error("order {order_id} added with zero shares")]
    ZeroShares {
        /// Referenced order
        order_id: OrderId,
    },
}
