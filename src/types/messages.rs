//! Decoded feed messages.
//!
//! Every raw record decodes into exactly one [`Message`] variant. The set of
//! variants is closed, so handling code matches exhaustively and an unknown
//! discriminator can never slip through as a silent no-op.

use std::fmt;

use serde::Serialize;

use super::{OrderId, Shares, Symbol};
use crate::error::DecodeError;

/// Message kinds the replay engine distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// New resting order
    Add,
    /// Order cancel (full or partial)
    Cancel,
    /// Execution against a visible order
    Execute,
    /// Trade print for a hidden order
    Trade,
    /// Trade break or long-message variant, dropped by design
    Ignored,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MessageKind::Add => "add",
            MessageKind::Cancel => "cancel",
            MessageKind::Execute => "execute",
            MessageKind::Trade => "trade",
            MessageKind::Ignored => "ignored",
        };
        f.write_str(name)
    }
}

/// Add Order message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOrder {
    /// Order identifier
    pub order_id: OrderId,
    /// Displayed share count
    pub shares: Shares,
    /// Ticker symbol
    pub symbol: Symbol,
}

/// Order Cancel message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelOrder {
    /// Order identifier
    pub order_id: OrderId,
    /// Shares removed from the order
    pub canceled_shares: Shares,
}

/// Order Executed message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecuteOrder {
    /// Order identifier
    pub order_id: OrderId,
    /// Shares filled against the order
    pub executed_shares: Shares,
}

/// Trade message (execution of a non-displayed order)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeMessage {
    /// Shares traded
    pub shares: Shares,
    /// Ticker symbol
    pub symbol: Symbol,
}

/// A decoded feed record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Add Order
    Add(AddOrder),
    /// Order Cancel
    Cancel(CancelOrder),
    /// Order Executed
    Execute(ExecuteOrder),
    /// Trade (hidden order)
    Trade(TradeMessage),
    /// Known but deliberately ignored discriminator
    Ignored(char),
    /// Record that could not be decoded
    Malformed(DecodeError),
}

impl Message {
    /// Get the kind of this message, or `None` for malformed records
    pub fn kind(&self) -> Option<MessageKind> {
        match self {
            Message::Add(_) => Some(MessageKind::Add),
            Message::Cancel(_) => Some(MessageKind::Cancel),
            Message::Execute(_) => Some(MessageKind::Execute),
            Message::Trade(_) => Some(MessageKind::Trade),
            Message::Ignored(_) => Some(MessageKind::Ignored),
            Message::Malformed(_) => None,
        }
    }

    /// Check whether the record failed to decode
    pub fn is_malformed(&self) -> bool {
        matches!(self, Message::Malformed(_))
    }
}
