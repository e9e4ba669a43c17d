//! Feed types shared across the crate.
//!
//! - [`messages`] - Decoded PITCH messages and their kinds

pub mod messages;

pub use messages::{AddOrder, CancelOrder, ExecuteOrder, Message, MessageKind, TradeMessage};

/// Share count carried by add, cancel, execute and trade messages
///
/// PITCH share fields are six ASCII digits, so `u32` would suffice per message;
/// `u64` is used so cumulative per-symbol totals never overflow.
pub type Shares = u64;

/// Opaque order identifier
///
/// Compared byte-for-byte, never parsed as a number. The feed encodes order
/// ids in base 36, so `"0000000000AB"` and `"AB"` are different orders.
pub type OrderId = String;

/// Ticker symbol with the right padding removed
pub type Symbol = String;
