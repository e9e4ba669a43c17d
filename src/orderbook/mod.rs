//! Open-order tracking.
//!
//! This module keeps the visible orders that are still resting, so cancel and
//! execute messages (which carry only an order id) can be resolved to a symbol
//! and checked against the remaining balance.
//!
//! - O(1) average lookup by order id (`FxHashMap`)
//! - Over-draws rejected, never clamped
//! - Fully filled or canceled orders removed immediately

pub mod book;

pub use book::{OpenOrder, OpenOrders, Reduction};
