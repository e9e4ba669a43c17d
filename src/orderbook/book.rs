//! Open-order state keyed by order identifier.
//!
//! Only what the volume ranking needs is kept per order: the symbol and the
//! remaining share count. Price levels are never reconstructed.

use rustc_hash::FxHashMap;

use crate::error::Rejection;
use crate::types::{OrderId, Shares, Symbol};

/// A resting order that still has shares open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenOrder {
    /// Ticker symbol
    pub symbol: Symbol,
    /// Remaining open shares, always greater than zero
    pub shares: Shares,
}

/// Result of removing shares from an open order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reduction {
    /// Symbol of the reduced order
    pub symbol: Symbol,
    /// Shares removed
    pub shares: Shares,
    /// Shares still open afterwards
    pub remaining: Shares,
}

impl Reduction {
    /// Check whether the order left the book
    pub fn closed(&self) -> bool {
        self.remaining == 0
    }
}

/// Set of currently open orders.
///
/// # Invariants
///
/// Every tracked order has strictly positive remaining shares. Reductions
/// that would leave a negative balance are rejected outright and leave the
/// order untouched; a reduction to exactly zero removes the order.
///
/// # Example
///
/// ```rust
/// use pitch_volume::orderbook::OpenOrders;
///
/// let mut book = OpenOrders::new();
/// book.add("O1", "ZVZZT", 2000).unwrap();
///
/// let fill = book.execute("O1", 1100).unwrap();
/// assert_eq!(fill.remaining, 900);
/// assert_eq!(book.get("O1").unwrap().shares, 900);
///
/// // over-draw is rejected, not clamped
/// assert!(book.cancel("O1", 1000).is_err());
/// assert_eq!(book.get("O1").unwrap().shares, 900);
/// ```
#[derive(Debug, Clone, Default)]
pub struct OpenOrders {
    orders: FxHashMap<OrderId, OpenOrder>,
}

impl OpenOrders {
    /// Create an empty set of open orders
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new resting order
    ///
    /// An existing order with the same id is overwritten (last writer wins)
    /// and returned. A zero-share add is rejected since it would put an empty
    /// order on the book.
    pub fn add(
        &mut self,
        order_id: impl Into<OrderId>,
        symbol: impl Into<Symbol>,
        shares: Shares,
    ) -> Result<Option<OpenOrder>, Rejection> {
        let order_id = order_id.into();
        if shares == 0 {
            return Err(Rejection::ZeroShares { order_id });
        }
        Ok(self.orders.insert(
            order_id,
            OpenOrder {
                symbol: symbol.into(),
                shares,
            },
        ))
    }

    /// Remove canceled shares from an order
    pub fn cancel(&mut self, order_id: &str, shares: Shares) -> Result<Reduction, Rejection> {
        self.reduce(order_id, shares)
    }

    /// Remove executed shares from an order
    ///
    /// Identical balance rules to [`OpenOrders::cancel`]; the caller credits
    /// volume from the returned [`Reduction`].
    pub fn execute(&mut self, order_id: &str, shares: Shares) -> Result<Reduction, Rejection> {
        self.reduce(order_id, shares)
    }

    fn reduce(&mut self, order_id: &str, shares: Shares) -> Result<Reduction, Rejection> {
        let Some(order) = self.orders.get_mut(order_id) else {
            return Err(Rejection::UnknownOrder {
                order_id: order_id.to_string(),
            });
        };

        let Some(remaining) = order.shares.checked_sub(shares) else {
            return Err(Rejection::Overdraw {
                order_id: order_id.to_string(),
                open: order.shares,
                requested: shares,
            });
        };

        if remaining == 0 {
            // Entry is known to exist; take ownership of the symbol
            let symbol = self
                .orders
                .remove(order_id)
                .map(|o| o.symbol)
                .unwrap_or_default();
            Ok(Reduction {
                symbol,
                shares,
                remaining,
            })
        } else {
            order.shares = remaining;
            Ok(Reduction {
                symbol: order.symbol.clone(),
                shares,
                remaining,
            })
        }
    }

    /// Get an open order
    #[must_use]
    pub fn get(&self, order_id: &str) -> Option<&OpenOrder> {
        self.orders.get(order_id)
    }

    /// Check whether an order is open
    #[must_use]
    pub fn contains(&self, order_id: &str) -> bool {
        self.orders.contains_key(order_id)
    }

    /// Iterate over open orders in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OpenOrder)> + '_ {
        self.orders.iter().map(|(id, order)| (id.as_str(), order))
    }

    /// Get the number of open orders
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Check if there are no open orders
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Sum of open shares across all orders
    #[must_use]
    pub fn total_open_shares(&self) -> Shares {
        self.orders.values().map(|o| o.shares).sum()
    }

    /// Remove all open orders
    pub fn clear(&mut self) {
        self.orders.clear();
    }
}
