//! End-of-feed ranking result.

use serde::Serialize;

use crate::types::{Shares, Symbol};

/// One row of the ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedSymbol {
    /// 1-based position
    pub rank: usize,
    /// Ticker symbol
    pub symbol: Symbol,
    /// Cumulative traded shares
    pub shares: Shares,
}

/// Symbols ordered by cumulative volume, highest first
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ranking {
    entries: Vec<RankedSymbol>,
    requested: usize,
}

impl Ranking {
    pub(crate) fn new(entries: Vec<RankedSymbol>, requested: usize) -> Self {
        Self { entries, requested }
    }

    /// Ranked rows, best first
    pub fn entries(&self) -> &[RankedSymbol] {
        &self.entries
    }

    /// Number of rows that were asked for
    pub fn requested(&self) -> usize {
        self.requested
    }

    /// Number of rows actually present
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no symbol had volume
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check whether enough symbols traded to fill the ranking
    pub fn is_complete(&self) -> bool {
        self.entries.len() == self.requested
    }

    /// Iterate over `(symbol, shares)` pairs, best first
    pub fn pairs(&self) -> impl Iterator<Item = (&str, Shares)> + '_ {
        self.entries.iter().map(|e| (e.symbol.as_str(), e.shares))
    }
}

impl<'a> IntoIterator for &'a Ranking {
    type Item = &'a RankedSymbol;
    type IntoIter = std::slice::Iter<'a, RankedSymbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
