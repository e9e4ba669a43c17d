//! Per-symbol cumulative traded volume.

use std::cmp::Ordering;

use rustc_hash::FxHashMap;
use tracing::warn;

use super::ranking::{RankedSymbol, Ranking};
use crate::types::{Shares, Symbol};

/// Running share totals by symbol.
///
/// Totals only ever increase: executions against visible orders and trade
/// prints for hidden orders both credit the same entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VolumeAggregator {
    totals: FxHashMap<Symbol, Shares>,
}

impl VolumeAggregator {
    /// Create an empty aggregator
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add traded shares to a symbol's total
    ///
    /// Returns the new total.
    pub fn credit(&mut self, symbol: &str, shares: Shares) -> Shares {
        // Avoid allocating a key for symbols already seen
        if let Some(total) = self.totals.get_mut(symbol) {
            *total = total.saturating_add(shares);
            return *total;
        }
        self.totals.insert(symbol.to_string(), shares);
        shares
    }

    /// Get a symbol's total, zero if it never traded
    #[must_use]
    pub fn get(&self, symbol: &str) -> Shares {
        self.totals.get(symbol).copied().unwrap_or(0)
    }

    /// Number of symbols with recorded volume
    #[must_use]
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    /// Check if no volume has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Total shares across all symbols
    #[must_use]
    pub fn total(&self) -> Shares {
        self.totals.values().sum()
    }

    /// Iterate over `(symbol, shares)` in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Shares)> + '_ {
        self.totals.iter().map(|(s, &v)| (s.as_str(), v))
    }

    /// Rank the `n` symbols with the most volume
    ///
    /// Sorted by shares descending, ties broken by symbol ascending. When
    /// fewer than `n` symbols have volume the ranking is shorter than
    /// requested; see [`Ranking::is_complete`].
    #[must_use]
    pub fn top(&self, n: usize) -> Ranking {
        let mut entries: Vec<(&str, Shares)> = self.iter().collect();

        if n == 0 {
            entries.clear();
        } else if entries.len() > n {
            entries.select_nth_unstable_by(n - 1, by_volume);
            entries.truncate(n);
        }
        entries.sort_unstable_by(by_volume);

        if entries.len() < n {
            warn!(
                requested = n,
                available = entries.len(),
                "fewer symbols traded than requested for ranking"
            );
        }

        let entries = entries
            .into_iter()
            .enumerate()
            .map(|(i, (symbol, shares))| RankedSymbol {
                rank: i + 1,
                symbol: symbol.to_string(),
                shares,
            })
            .collect();
        Ranking::new(entries, n)
    }
}

fn by_volume(a: &(&str, Shares), b: &(&str, Shares)) -> Ordering {
    b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_accumulates() {
        let mut volume = VolumeAggregator::new();
        assert_eq!(volume.credit("DIG", 1100), 1100);
        assert_eq!(volume.credit("DIG", 1000), 2100);
        volume.credit("SH", 100);

        assert_eq!(volume.get("DIG"), 2100);
        assert_eq!(volume.get("SH"), 100);
        assert_eq!(volume.get("NONE"), 0);
        assert_eq!(volume.len(), 2);
        assert_eq!(volume.total(), 2200);
    }

    #[test]
    fn test_top_sorted_descending() {
        let mut volume = VolumeAggregator::new();
        for (i, symbol) in ["A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L"]
            .iter()
            .enumerate()
        {
            volume.credit(symbol, (i as Shares + 1) * 100);
        }

        let ranking = volume.top(10);
        assert!(ranking.is_complete());
        assert_eq!(ranking.len(), 10);
        assert_eq!(ranking.entries()[0].symbol, "L");
        assert_eq!(ranking.entries()[0].shares, 1200);
        assert_eq!(ranking.entries()[0].rank, 1);
        assert_eq!(ranking.entries()[9].symbol, "C");
        assert!(ranking
            .entries()
            .windows(2)
            .all(|w| w[0].shares >= w[1].shares));
    }

    #[test]
    fn test_top_tie_break_by_symbol() {
        let mut volume = VolumeAggregator::new();
        volume.credit("ZZZ", 500);
        volume.credit("AAA", 500);
        volume.credit("MMM", 500);
        volume.credit("BIG", 900);

        let symbols: Vec<_> = volume
            .top(3)
            .entries()
            .iter()
            .map(|e| e.symbol.clone())
            .collect();
        assert_eq!(symbols, vec!["BIG", "AAA", "MMM"]);
    }

    #[test]
    fn test_top_fewer_than_requested() {
        let mut volume = VolumeAggregator::new();
        volume.credit("DIG", 2100);
        volume.credit("SH", 100);

        let ranking = volume.top(10);
        assert!(!ranking.is_complete());
        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking.requested(), 10);
        assert_eq!(ranking.entries()[1].symbol, "SH");
    }

    #[test]
    fn test_top_empty() {
        let volume = VolumeAggregator::new();
        let ranking = volume.top(10);
        assert!(ranking.is_empty());
        assert!(!ranking.is_complete());
    }

    #[test]
    fn test_top_zero() {
        let mut volume = VolumeAggregator::new();
        volume.credit("DIG", 100);
        let ranking = volume.top(0);
        assert!(ranking.is_empty());
        assert!(ranking.is_complete());
    }
}
