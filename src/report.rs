//! Rendering of the final ranking.

use std::fmt::Write;

use serde::Serialize;

use crate::engine::ReplayStats;
use crate::volume::{RankedSymbol, Ranking};

/// Render the ranking as a plain table, one symbol per line
///
/// Symbols are left-justified in a six-character column. Share counts are
/// right-aligned in a twenty-character column, wide enough for any `u64`, so
/// the digits line up down the table.
///
/// ```rust
/// use pitch_volume::volume::VolumeAggregator;
/// use pitch_volume::report::render_table;
///
/// let mut volume = VolumeAggregator::new();
/// volume.credit("DIG", 2100);
/// volume.credit("SH", 100);
///
/// assert_eq!(
///     render_table(&volume.top(2)),
///     "DIG                      2100\nSH                        100\n"
/// );
/// ```
pub fn render_table(ranking: &Ranking) -> String {
    let mut out = String::with_capacity(ranking.len() * 32);
    for entry in ranking {
        // Writing to a String cannot fail
        let _ = writeln!(out, "{:<6}   {:>20}", entry.symbol, entry.shares);
    }
    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    requested: usize,
    complete: bool,
    top: &'a [RankedSymbol],
    stats: &'a ReplayStats,
}

/// Render the ranking and replay counters as pretty-printed JSON
pub fn render_json(ranking: &Ranking, stats: &ReplayStats) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        requested: ranking.requested(),
        complete: ranking.is_complete(),
        top: ranking.entries(),
        stats,
    })
}
