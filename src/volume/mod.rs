//! Traded-volume aggregation and top-N ranking.

pub mod aggregator;
pub mod ranking;

pub use aggregator::VolumeAggregator;
pub use ranking::{RankedSymbol, Ranking};
