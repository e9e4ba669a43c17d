//! # pitch-volume
//!
//! Replays a PITCH market-data feed (fixed-width text records) and ranks
//! symbols by cumulative traded shares.
//!
//! ## Features
//!
//! - **Configurable layout** - every field offset and message code comes from
//!   a TOML [`Config`], with the standard PITCH layout as the default
//! - **Open-order tracking** - Add, Cancel and Execute messages maintain the
//!   set of resting orders so executions resolve to a symbol
//! - **Volume aggregation** - executions and hidden-order trade prints are
//!   summed per symbol
//! - **Deterministic ranking** - shares descending, ties by symbol
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::fs::File;
//! use std::io::BufReader;
//!
//! use pitch_volume::{Config, ReplayEngine};
//!
//! fn main() -> Result<(), pitch_volume::Error> {
//!     let config = Config::load("pitch.toml")?;
//!     let mut engine = ReplayEngine::new(&config);
//!
//!     let feed = BufReader::new(File::open("pitch_example_data")?);
//!     engine.replay(feed)?;
//!
//!     for entry in &engine.ranking() {
//!         println!("{:<6}   {}", entry.symbol, entry.shares);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`feed`] - Line framing and fixed-width record decoding
//! - [`types`] - Decoded message types
//! - [`orderbook`] - Open orders keyed by order id
//! - [`volume`] - Per-symbol totals and top-N ranking
//! - [`engine`] - Applies messages in feed order
//! - [`report`] - Table and JSON output
//! - [`config`] - Field layout and run settings
//! - [`error`] - Error types for the crate
//!
//! ## Error policy
//!
//! Cancels and executions that name an unknown order, or that ask for more
//! shares than are open, are logged and skipped; they never clamp or drive a
//! balance negative. Undecodable records abort the run by default
//! ([`config::MalformedPolicy`]).

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod engine;
pub mod error;
pub mod feed;
pub mod orderbook;
pub mod report;
pub mod types;
pub mod volume;

// Re-export main types at crate root for convenience
pub use config::Config;
pub use engine::{Outcome, ReplayEngine, ReplayStats};
pub use error::Error;

/// Result type alias using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_independent_engines() {
        let config = Config::default();
        let mut first = ReplayEngine::new(&config);
        let second = ReplayEngine::new(&config);

        first
            .process_line(1, "28807528PCK27GA000016B000177ZVZZT 0020000000000I000HV1PJ")
            .unwrap();

        assert_eq!(first.volume().get("ZVZZT"), 177);
        assert!(second.volume().is_empty());
    }
}
