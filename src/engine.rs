//! Replay engine: applies decoded messages in feed order.
//!
//! [`ReplayEngine`] owns every piece of mutable state for one run (open
//! orders, volume totals and counters), so independent replays never share
//! anything. Messages are applied strictly in the order given.
//!
//! # Handling rules
//!
//! | Message  | Open orders                 | Volume                  |
//! |----------|-----------------------------|-------------------------|
//! | Add      | insert (last writer wins)   | -                       |
//! | Cancel   | reduce / remove             | -                       |
//! | Execute  | reduce / remove             | credit executed shares  |
//! | Trade    | -                           | credit traded shares    |
//! | Ignored  | -                           | -                       |
//!
//! Unknown orders and over-draws are logged with `warn!`, counted, and
//! otherwise have no effect.

use std::io::BufRead;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{Config, MalformedPolicy};
use crate::error::{DecodeError, Error, Rejection};
use crate::feed::{Decoder, FeedReader};
use crate::orderbook::OpenOrders;
use crate::types::{AddOrder, CancelOrder, ExecuteOrder, Message, TradeMessage};
use crate::volume::{Ranking, VolumeAggregator};
use crate::Result;

/// Effect of applying one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// State changed as requested
    Applied,
    /// Message was a deliberately ignored kind
    Ignored,
    /// Message referenced state that did not allow it
    Rejected(Rejection),
    /// Record could not be decoded and was skipped
    Skipped,
}

/// Counters collected during a replay
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplayStats {
    /// Records seen (including ignored and malformed)
    pub records: u64,
    /// Add Order messages applied
    pub adds: u64,
    /// Add Order messages that replaced an open order with the same id
    pub replaced_orders: u64,
    /// Order Cancel messages applied
    pub cancels: u64,
    /// Order Executed messages applied
    pub executions: u64,
    /// Trade messages applied
    pub trades: u64,
    /// Ignored message kinds
    pub ignored: u64,
    /// Records skipped as undecodable (truncated, non-numeric, bad text)
    pub malformed: u64,
    /// Records skipped for a discriminator that is neither handled nor ignored
    pub unknown_kinds: u64,
    /// Cancels/executes naming an order that was not open
    pub unknown_orders: u64,
    /// Cancels/executes requesting more shares than were open
    pub overdraws: u64,
    /// Adds rejected for having zero shares
    pub zero_share_adds: u64,
}

impl ReplayStats {
    /// Total recoverable warnings raised
    pub fn warnings(&self) -> u64 {
        self.unknown_orders
            + self.overdraws
            + self.zero_share_adds
            + self.malformed
            + self.unknown_kinds
    }
}

/// Owned state for one replay of a feed.
///
/// # Example
///
/// ```rust
/// use pitch_volume::engine::ReplayEngine;
/// use pitch_volume::Config;
///
/// let feed = "\
/// S28800011AO1234567890AB002000ZVZZT 0000619200Y
/// S28800012EO1234567890A00110000004AQ00005
/// S28800013PCK27GA000016B000500ZVZZT 0020000000000I000HV1PJ
/// ";
///
/// let mut engine = ReplayEngine::new(&Config::default());
/// engine.replay(feed.as_bytes()).unwrap();
///
/// assert_eq!(engine.volume().get("ZVZZT"), 1600);
/// assert_eq!(engine.open_orders().get("O1234567890A").unwrap().shares, 900);
/// ```
#[derive(Debug, Clone)]
pub struct ReplayEngine {
    decoder: Decoder,
    orders: OpenOrders,
    volume: VolumeAggregator,
    stats: ReplayStats,
    marker: Option<char>,
    policy: MalformedPolicy,
    top_n: usize,
}

impl ReplayEngine {
    /// Create an engine with empty state
    pub fn new(config: &Config) -> Self {
        Self {
            decoder: Decoder::from_config(config),
            orders: OpenOrders::new(),
            volume: VolumeAggregator::new(),
            stats: ReplayStats::default(),
            marker: config.leading_marker(),
            policy: config.malformed_policy(),
            top_n: config.top_n(),
        }
    }

    /// Get the open orders
    pub fn open_orders(&self) -> &OpenOrders {
        &self.orders
    }

    /// Get the volume totals
    pub fn volume(&self) -> &VolumeAggregator {
        &self.volume
    }

    /// Get the counters
    pub fn stats(&self) -> &ReplayStats {
        &self.stats
    }

    /// Rank symbols by volume using the configured size
    pub fn ranking(&self) -> Ranking {
        self.volume.top(self.top_n)
    }

    /// Replay a whole feed
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails, or if a record is malformed and the
    /// policy is [`MalformedPolicy::Abort`]. State applied before the error
    /// is kept.
    pub fn replay<R: BufRead>(&mut self, reader: R) -> Result<&ReplayStats> {
        info!("replay started");
        for record in FeedReader::new(reader, self.marker) {
            match record {
                Ok((line, text)) => {
                    self.process_line(line, &text)?;
                }
                Err(Error::Decode { line, source }) => {
                    self.on_malformed(line, source)?;
                }
                Err(e) => return Err(e),
            }
        }
        info!(
            records = self.stats.records,
            open_orders = self.orders.len(),
            symbols = self.volume.len(),
            warnings = self.stats.warnings(),
            "replay finished"
        );
        Ok(&self.stats)
    }

    /// Decode and apply one record (marker already stripped)
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] for a malformed record under the abort policy.
    pub fn process_line(&mut self, line: u64, record: &str) -> Result<Outcome> {
        match self.decoder.decode(record) {
            Message::Malformed(source) => self.on_malformed(line, source),
            message => Ok(self.apply(&message)),
        }
    }

    fn on_malformed(&mut self, line: u64, source: DecodeError) -> Result<Outcome> {
        self.stats.records += 1;
        match self.policy {
            MalformedPolicy::Abort => Err(Error::Decode { line, source }),
            MalformedPolicy::Skip => {
                warn!(line, error = %source, "skipping malformed record");
                self.count_malformed(&source);
                Ok(Outcome::Skipped)
            }
        }
    }

    fn count_malformed(&mut self, error: &DecodeError) {
        match error {
            DecodeError::UnknownKind(_) => self.stats.unknown_kinds += 1,
            _ => self.stats.malformed += 1,
        }
    }

    /// Apply one decoded message
    ///
    /// A [`Message::Malformed`] passed here is counted and skipped regardless
    /// of policy; use [`ReplayEngine::process_line`] to honor it.
    pub fn apply(&mut self, message: &Message) -> Outcome {
        self.stats.records += 1;
        match message {
            Message::Add(add) => self.on_add(add),
            Message::Cancel(cancel) => self.on_cancel(cancel),
            Message::Execute(execute) => self.on_execute(execute),
            Message::Trade(trade) => self.on_trade(trade),
            Message::Ignored(code) => {
                debug!(code = %code, "ignored message");
                self.stats.ignored += 1;
                Outcome::Ignored
            }
            Message::Malformed(error) => {
                warn!(%error, "skipping malformed message");
                self.count_malformed(error);
                Outcome::Skipped
            }
        }
    }

    fn on_add(&mut self, add: &AddOrder) -> Outcome {
        match self
            .orders
            .add(add.order_id.as_str(), add.symbol.as_str(), add.shares)
        {
            Ok(previous) => {
                self.stats.adds += 1;
                if let Some(previous) = previous {
                    warn!(
                        order_id = %add.order_id,
                        previous_symbol = %previous.symbol,
                        previous_shares = previous.shares,
                        "add replaced an open order with the same id"
                    );
                    self.stats.replaced_orders += 1;
                }
                debug!(order_id = %add.order_id, symbol = %add.symbol, shares = add.shares, "order added");
                Outcome::Applied
            }
            Err(rejection) => self.reject(rejection),
        }
    }

    fn on_cancel(&mut self, cancel: &CancelOrder) -> Outcome {
        match self.orders.cancel(&cancel.order_id, cancel.canceled_shares) {
            Ok(reduction) => {
                self.stats.cancels += 1;
                debug!(
                    order_id = %cancel.order_id,
                    symbol = %reduction.symbol,
                    canceled = reduction.shares,
                    remaining = reduction.remaining,
                    "order canceled"
                );
                Outcome::Applied
            }
            Err(rejection) => self.reject(rejection),
        }
    }

    fn on_execute(&mut self, execute: &ExecuteOrder) -> Outcome {
        match self
            .orders
            .execute(&execute.order_id, execute.executed_shares)
        {
            Ok(reduction) => {
                self.stats.executions += 1;
                let total = self.volume.credit(&reduction.symbol, reduction.shares);
                debug!(
                    order_id = %execute.order_id,
                    symbol = %reduction.symbol,
                    executed = reduction.shares,
                    remaining = reduction.remaining,
                    total,
                    "order executed"
                );
                Outcome::Applied
            }
            Err(rejection) => self.reject(rejection),
        }
    }

    fn on_trade(&mut self, trade: &TradeMessage) -> Outcome {
        self.stats.trades += 1;
        let total = self.volume.credit(&trade.symbol, trade.shares);
        debug!(symbol = %trade.symbol, shares = trade.shares, total, "hidden trade");
        Outcome::Applied
    }

    fn reject(&mut self, rejection: Rejection) -> Outcome {
        match &rejection {
            Rejection::UnknownOrder { .. } => self.stats.unknown_orders += 1,
            Rejection::Overdraw { .. } => self.stats.overdraws += 1,
            Rejection::ZeroShares { .. } => self.stats.zero_share_adds += 1,
        }
        warn!(%rejection, "message rejected");
        Outcome::Rejected(rejection)
    }
}

impl Default for ReplayEngine {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
