//! Field layout and run configuration.
//!
//! The replay engine never hard-codes a column: every field offset and every
//! discriminator character comes from a [`Config`]. The defaults describe the
//! standard PITCH text layout, so a config file only needs the keys it
//! overrides.
//!
//! # Example file
//!
//! ```toml
//! input = "pitch_example_data"
//! top_n = 10
//! on_malformed = "skip"
//!
//! [layout.add_order]
//! symbol = { offset = 28, length = 6 }
//!
//! [codes]
//! ignored = ["B", "r", "d"]
//! ```

use std::ops::Range;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::Error;

/// Byte range of one fixed-width field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSpan {
    /// Zero-based byte offset into the record (after marker stripping)
    pub offset: usize,
    /// Field width in bytes
    pub length: usize,
}

impl FieldSpan {
    /// Create a span
    pub const fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    /// First byte past the field, saturating at `usize::MAX`
    pub const fn end(&self) -> usize {
        self.offset.saturating_add(self.length)
    }

    /// Byte range covered by the field
    pub fn range(&self) -> Range<usize> {
        self.offset..self.end()
    }
}

/// Add Order field positions
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AddOrderLayout {
    /// Order identifier
    pub order_id: FieldSpan,
    /// Displayed shares
    pub shares: FieldSpan,
    /// Space-padded ticker symbol
    pub symbol: FieldSpan,
}

impl Default for AddOrderLayout {
    fn default() -> Self {
        Self {
            order_id: FieldSpan::new(9, 12),
            shares: FieldSpan::new(22, 6),
            symbol: FieldSpan::new(28, 6),
        }
    }
}

/// Order Cancel field positions
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CancelOrderLayout {
    /// Order identifier
    pub order_id: FieldSpan,
    /// Canceled shares
    pub canceled_shares: FieldSpan,
}

impl Default for CancelOrderLayout {
    fn default() -> Self {
        Self {
            order_id: FieldSpan::new(9, 12),
            canceled_shares: FieldSpan::new(21, 6),
        }
    }
}

/// Order Executed field positions
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExecuteOrderLayout {
    /// Order identifier
    pub order_id: FieldSpan,
    /// Executed shares
    pub executed_shares: FieldSpan,
}

impl Default for ExecuteOrderLayout {
    fn default() -> Self {
        Self {
            order_id: FieldSpan::new(9, 12),
            executed_shares: FieldSpan::new(21, 6),
        }
    }
}

/// Trade message field positions
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TradeLayout {
    /// Shares traded
    pub shares: FieldSpan,
    /// Space-padded ticker symbol
    pub symbol: FieldSpan,
}

impl Default for TradeLayout {
    fn default() -> Self {
        Self {
            shares: FieldSpan::new(22, 6),
            symbol: FieldSpan::new(28, 6),
        }
    }
}

/// Positions of every field the replay reads
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldLayout {
    /// Message-type discriminator (one byte)
    pub message_type: FieldSpan,
    /// Add Order fields
    pub add_order: AddOrderLayout,
    /// Order Cancel fields
    pub cancel_order: CancelOrderLayout,
    /// Order Executed fields
    pub execute_order: ExecuteOrderLayout,
    /// Trade fields
    pub trade: TradeLayout,
}

impl Default for FieldLayout {
    fn default() -> Self {
        Self {
            message_type: FieldSpan::new(8, 1),
            add_order: AddOrderLayout::default(),
            cancel_order: CancelOrderLayout::default(),
            execute_order: ExecuteOrderLayout::default(),
            trade: TradeLayout::default(),
        }
    }
}

impl FieldLayout {
    /// All spans with their qualified names
    pub fn spans(&self) -> [(&'static str, FieldSpan); 10] {
        [
            ("message_type", self.message_type),
            ("add_order.order_id", self.add_order.order_id),
            ("add_order.shares", self.add_order.shares),
            ("add_order.symbol", self.add_order.symbol),
            ("cancel_order.order_id", self.cancel_order.order_id),
            ("cancel_order.canceled_shares", self.cancel_order.canceled_shares),
            ("execute_order.order_id", self.execute_order.order_id),
            ("execute_order.executed_shares", self.execute_order.executed_shares),
            ("trade.shares", self.trade.shares),
            ("trade.symbol", self.trade.symbol),
        ]
    }
}

/// Discriminator characters for each message kind
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MessageCodes {
    /// Add Order
    pub add: char,
    /// Order Cancel
    pub cancel: char,
    /// Order Executed
    pub execute: char,
    /// Trade
    pub trade: char,
    /// Trade break and long-message variants, dropped without effect
    pub ignored: Vec<char>,
}

impl Default for MessageCodes {
    fn default() -> Self {
        Self {
            add: 'A',
            cancel: 'X',
            execute: 'E',
            trade: 'P',
            ignored: vec!['B', 'r', 'd'],
        }
    }
}

/// What to do with a record that cannot be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Stop the run with an error
    #[default]
    Abort,
    /// Log a warning and continue with the next record
    Skip,
}

mod defaults {
    pub fn leading_marker() -> char {
        'S'
    }

    pub fn strip_marker() -> bool {
        true
    }

    pub fn top_n() -> usize {
        10
    }
}

/// Configuration for a replay run
///
/// # Example
///
/// ```rust
/// use pitch_volume::Config;
/// use pitch_volume::config::MalformedPolicy;
///
/// let config = Config::default()
///     .with_top_n(5)
///     .with_malformed_policy(MalformedPolicy::Skip)
///     .with_leading_marker(None);
///
/// assert_eq!(config.top_n(), 5);
/// assert_eq!(config.leading_marker(), None);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Feed file; stdin when absent
    #[serde(default)]
    input: Option<PathBuf>,

    /// Framing character that may prefix each record
    #[serde(default = "defaults::leading_marker")]
    leading_marker: char,

    /// Whether to strip `leading_marker` at all
    #[serde(default = "defaults::strip_marker")]
    strip_marker: bool,

    /// Number of symbols in the final ranking
    #[serde(default = "defaults::top_n")]
    top_n: usize,

    /// Handling of undecodable records
    #[serde(default)]
    on_malformed: MalformedPolicy,

    /// Field positions
    #[serde(default)]
    layout: FieldLayout,

    /// Discriminator characters
    #[serde(default)]
    codes: MessageCodes,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: None,
            leading_marker: defaults::leading_marker(),
            strip_marker: defaults::strip_marker(),
            top_n: defaults::top_n(),
            on_malformed: MalformedPolicy::default(),
            layout: FieldLayout::default(),
            codes: MessageCodes::default(),
        }
    }
}

impl Config {
    /// Load and validate a TOML configuration file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// fails [`Config::validate`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self, Error> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the layout and codes are usable
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for zero-width or out-of-range fields, a
    /// discriminator wider than one byte, duplicate message codes, or a
    /// `top_n` of zero.
    pub fn validate(&self) -> Result<(), Error> {
        for (name, span) in self.layout.spans() {
            if span.length == 0 {
                return Err(Error::Config(format!("field {} has zero length", name)));
            }
            if span.offset.checked_add(span.length).is_none() {
                return Err(Error::Config(format!(
                    "field {} ends past the addressable range",
                    name
                )));
            }
        }
        if self.layout.message_type.length != 1 {
            return Err(Error::Config(format!(
                "message_type must be one byte wide, got {}",
                self.layout.message_type.length
            )));
        }

        let codes = &self.codes;
        let mut seen = vec![codes.add, codes.cancel, codes.execute, codes.trade];
        seen.extend(codes.ignored.iter().copied());
        for (i, code) in seen.iter().enumerate() {
            if !code.is_ascii() {
                return Err(Error::Config(format!("message code {:?} is not ASCII", code)));
            }
            if seen[..i].contains(code) {
                return Err(Error::Config(format!("message code {:?} is used twice", code)));
            }
        }

        if self.top_n == 0 {
            return Err(Error::Config("top_n must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Set the feed file
    #[must_use]
    pub fn with_input(mut self, input: Option<PathBuf>) -> Self {
        self.input = input;
        self
    }

    /// Set (or disable with `None`) the leading marker character
    #[must_use]
    pub fn with_leading_marker(mut self, marker: Option<char>) -> Self {
        match marker {
            Some(c) => {
                self.leading_marker = c;
                self.strip_marker = true;
            }
            None => self.strip_marker = false,
        }
        self
    }

    /// Set the ranking size
    #[must_use]
    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Set the malformed-record policy
    #[must_use]
    pub fn with_malformed_policy(mut self, policy: MalformedPolicy) -> Self {
        self.on_malformed = policy;
        self
    }

    /// Replace the field layout
    #[must_use]
    pub fn with_layout(mut self, layout: FieldLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Replace the message codes
    #[must_use]
    pub fn with_codes(mut self, codes: MessageCodes) -> Self {
        self.codes = codes;
        self
    }

    /// Get the feed file, if any
    pub fn input(&self) -> Option<&Path> {
        self.input.as_deref()
    }

    /// Get the leading marker, or `None` if stripping is disabled
    pub fn leading_marker(&self) -> Option<char> {
        self.strip_marker.then_some(self.leading_marker)
    }

    /// Get the ranking size
    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Get the malformed-record policy
    pub fn malformed_policy(&self) -> MalformedPolicy {
        self.on_malformed
    }

    /// Get the field layout
    pub fn layout(&self) -> &FieldLayout {
        &self.layout
    }

    /// Get the message codes
    pub fn codes(&self) -> &MessageCodes {
        &self.codes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.input(), None);
        assert_eq!(config.leading_marker(), Some('S'));
        assert_eq!(config.top_n(), 10);
        assert_eq!(config.malformed_policy(), MalformedPolicy::Abort);
        assert_eq!(config.layout().message_type, FieldSpan::new(8, 1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.layout(), &FieldLayout::default());
        assert_eq!(config.codes(), &MessageCodes::default());
        assert_eq!(config.top_n(), 10);
    }

    #[test]
    fn test_partial_override() {
        let text = r#"
            top_n = 3
            on_malformed = "skip"
            strip_marker = false

            [layout.trade]
            shares = { offset = 30, length = 8 }

            [codes]
            ignored = ["B"]
        "#;
        let config = Config::from_toml(text).unwrap();

        assert_eq!(config.top_n(), 3);
        assert_eq!(config.malformed_policy(), MalformedPolicy::Skip);
        assert_eq!(config.leading_marker(), None);
        assert_eq!(config.layout().trade.shares, FieldSpan::new(30, 8));
        // untouched siblings keep their defaults
        assert_eq!(config.layout().trade.symbol, FieldSpan::new(28, 6));
        assert_eq!(config.codes().ignored, vec!['B']);
        assert_eq!(config.codes().add, 'A');
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = Config::from_toml("top_m = 3");
        assert!(matches!(result, Err(Error::ConfigParse(_))));
    }

    #[test]
    fn test_zero_length_field_rejected() {
        let mut layout = FieldLayout::default();
        layout.add_order.symbol.length = 0;
        let config = Config::default().with_layout(layout);

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("add_order.symbol"));
    }

    #[test]
    fn test_overflowing_field_rejected() {
        let mut layout = FieldLayout::default();
        layout.trade.shares.offset = usize::MAX;
        let config = Config::default().with_layout(layout);

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("trade.shares"), "{}", err);
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let codes = MessageCodes {
            ignored: vec!['B', 'E'],
            ..MessageCodes::default()
        };
        let config = Config::default().with_codes(codes);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_top_n_rejected() {
        let config = Config::default().with_top_n(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load("/definitely/not/here.toml");
        assert!(matches!(result, Err(Error::ConfigRead { .. })));
    }

    #[test]
    fn test_builder_pattern() {
        let config = Config::default()
            .with_input(Some(PathBuf::from("feed.txt")))
            .with_leading_marker(Some('#'))
            .with_top_n(20);

        assert_eq!(config.input(), Some(Path::new("feed.txt")));
        assert_eq!(config.leading_marker(), Some('#'));
        assert_eq!(config.top_n(), 20);
    }

    #[test]
    fn test_span_range() {
        let span = FieldSpan::new(9, 12);
        assert_eq!(span.end(), 21);
        assert_eq!(span.range(), 9..21);

        let span = FieldSpan::new(usize::MAX, 6);
        assert_eq!(span.end(), usize::MAX);
    }
}
