//! Feed ingestion and record decoding.
//!
//! Input framing and message decoding are kept apart:
//!
//! - [`reader`] splits the input into records and strips the optional
//!   leading marker character
//! - [`decoder`] turns one record into a [`Message`](crate::types::Message)
//!   using the configured field layout
//!
//! # Example
//!
//! ```rust
//! use pitch_volume::feed::{Decoder, FeedReader};
//! use pitch_volume::types::Message;
//! use pitch_volume::Config;
//!
//! let config = Config::default();
//! let decoder = Decoder::from_config(&config);
//! let input = "S28800011AAK27GA0000DTS000100SH    0000619200Y\n";
//!
//! for record in FeedReader::new(input.as_bytes(), config.leading_marker()) {
//!     let (_line, text) = record.unwrap();
//!     assert!(matches!(decoder.decode(&text), Message::Add(_)));
//! }
//! ```

pub mod decoder;
pub mod reader;

pub use decoder::Decoder;
pub use reader::{strip_marker, FeedReader};
