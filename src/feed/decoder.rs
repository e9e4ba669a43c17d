//! Fixed-width record decoding.
//!
//! A [`Decoder`] is stateless apart from its layout, so records can be decoded
//! independently of the order they are applied in.

use crate::config::{Config, FieldLayout, FieldSpan, MessageCodes};
use crate::error::DecodeError;
use crate::types::{AddOrder, CancelOrder, ExecuteOrder, Message, Shares, TradeMessage};

/// Decodes text records into [`Message`] values
#[derive(Debug, Clone)]
pub struct Decoder {
    layout: FieldLayout,
    codes: MessageCodes,
}

impl Decoder {
    /// Create a decoder for a layout and set of message codes
    pub fn new(layout: FieldLayout, codes: MessageCodes) -> Self {
        Self { layout, codes }
    }

    /// Create a decoder from a run configuration
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.layout().clone(), config.codes().clone())
    }

    /// Decode one record (marker already stripped)
    ///
    /// Never fails: records that cannot be decoded come back as
    /// [`Message::Malformed`] so the caller decides whether to abort.
    pub fn decode(&self, record: &str) -> Message {
        self.try_decode(record).unwrap_or_else(Message::Malformed)
    }

    fn try_decode(&self, record: &str) -> Result<Message, DecodeError> {
        if record.is_empty() {
            return Err(DecodeError::Empty);
        }
        let code = message_code(record, self.layout.message_type)?;
        let codes = &self.codes;

        if code == codes.add {
            let layout = &self.layout.add_order;
            Ok(Message::Add(AddOrder {
                order_id: field(record, "add_order.order_id", layout.order_id)?.to_string(),
                shares: shares(record, "add_order.shares", layout.shares)?,
                symbol: symbol(record, "add_order.symbol", layout.symbol)?,
            }))
        } else if code == codes.cancel {
            let layout = &self.layout.cancel_order;
            Ok(Message::Cancel(CancelOrder {
                order_id: field(record, "cancel_order.order_id", layout.order_id)?.to_string(),
                canceled_shares: shares(
                    record,
                    "cancel_order.canceled_shares",
                    layout.canceled_shares,
                )?,
            }))
        } else if code == codes.execute {
            let layout = &self.layout.execute_order;
            Ok(Message::Execute(ExecuteOrder {
                order_id: field(record, "execute_order.order_id", layout.order_id)?.to_string(),
                executed_shares: shares(
                    record,
                    "execute_order.executed_shares",
                    layout.executed_shares,
                )?,
            }))
        } else if code == codes.trade {
            let layout = &self.layout.trade;
            Ok(Message::Trade(TradeMessage {
                shares: shares(record, "trade.shares", layout.shares)?,
                symbol: symbol(record, "trade.symbol", layout.symbol)?,
            }))
        } else if codes.ignored.contains(&code) {
            Ok(Message::Ignored(code))
        } else {
            Err(DecodeError::UnknownKind(code))
        }
    }
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new(FieldLayout::default(), MessageCodes::default())
    }
}

fn message_code(record: &str, span: FieldSpan) -> Result<char, DecodeError> {
    let text = field(record, "message_type", span)?;
    text.chars()
        .next()
        .ok_or(DecodeError::InvalidText {
            field: "message_type",
        })
}

fn field<'a>(record: &'a str, name: &'static str, span: FieldSpan) -> Result<&'a str, DecodeError> {
    if record.len() < span.end() {
        return Err(DecodeError::Truncated {
            field: name,
            needed: span.end(),
            len: record.len(),
        });
    }
    record
        .get(span.range())
        .ok_or(DecodeError::InvalidText { field: name })
}

fn shares(record: &str, name: &'static str, span: FieldSpan) -> Result<Shares, DecodeError> {
    let text = field(record, name, span)?;
    let invalid = || DecodeError::InvalidShares {
        field: name,
        value: text.to_string(),
    };
    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    text.parse().map_err(|_| invalid())
}

fn symbol(record: &str, name: &'static str, span: FieldSpan) -> Result<String, DecodeError> {
    Ok(field(record, name, span)?.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoder() -> Decoder {
        Decoder::default()
    }

    #[test]
    fn test_decode_add() {
        let msg = decoder().decode("28800011AAK27GA0000DTS000100SH    0000619200Y");
        assert_eq!(
            msg,
            Message::Add(AddOrder {
                order_id: "AK27GA0000DT".to_string(),
                shares: 100,
                symbol: "SH".to_string(),
            })
        );
    }

    #[test]
    fn test_decode_cancel() {
        let msg = decoder().decode("28803234X4K27GA00003P000100");
        assert_eq!(
            msg,
            Message::Cancel(CancelOrder {
                order_id: "4K27GA00003P".to_string(),
                canceled_shares: 100,
            })
        );
    }

    #[test]
    fn test_decode_execute() {
        let msg = decoder().decode("28843493E4K27GA00002Y00110000004AQ00005");
        assert_eq!(
            msg,
            Message::Execute(ExecuteOrder {
                order_id: "4K27GA00002Y".to_string(),
                executed_shares: 1100,
            })
        );
    }

    #[test]
    fn test_decode_trade() {
        let msg = decoder().decode("28807528PCK27GA000016B000177ZVZZT 0020000000000I000HV1PJ");
        assert_eq!(
            msg,
            Message::Trade(TradeMessage {
                shares: 177,
                symbol: "ZVZZT".to_string(),
            })
        );
    }

    #[test]
    fn test_decode_ignored() {
        let d = decoder();
        assert_eq!(d.decode("28800012B000000000001"), Message::Ignored('B'));
        assert_eq!(d.decode("28800012r0000000000"), Message::Ignored('r'));
        assert_eq!(d.decode("28800012d0000000000"), Message::Ignored('d'));
    }

    #[test]
    fn test_decode_unknown_kind() {
        let msg = decoder().decode("28800012Z0000000000");
        assert_eq!(msg, Message::Malformed(DecodeError::UnknownKind('Z')));
    }

    #[test]
    fn test_decode_truncated() {
        let msg = decoder().decode("28803234X4K27GA00003P0001");
        assert_eq!(
            msg,
            Message::Malformed(DecodeError::Truncated {
                field: "cancel_order.canceled_shares",
                needed: 27,
                len: 25,
            })
        );

        let msg = decoder().decode("2880");
        assert!(matches!(
            msg,
            Message::Malformed(DecodeError::Truncated {
                field: "message_type",
                ..
            })
        ));
    }

    #[test]
    fn test_decode_span_past_usize_is_truncated() {
        let mut layout = FieldLayout::default();
        layout.trade.shares = FieldSpan::new(usize::MAX, 6);
        let decoder = Decoder::new(layout, MessageCodes::default());

        let msg = decoder.decode("28800012PCK27GA000016B000500ZVZZT 0020000000000I000HV1PJ");
        assert_eq!(
            msg,
            Message::Malformed(DecodeError::Truncated {
                field: "trade.shares",
                needed: usize::MAX,
                len: 56,
            })
        );
    }

    #[test]
    fn test_decode_non_numeric_shares() {
        let msg = decoder().decode("28803234X4K27GA00003P00 100");
        assert_eq!(
            msg,
            Message::Malformed(DecodeError::InvalidShares {
                field: "cancel_order.canceled_shares",
                value: "00 100".to_string(),
            })
        );
    }

    #[test]
    fn test_decode_empty() {
        assert_eq!(decoder().decode(""), Message::Malformed(DecodeError::Empty));
    }

    #[test]
    fn test_order_id_kept_verbatim() {
        // padding inside an order id is significant
        let msg = decoder().decode("28803234X  K27GA0003P000100");
        match msg {
            Message::Cancel(cancel) => assert_eq!(cancel.order_id, "  K27GA0003P"),
            other => panic!("expected cancel, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_codes() {
        let codes = MessageCodes {
            add: 'a',
            ..MessageCodes::default()
        };
        let d = Decoder::new(FieldLayout::default(), codes);
        assert!(matches!(
            d.decode("28800011aAK27GA0000DTS000100SH    0000619200Y"),
            Message::Add(_)
        ));
        assert_eq!(
            d.decode("28800011AAK27GA0000DTS000100SH    0000619200Y"),
            Message::Malformed(DecodeError::UnknownKind('A'))
        );
    }
}
