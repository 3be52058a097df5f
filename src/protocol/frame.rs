//! Classification and field extraction for module replies
//!
//! Unsolicited text from the module is either a bare `+OK`
//! acknowledgment or a received-packet frame:
//!
//! ```text
//! +RCV=<device number>,<byte count>,<payload>,<rssi>,<snr>
//! ```
//!
//! A well-formed frame has exactly four commas after the `+RCV=`
//! prefix; the payload may not validly contain commas. Frames with
//! any other comma count are rejected outright rather than sliced on
//! a best-effort basis.

use crate::config::limits::{MAX_FIELD_LEN, MAX_PARAMS_LEN, MAX_PAYLOAD_LEN, MAX_UID_LEN};
use heapless::String;

/// Exact acknowledgment token for a previously sent command
pub const ACK_TOKEN: &str = "+OK";

/// Substring marking an explicit error reply
pub const ERROR_TOKEN: &str = "+ERR";

/// Prefix of a received-packet frame
pub const RCV_PREFIX: &str = "+RCV=";

const UID_PREFIX: &str = "+UID=";
const PARAMETER_PREFIX: &str = "+PARAMETER=";

/// Field count of a well-formed `+RCV` frame
const RCV_FIELD_COUNT: usize = 5;

/// Errors that can occur while classifying inbound text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// The text is neither an acknowledgment nor a `+RCV` frame
    UnexpectedFrame,
    /// The text claims to be a `+RCV` frame but the prefix or field
    /// count is wrong, or a field does not fit its buffer
    MalformedFrame,
}

/// Fields of a received-packet frame
///
/// The byte-count field is validated positionally during parsing but
/// not retained; the payload text carries its own length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFrame {
    /// Address of the transmitting device
    pub device_num: String<MAX_FIELD_LEN>,
    /// Message payload
    pub payload: String<MAX_PAYLOAD_LEN>,
    /// Received signal strength in dBm
    pub rssi: String<MAX_FIELD_LEN>,
    /// Signal-to-noise ratio in dB
    pub snr: String<MAX_FIELD_LEN>,
}

/// A classified unsolicited message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
    /// Bare `+OK` link acknowledgment, no fields
    Ack,
    /// Received over-the-air packet
    Data(DataFrame),
}

fn field<const N: usize>(text: &str) -> Result<String<N>, FrameError> {
    let mut s = String::new();
    s.push_str(text).map_err(|_| FrameError::MalformedFrame)?;
    Ok(s)
}

/// Classify trimmed inbound text and extract data-frame fields
pub fn parse(text: &str) -> Result<InboundFrame, FrameError> {
    // The acknowledgment must be the exact 3-character token; a reply
    // merely starting with "+OK" is not a bare acknowledgment
    if text == ACK_TOKEN {
        return Ok(InboundFrame::Ack);
    }

    if !text.contains("+RCV") {
        return Err(FrameError::UnexpectedFrame);
    }

    let body = text
        .strip_prefix(RCV_PREFIX)
        .ok_or(FrameError::MalformedFrame)?;

    if body.split(',').count() != RCV_FIELD_COUNT {
        return Err(FrameError::MalformedFrame);
    }

    let mut fields = body.split(',');
    let device_num = fields.next().unwrap_or_default();
    let _byte_count = fields.next().unwrap_or_default();
    let payload = fields.next().unwrap_or_default();
    let rssi = fields.next().unwrap_or_default();
    let snr = fields.next().unwrap_or_default();

    Ok(InboundFrame::Data(DataFrame {
        device_num: field(device_num)?,
        payload: field(payload)?,
        rssi: field(rssi)?,
        snr: field(snr)?,
    }))
}

/// Extract the module UID from an `AT+UID?` reply
///
/// Strips the `+UID=` prefix and trims; truncates if the reply is
/// unexpectedly long.
pub fn parse_uid(text: &str) -> String<MAX_UID_LEN> {
    let body = text.strip_prefix(UID_PREFIX).unwrap_or(text).trim();

    let mut uid = String::new();
    for ch in body.chars() {
        if uid.push(ch).is_err() {
            break;
        }
    }
    uid
}

/// Format an `AT+PARAMETER?` reply for display
///
/// Rewrites the comma-separated values to colon-separated and wraps
/// them in brackets: `+PARAMETER=9,7,1,12` becomes `[9:7:1:12]`.
pub fn format_parameters(text: &str) -> String<MAX_PARAMS_LEN> {
    let body = text.strip_prefix(PARAMETER_PREFIX).unwrap_or(text).trim();

    let mut formatted = String::new();
    let _ = formatted.push('[');
    for ch in body.chars() {
        let out = if ch == ',' { ':' } else { ch };
        if formatted.push(out).is_err() {
            break;
        }
    }
    let _ = formatted.push(']');
    formatted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_frame() {
        let frame = parse("+RCV=12,5,hello,-80,9").expect("Should parse");
        match frame {
            InboundFrame::Data(data) => {
                assert_eq!(data.device_num.as_str(), "12");
                assert_eq!(data.payload.as_str(), "hello");
                assert_eq!(data.rssi.as_str(), "-80");
                assert_eq!(data.snr.as_str(), "9");
            }
            other => panic!("Expected data frame, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_ack() {
        assert_eq!(parse("+OK"), Ok(InboundFrame::Ack));
    }

    #[test]
    fn test_ack_with_trailing_text_is_not_ack() {
        // "+OK something" is not a bare acknowledgment and carries no
        // "+RCV", so it is an unexpected frame
        assert_eq!(parse("+OK something"), Err(FrameError::UnexpectedFrame));
    }

    #[test]
    fn test_parse_unexpected_text() {
        assert_eq!(parse("+READY"), Err(FrameError::UnexpectedFrame));
        assert_eq!(parse("garbage"), Err(FrameError::UnexpectedFrame));
    }

    #[test]
    fn test_too_few_fields_rejected() {
        assert_eq!(parse("+RCV=12,5,hello,-80"), Err(FrameError::MalformedFrame));
        assert_eq!(parse("+RCV=12"), Err(FrameError::MalformedFrame));
    }

    #[test]
    fn test_payload_with_comma_rejected() {
        // Six fields after the prefix; the payload cannot validly
        // contain commas, so this is malformed rather than sliced
        assert_eq!(
            parse("+RCV=12,7,he,llo,-80,9"),
            Err(FrameError::MalformedFrame)
        );
    }

    #[test]
    fn test_rcv_not_at_start_rejected() {
        assert_eq!(
            parse("noise+RCV=12,5,hello,-80,9"),
            Err(FrameError::MalformedFrame)
        );
    }

    #[test]
    fn test_empty_payload_field() {
        let frame = parse("+RCV=3,0,,-42,11").expect("Should parse");
        match frame {
            InboundFrame::Data(data) => {
                assert_eq!(data.payload.as_str(), "");
                assert_eq!(data.rssi.as_str(), "-42");
            }
            other => panic!("Expected data frame, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_uid() {
        assert_eq!(parse_uid("+UID=0123456789AB").as_str(), "0123456789AB");
        // Prefix missing: keep the raw text rather than losing it
        assert_eq!(parse_uid(" 42AB \r\n").as_str(), "42AB");
    }

    #[test]
    fn test_format_parameters() {
        assert_eq!(format_parameters("+PARAMETER=9,7,1,12").as_str(), "[9:7:1:12]");
        assert_eq!(format_parameters("9,7,1,12").as_str(), "[9:7:1:12]");
    }
}
