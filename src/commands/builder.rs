//! AT command construction for the RYLR998
//!
//! Builds the command strings the driver writes to the module. The
//! line terminator is appended by the transport layer, not here.

use crate::config::limits::{MAX_COMMAND_LEN, MAX_PAYLOAD_LEN};
use core::fmt::Write;
use heapless::String;

/// An outbound AT command, without its line terminator
pub type CommandString = String<MAX_COMMAND_LEN>;

/// Bare link check, answered with `+OK` when the module is ready
pub const LINK_CHECK: &str = "AT";

/// Query the factory-programmed module UID
pub const QUERY_UID: &str = "AT+UID?";

/// Query the configured RF output power
pub const QUERY_OUTPUT_POWER: &str = "AT+CRFOP?";

/// Query the configured network id
pub const QUERY_NETWORK_ID: &str = "AT+NETWORKID?";

/// Query the configured device address
pub const QUERY_ADDRESS: &str = "AT+ADDRESS?";

/// Query the radio parameters (SF, bandwidth, coding rate, preamble)
pub const QUERY_PARAMETERS: &str = "AT+PARAMETER?";

fn format(args: core::fmt::Arguments) -> CommandString {
    let mut s = CommandString::new();
    // Capacity is ample for every fixed-shape command below
    let _ = s.write_fmt(args);
    s
}

/// `AT+NETWORKID=<id>`
pub fn set_network_id(id: u8) -> CommandString {
    format(format_args!("AT+NETWORKID={}", id))
}

/// `AT+ADDRESS=<address>`
pub fn set_address(address: u16) -> CommandString {
    format(format_args!("AT+ADDRESS={}", address))
}

/// `AT+PARAMETER=<sf>,<bandwidth>,<coding rate>,<preamble>`
pub fn set_parameters(
    spreading_factor: u8,
    bandwidth: u8,
    coding_rate: u8,
    preamble: u8,
) -> CommandString {
    format(format_args!(
        "AT+PARAMETER={},{},{},{}",
        spreading_factor, bandwidth, coding_rate, preamble
    ))
}

/// `AT+MODE=<mode>`
pub fn set_mode(mode: u8) -> CommandString {
    format(format_args!("AT+MODE={}", mode))
}

/// `AT+BAND=<frequency in Hz>`
pub fn set_band(frequency_hz: u32) -> CommandString {
    format(format_args!("AT+BAND={}", frequency_hz))
}

/// `AT+CRFOP=<power in dBm>`
pub fn set_output_power(power_dbm: u8) -> CommandString {
    format(format_args!("AT+CRFOP={}", power_dbm))
}

/// `AT+SEND=<address>,<byte count>,<message>`
///
/// Returns `None` if the message exceeds the payload capacity; the
/// command must not be truncated mid-payload on the wire.
pub fn send(address: u16, message: &str) -> Option<CommandString> {
    if message.len() > MAX_PAYLOAD_LEN {
        return None;
    }

    Some(format(format_args!(
        "AT+SEND={},{},{}",
        address,
        message.len(),
        message
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_network_id() {
        assert_eq!(set_network_id(18).as_str(), "AT+NETWORKID=18");
    }

    #[test]
    fn test_set_address() {
        assert_eq!(set_address(57).as_str(), "AT+ADDRESS=57");
    }

    #[test]
    fn test_set_parameters() {
        assert_eq!(set_parameters(9, 7, 1, 12).as_str(), "AT+PARAMETER=9,7,1,12");
    }

    #[test]
    fn test_set_mode_band_power() {
        assert_eq!(set_mode(0).as_str(), "AT+MODE=0");
        assert_eq!(set_band(915_000_000).as_str(), "AT+BAND=915000000");
        assert_eq!(set_output_power(22).as_str(), "AT+CRFOP=22");
    }

    #[test]
    fn test_send() {
        let cmd = send(12, "hello").expect("Should build");
        assert_eq!(cmd.as_str(), "AT+SEND=12,5,hello");
    }

    #[test]
    fn test_send_empty_message() {
        let cmd = send(3, "").expect("Should build");
        assert_eq!(cmd.as_str(), "AT+SEND=3,0,");
    }

    #[test]
    fn test_send_oversized_message() {
        let long = "x".repeat(MAX_PAYLOAD_LEN + 1);
        assert!(send(1, &long).is_none());
    }
}
