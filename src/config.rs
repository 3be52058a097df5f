//! Configuration constants for the RYLR998 LoRa module

/// Serial link configuration
pub mod serial {
    /// UART symbol rate the module is strapped for
    pub const BAUD_RATE: u32 = 38_400;

    /// Terminator appended to every outbound AT command
    pub const LINE_TERMINATOR: &str = "\r\n";
}

/// Radio parameters written during configuration
pub mod lora {
    /// Network id shared by all devices in this deployment
    pub const NETWORK_ID: u8 = 18;

    /// Spreading factor (7-11 for the RYLR998)
    pub const SPREADING_FACTOR: u8 = 9;

    /// Bandwidth code (7 = 125 kHz)
    pub const BANDWIDTH: u8 = 7;

    /// Coding rate code (1 = 4/5)
    pub const CODING_RATE: u8 = 1;

    /// Preamble length in symbols
    pub const PREAMBLE: u8 = 12;

    /// Transceiver mode (0 = transmit and receive)
    pub const MODE: u8 = 0;

    /// US ISM band frequency in Hz
    pub const BAND_HZ: u32 = 915_000_000;

    /// RF output power in dBm
    pub const OUTPUT_POWER_DBM: u8 = 22;
}

/// Timing of the command/response wait loop
pub mod timing {
    /// How long to wait for the first response byte
    pub const RESPONSE_TIMEOUT_MS: u32 = 1000;

    /// Interval between available-byte polls while waiting
    pub const POLL_INTERVAL_MS: u32 = 10;

    /// Pause after bytes appear so the full reply can accumulate;
    /// the link has no framing, so this is the only defence against
    /// partial reads
    pub const SETTLE_DELAY_MS: u32 = 100;

    /// Pause before the single link-check retry during `begin`
    pub const RETRY_DELAY_MS: u32 = 1000;
}

/// Buffer capacities
pub mod limits {
    /// Largest reply or unsolicited frame kept verbatim
    pub const MAX_RESPONSE_LEN: usize = 256;

    /// Largest message payload carried in an `AT+SEND` or `+RCV`
    pub const MAX_PAYLOAD_LEN: usize = 128;

    /// Largest outbound command string
    pub const MAX_COMMAND_LEN: usize = MAX_PAYLOAD_LEN + 32;

    /// Device number, RSSI and SNR fields
    pub const MAX_FIELD_LEN: usize = 8;

    /// Module UID as reported by `AT+UID?`
    pub const MAX_UID_LEN: usize = 24;

    /// Formatted radio-parameters string from `AT+PARAMETER?`
    pub const MAX_PARAMS_LEN: usize = 64;
}
