//! RYLR998 AT-command driver
//!
//! Owns the serial link to the module and implements the two halves of
//! the protocol: sending commands and waiting (with timeout) for their
//! replies, and polling for unsolicited received-packet frames. The
//! driver is single-threaded and cooperative; the busy flag is a
//! re-entrancy guard for the one control loop that polls it, not a
//! lock. A multi-threaded host must wrap the driver in real mutual
//! exclusion instead of relying on the flag.

use crate::commands::builder;
use crate::commands::types::{CommandOutcome, DriverError, MessageState};
use crate::config::limits::{
    MAX_FIELD_LEN, MAX_PARAMS_LEN, MAX_PAYLOAD_LEN, MAX_RESPONSE_LEN, MAX_UID_LEN,
};
use crate::config::lora as radio;
use crate::config::serial::LINE_TERMINATOR;
use crate::config::timing;
use crate::protocol::frame;
use crate::protocol::frame::InboundFrame;
use crate::serial::{SerialError, SerialPort};
use embedded_hal::delay::DelayNs;
use heapless::String;
use log::{debug, warn};

fn trimmed(text: &str) -> String<MAX_RESPONSE_LEN> {
    let mut s = String::new();
    // Cannot overflow: the text came out of a MAX_RESPONSE_LEN buffer
    let _ = s.push_str(text);
    s
}

/// Driver for a REYAX RYLR998-class LoRa module
///
/// Generic over the serial transport and a delay provider so the
/// command/response logic can run against mocks on the host.
pub struct Rylr998<S: SerialPort, D: DelayNs> {
    serial: S,
    delay: D,
    /// Re-entrancy guard: one command or poll in flight at a time
    busy: bool,
    received_data: String<MAX_RESPONSE_LEN>,
    device_num: String<MAX_FIELD_LEN>,
    payload: String<MAX_PAYLOAD_LEN>,
    rssi: String<MAX_FIELD_LEN>,
    snr: String<MAX_FIELD_LEN>,
    last_message_state: MessageState,
    uid: String<MAX_UID_LEN>,
    parameters: String<MAX_PARAMS_LEN>,
    network_id: u8,
    device_address: u16,
}

impl<S: SerialPort, D: DelayNs> Rylr998<S, D> {
    /// Create a new driver over an already-opened serial link
    pub fn new(serial: S, delay: D) -> Self {
        Self {
            serial,
            delay,
            busy: false,
            received_data: String::new(),
            device_num: String::new(),
            payload: String::new(),
            rssi: String::new(),
            snr: String::new(),
            last_message_state: MessageState::NoMessage,
            uid: String::new(),
            parameters: String::new(),
            network_id: radio::NETWORK_ID,
            device_address: 0,
        }
    }

    /// Check that the module answers a bare `AT`
    ///
    /// Retries exactly once after a fixed delay; no other automatic
    /// retries exist anywhere in the driver.
    pub fn begin(&mut self) -> Result<(), DriverError> {
        if self.send_command(builder::LINK_CHECK).is_success() {
            return Ok(());
        }

        debug!("link check failed, retrying once");
        self.delay.delay_ms(timing::RETRY_DELAY_MS);
        self.send_command(builder::LINK_CHECK).into_result()
    }

    /// Configure the module's radio parameters
    ///
    /// Issues the setup commands in order and stops at the first
    /// failure. The supplied device address is recorded regardless of
    /// the outcome.
    pub fn configure(&mut self, device_address: u16) -> Result<(), DriverError> {
        let result = self.apply_configuration(device_address);
        self.device_address = device_address;

        match result {
            Ok(()) => debug!("module configured"),
            Err(err) => warn!("configuration aborted: {:?}", err),
        }
        result
    }

    fn apply_configuration(&mut self, device_address: u16) -> Result<(), DriverError> {
        self.send_command(&builder::set_network_id(radio::NETWORK_ID))
            .into_result()?;
        self.send_command(&builder::set_address(device_address))
            .into_result()?;
        self.send_command(&builder::set_parameters(
            radio::SPREADING_FACTOR,
            radio::BANDWIDTH,
            radio::CODING_RATE,
            radio::PREAMBLE,
        ))
        .into_result()?;
        self.send_command(&builder::set_mode(radio::MODE))
            .into_result()?;
        self.send_command(&builder::set_band(radio::BAND_HZ))
            .into_result()?;
        self.send_command(&builder::set_output_power(radio::OUTPUT_POWER_DBM))
            .into_result()?;
        Ok(())
    }

    /// Read the module's current settings back
    ///
    /// Unlike [`configure`](Self::configure), a failed query marks the
    /// whole read as failed but the remaining queries still execute.
    /// The first failure is the one reported.
    pub fn read_settings(&mut self) -> Result<(), DriverError> {
        let mut first_err = None;

        if self.query_step(builder::QUERY_UID, &mut first_err) {
            self.uid = frame::parse_uid(&self.received_data);
        }
        self.query_step(builder::QUERY_OUTPUT_POWER, &mut first_err);
        self.query_step(builder::QUERY_NETWORK_ID, &mut first_err);
        self.query_step(builder::QUERY_ADDRESS, &mut first_err);
        if self.query_step(builder::QUERY_PARAMETERS, &mut first_err) {
            self.parameters = frame::format_parameters(&self.received_data);
        }

        match first_err {
            None => Ok(()),
            Some(err) => Err(err),
        }
    }

    fn query_step(&mut self, command: &str, first_err: &mut Option<DriverError>) -> bool {
        match self.send_command(command).into_result() {
            Ok(()) => true,
            Err(err) => {
                warn!("query {} failed: {:?}", command, err);
                first_err.get_or_insert(err);
                false
            }
        }
    }

    /// Transmit a message to another device on the network
    pub fn transmit_message(&mut self, address: u16, message: &str) -> CommandOutcome {
        match builder::send(address, message) {
            Some(command) => self.send_command(&command),
            None => {
                warn!("message too long to transmit ({} bytes)", message.len());
                CommandOutcome::ProtocolError
            }
        }
    }

    /// Send one AT command and classify the reply
    ///
    /// Rejected immediately when a command or poll is already in
    /// flight, without touching the transport; interleaving two
    /// exchanges on the half-duplex link would corrupt both.
    pub fn send_command(&mut self, command: &str) -> CommandOutcome {
        if self.busy {
            debug!("busy, rejecting command");
            return CommandOutcome::ProtocolError;
        }
        self.busy = true;

        let outcome = self.transact(command);

        self.busy = false;
        outcome
    }

    fn transact(&mut self, command: &str) -> CommandOutcome {
        self.received_data.clear();

        debug!("cmd: {}", command);
        if self.serial.write(command.as_bytes()).is_err()
            || self.serial.write(LINE_TERMINATOR.as_bytes()).is_err()
        {
            warn!("serial write failed");
            return CommandOutcome::ProtocolError;
        }

        // Poll for the first reply byte up to the response timeout
        let mut waited_ms = 0;
        let mut available = self.serial.available();
        while available == 0 && waited_ms < timing::RESPONSE_TIMEOUT_MS {
            self.delay.delay_ms(timing::POLL_INTERVAL_MS);
            waited_ms += timing::POLL_INTERVAL_MS;
            available = self.serial.available();
        }

        if available == 0 {
            debug!("no response from module");
            return CommandOutcome::NoResponse;
        }

        // Let the rest of the reply accumulate before reading
        self.delay.delay_ms(timing::SETTLE_DELAY_MS);

        let raw = match self.read_available() {
            Ok(raw) => raw,
            Err(err) => {
                warn!("serial read failed: {:?}", err);
                return CommandOutcome::ProtocolError;
            }
        };
        self.received_data = trimmed(raw.trim());
        debug!("reply: {}", &self.received_data);

        if self.received_data.contains(frame::ERROR_TOKEN) {
            CommandOutcome::ProtocolError
        } else {
            CommandOutcome::Success
        }
    }

    /// Poll for an unsolicited message from the module
    ///
    /// Clears the previously parsed fields, then reports whether a new
    /// acknowledgment or data frame arrived. When a command is already
    /// in flight the poll is skipped and the previous fields are left
    /// alone.
    pub fn check_for_received_message(&mut self) -> MessageState {
        if self.busy {
            debug!("busy, skipping receive poll");
            self.last_message_state = MessageState::NoMessage;
            return MessageState::NoMessage;
        }
        self.busy = true;

        let state = self.poll_inbound();

        self.busy = false;
        self.last_message_state = state;
        state
    }

    fn poll_inbound(&mut self) -> MessageState {
        self.clear_message_fields();

        if self.serial.available() == 0 {
            return MessageState::NoMessage;
        }

        // Let the complete unsolicited message buffer before reading
        self.delay.delay_ms(timing::SETTLE_DELAY_MS);

        let raw = match self.read_available() {
            Ok(raw) => raw,
            Err(err) => {
                warn!("serial read failed: {:?}", err);
                return MessageState::Error;
            }
        };
        self.received_data = trimmed(raw.trim());
        debug!("received data = {}", &self.received_data);

        match frame::parse(&self.received_data) {
            Ok(InboundFrame::Ack) => MessageState::Received,
            Ok(InboundFrame::Data(data)) => {
                self.device_num = data.device_num;
                self.payload = data.payload;
                self.rssi = data.rssi;
                self.snr = data.snr;
                MessageState::Received
            }
            Err(err) => {
                warn!("unparseable inbound data: {:?}", err);
                MessageState::Error
            }
        }
    }

    /// Drain everything the transport has buffered
    fn read_available(&mut self) -> Result<String<MAX_RESPONSE_LEN>, SerialError> {
        let mut text: String<MAX_RESPONSE_LEN> = String::new();
        let mut chunk = [0u8; 64];

        while self.serial.available() > 0 {
            let count = self.serial.read(&mut chunk)?;
            if count == 0 {
                break;
            }

            // Module output is ASCII; anything else is line noise
            let piece =
                core::str::from_utf8(&chunk[..count]).map_err(|_| SerialError::ReadError)?;
            if text.push_str(piece).is_err() {
                // Capacity reached, drop the remainder
                break;
            }
        }

        Ok(text)
    }

    fn clear_message_fields(&mut self) {
        self.received_data.clear();
        self.device_num.clear();
        self.payload.clear();
        self.rssi.clear();
        self.snr.clear();
        self.last_message_state = MessageState::NoMessage;
    }

    /// Raw text of the last reply or unsolicited message
    pub fn received_data(&self) -> &str {
        &self.received_data
    }

    /// Device number field of the last data frame
    pub fn device_num(&self) -> &str {
        &self.device_num
    }

    /// Payload field of the last data frame
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// RSSI field of the last data frame, in dBm
    pub fn rssi(&self) -> &str {
        &self.rssi
    }

    /// SNR field of the last data frame, in dB
    pub fn snr(&self) -> &str {
        &self.snr
    }

    /// Outcome of the last receive poll
    pub fn last_message_state(&self) -> MessageState {
        self.last_message_state
    }

    /// Module UID captured by [`read_settings`](Self::read_settings)
    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// Formatted radio parameters captured by
    /// [`read_settings`](Self::read_settings)
    pub fn parameters(&self) -> &str {
        &self.parameters
    }

    /// Network id the driver configures
    pub fn network_id(&self) -> u8 {
        self.network_id
    }

    /// Device address recorded by [`configure`](Self::configure)
    pub fn device_address(&self) -> u16 {
        self.device_address
    }

    /// True while a command or poll is in flight
    pub fn is_busy(&self) -> bool {
        self.busy
    }
}
