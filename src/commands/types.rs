//! Status types for the AT command exchange
//!
//! The module answers every command with either non-error text or a
//! reply containing the literal `+ERR` token; silence past the
//! response timeout is the third possibility. These types carry that
//! classification to the caller — none of them is fatal, the host loop
//! decides whether to retry, abort setup, or skip a poll cycle.

/// Result of sending one AT command and waiting for the reply
#[repr(i8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The module answered with non-error text
    Success = 0,

    /// The module answered with a reply containing `+ERR`, or the
    /// command was rejected before reaching the transport (driver
    /// busy, write failure, oversized payload)
    ProtocolError = 1,

    /// No bytes arrived before the response timeout
    NoResponse = -1,
}

impl CommandOutcome {
    /// True for [`CommandOutcome::Success`]
    pub fn is_success(self) -> bool {
        self == CommandOutcome::Success
    }

    /// Convert to a `Result` for sequencing callers using `?`
    pub fn into_result(self) -> Result<(), DriverError> {
        match self {
            CommandOutcome::Success => Ok(()),
            CommandOutcome::ProtocolError => Err(DriverError::CommandFailed),
            CommandOutcome::NoResponse => Err(DriverError::NoResponse),
        }
    }
}

/// Errors reported by configuration sequencing and link bring-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    /// A command was rejected or answered with `+ERR`
    CommandFailed,
    /// The module never answered
    NoResponse,
}

/// Result of one unsolicited-message poll
#[repr(i8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageState {
    /// Nothing was buffered on the link, or the poll was skipped
    /// because a command was in flight
    NoMessage = 0,

    /// A bare `+OK` acknowledgment or a parsed `+RCV` data frame
    Received = 1,

    /// Buffered data was present but not a recognisable frame
    Error = -1,
}
