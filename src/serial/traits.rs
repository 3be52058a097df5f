//! Serial port trait for abstraction and testability
//!
//! This trait defines the interface for the byte stream connecting the
//! host to the LoRa module, allowing the actual UART driver to be
//! swapped with a mock for testing.

/// Errors that can occur during serial operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerialError {
    /// Buffer overflow
    OverflowError,
    /// Read error
    ReadError,
    /// Write error
    WriteError,
}

/// Abstract serial port interface for testability
///
/// The module side of the link is half duplex at the protocol level:
/// one command in flight, replies and unsolicited frames arrive as
/// unframed text. The driver therefore only needs best-effort buffered
/// reads plus an available-byte count to decide whether anything has
/// arrived at all.
pub trait SerialPort {
    /// Number of bytes currently buffered and readable
    fn available(&mut self) -> usize;

    /// Read bytes into buffer
    ///
    /// Returns the number of bytes actually read. May return fewer
    /// bytes than the buffer size if less data is buffered.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, SerialError>;

    /// Write bytes from buffer
    fn write(&mut self, data: &[u8]) -> Result<(), SerialError>;
}
