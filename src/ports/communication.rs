//! Communication port - abstraction for the host serial link
//!
//! This trait allows the protocol engine to talk to the host without
//! knowing the specific transport (UART, USB CDC, test double, etc.)

/// Error type for communication operations
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommunicationError {
    /// Failed to receive input
    ReadFailed,
    /// Failed to send output
    WriteFailed,
    /// The link is gone
    Disconnected,
}

/// Port for the byte transport to the host
///
/// # Example Implementation
///
/// ```ignore
/// impl CommunicationPort for UartLink {
///     fn poll_byte(&mut self) -> Result<Option<u8>, CommunicationError> {
///         if !self.uart.read_ready()? {
///             return Ok(None);
///         }
///         let mut byte = [0u8; 1];
///         self.uart.read(&mut byte)?;
///         Ok(Some(byte[0]))
///     }
///
///     fn write_all(&mut self, bytes: &[u8]) -> Result<(), CommunicationError> {
///         self.uart.write_all(bytes)
///     }
/// }
/// ```
pub trait CommunicationPort {
    /// Next received byte, or `None` when nothing is buffered
    ///
    /// Never blocks waiting for input.
    fn poll_byte(&mut self) -> Result<Option<u8>, CommunicationError>;

    /// Send `bytes` to the host
    fn write_all(&mut self, bytes: &[u8]) -> Result<(), CommunicationError>;

    /// Send one line followed by CRLF
    fn write_line(&mut self, line: &str) -> Result<(), CommunicationError> {
        self.write_all(line.as_bytes())?;
        self.write_all(b"\r\n")
    }
}
