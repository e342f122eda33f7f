//! Serial link adapter
//!
//! Implements the CommunicationPort trait for any blocking `embedded-io`
//! stream that can report whether input is pending, e.g. embassy-rp's
//! `BufferedUart`.

use embedded_io::{Read, ReadReady, Write};

use crate::ports::communication::{CommunicationError, CommunicationPort};

/// Host link over an `embedded-io` byte stream
pub struct SerialLink<T> {
    io: T,
}

impl<T> SerialLink<T> {
    pub fn new(io: T) -> Self {
        Self { io }
    }

    /// Get the underlying stream
    pub fn inner(&self) -> &T {
        &self.io
    }

    /// Get mutable access to the underlying stream
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.io
    }

    pub fn into_inner(self) -> T {
        self.io
    }
}

impl<T: Read + ReadReady + Write> CommunicationPort for SerialLink<T> {
    fn poll_byte(&mut self) -> Result<Option<u8>, CommunicationError> {
        let ready = self
            .io
            .read_ready()
            .map_err(|_| CommunicationError::ReadFailed)?;
        if !ready {
            return Ok(None);
        }

        let mut byte = [0u8; 1];
        match self.io.read(&mut byte) {
            Ok(0) => Err(CommunicationError::Disconnected),
            Ok(_) => Ok(Some(byte[0])),
            Err(_) => Err(CommunicationError::ReadFailed),
        }
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), CommunicationError> {
        self.io
            .write_all(bytes)
            .map_err(|_| CommunicationError::WriteFailed)
    }

    fn write_line(&mut self, line: &str) -> Result<(), CommunicationError> {
        self.write_all(line.as_bytes())?;
        self.write_all(b"\r\n")?;
        self.io.flush().map_err(|_| CommunicationError::WriteFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use std::collections::VecDeque;

    /// Loopback-style stream: reads from `rx`, writes into `tx`
    #[derive(Default)]
    struct FakeUart {
        rx: VecDeque<u8>,
        tx: Vec<u8>,
        closed: bool,
        flushes: usize,
    }

    impl embedded_io::ErrorType for FakeUart {
        type Error = Infallible;
    }

    impl Read for FakeUart {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            let mut n = 0;
            while n < buf.len() {
                match self.rx.pop_front() {
                    Some(b) => buf[n] = b,
                    None => break,
                }
                n += 1;
            }
            Ok(n)
        }
    }

    impl ReadReady for FakeUart {
        fn read_ready(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.rx.is_empty() || self.closed)
        }
    }

    impl Write for FakeUart {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            self.tx.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn test_poll_byte_never_blocks() {
        let mut link = SerialLink::new(FakeUart::default());
        assert_eq!(link.poll_byte(), Ok(None));

        link.inner_mut().rx.extend(b"OK");
        assert_eq!(link.poll_byte(), Ok(Some(b'O')));
        assert_eq!(link.poll_byte(), Ok(Some(b'K')));
        assert_eq!(link.poll_byte(), Ok(None));
    }

    #[test]
    fn test_closed_stream_is_disconnected() {
        let mut link = SerialLink::new(FakeUart {
            closed: true,
            ..Default::default()
        });
        assert_eq!(link.poll_byte(), Err(CommunicationError::Disconnected));
    }

    #[test]
    fn test_write_line_appends_crlf_and_flushes() {
        let mut link = SerialLink::new(FakeUart::default());
        link.write_line(r#"{"ok":true}"#).unwrap();

        let uart = link.into_inner();
        assert_eq!(uart.tx, b"{\"ok\":true}\r\n");
        assert_eq!(uart.flushes, 1);
    }
}
