//! Line assembly for the serial command protocol
//!
//! Bytes accumulate until `\n` or `\r`. A line longer than the buffer is
//! dropped: the overflow is reported once and everything up to the next
//! terminator is discarded, so the tail of an oversized line is never
//! mistaken for a command.

use heapless::Vec;

/// What a pushed byte completed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineEvent {
    /// A non-empty line is ready in the buffer
    Line,
    /// The in-flight line exceeded the capacity and was dropped
    Overflow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Accumulating,
    Discarding,
}

/// Bounded line accumulator
#[derive(Clone, Debug)]
pub struct LineBuffer<const N: usize> {
    buf: Vec<u8, N>,
    state: State,
}

impl<const N: usize> Default for LineBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> LineBuffer<N> {
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            state: State::Accumulating,
        }
    }

    /// Feed one received byte
    ///
    /// After `Some(LineEvent::Line)` the caller reads [`Self::line`] and
    /// then calls [`Self::clear`] before pushing more bytes. Empty lines
    /// produce no event.
    pub fn push(&mut self, byte: u8) -> Option<LineEvent> {
        let terminator = byte == b'\n' || byte == b'\r';
        match self.state {
            State::Discarding => {
                if terminator {
                    self.state = State::Accumulating;
                }
                None
            }
            State::Accumulating if terminator => (!self.buf.is_empty()).then_some(LineEvent::Line),
            State::Accumulating => {
                if self.buf.push(byte).is_err() {
                    self.buf.clear();
                    self.state = State::Discarding;
                    return Some(LineEvent::Overflow);
                }
                None
            }
        }
    }

    /// The assembled line
    ///
    /// Bytes after an invalid UTF-8 sequence are dropped.
    pub fn line(&self) -> &str {
        match core::str::from_utf8(&self.buf) {
            Ok(line) => line,
            Err(e) => core::str::from_utf8(&self.buf[..e.valid_up_to()]).unwrap_or_default(),
        }
    }

    /// Number of bytes accumulated so far
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Forget the current line
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}
