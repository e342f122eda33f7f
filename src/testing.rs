//! Test doubles for the ports

use std::cell::Cell;
use std::collections::{HashMap, VecDeque};

use crate::ports::{AnalogError, AnalogPort, Clock, CommunicationError, CommunicationPort};

/// Analog input returning fixed raw values
pub struct FixedAnalog {
    default: u16,
    per_channel: HashMap<u8, u16>,
    only: Option<u8>,
    failing: bool,
    /// Total number of samples taken
    pub samples_taken: usize,
}

impl FixedAnalog {
    /// Every channel reads `value`
    pub fn new(value: u16) -> Self {
        Self {
            default: value,
            per_channel: HashMap::new(),
            only: None,
            failing: false,
            samples_taken: 0,
        }
    }

    /// Only `channel` is wired; others fail with `UnknownChannel`
    pub fn only_channel(mut self, channel: u8) -> Self {
        self.only = Some(channel);
        self
    }

    /// Every conversion fails with `ReadFailed`
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Override the value of one channel
    pub fn set(&mut self, channel: u8, value: u16) {
        self.per_channel.insert(channel, value);
    }
}

impl AnalogPort for FixedAnalog {
    fn sample(&mut self, channel: u8) -> Result<u16, AnalogError> {
        if self.only.is_some_and(|only| only != channel) {
            return Err(AnalogError::UnknownChannel);
        }
        if self.failing {
            return Err(AnalogError::ReadFailed);
        }
        self.samples_taken += 1;
        Ok(self.per_channel.get(&channel).copied().unwrap_or(self.default))
    }
}

/// Serial link fed from a script, capturing everything written
#[derive(Default)]
pub struct ScriptedLink {
    input: VecDeque<u8>,
    output: Vec<u8>,
    /// Fail every write once set
    pub broken: bool,
}

impl ScriptedLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes as if the host had sent them
    pub fn send(&mut self, text: &str) {
        self.input.extend(text.as_bytes());
    }

    /// Raw bytes written so far
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Drain complete CRLF-terminated output lines
    pub fn take_lines(&mut self) -> Vec<String> {
        let text = String::from_utf8(std::mem::take(&mut self.output)).expect("utf-8 output");
        let mut lines: Vec<String> = text.split("\r\n").map(str::to_owned).collect();
        // Text after the last CRLF is an unterminated line
        let tail = lines.pop().unwrap_or_default();
        assert!(tail.is_empty(), "unterminated output: {tail:?}");
        lines
    }
}

impl CommunicationPort for ScriptedLink {
    fn poll_byte(&mut self) -> Result<Option<u8>, CommunicationError> {
        Ok(self.input.pop_front())
    }

    fn write_all(&mut self, bytes: &[u8]) -> Result<(), CommunicationError> {
        if self.broken {
            return Err(CommunicationError::WriteFailed);
        }
        self.output.extend_from_slice(bytes);
        Ok(())
    }
}

/// Hand-driven millisecond clock
#[derive(Default)]
pub struct ManualClock {
    now: Cell<u32>,
}

impl ManualClock {
    pub fn at(now_ms: u32) -> Self {
        Self {
            now: Cell::new(now_ms),
        }
    }

    pub fn set(&self, now_ms: u32) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u32 {
        self.now.get()
    }
}
