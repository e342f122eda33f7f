//! Application services
//!
//! The [`Controller`] is what the firmware main loop drives: every tick it
//! drains the serial input, dispatches completed command lines against the
//! registry and then lets the [`reporter`] emit due periodic reports.

use core::fmt::Display;

use crate::ports::{CommunicationError, CommunicationPort};
use crate::protocol::response::{encode, RESPONSE_CAPACITY};

pub mod controller;
pub mod reporter;

pub use controller::Controller;
pub use reporter::report_due;

/// Encode `message` and write it as one line
///
/// Only transport failures are returned. A message that does not fit the
/// line buffer is logged and dropped; the link itself is still healthy.
fn send<C: CommunicationPort, T: Display>(serial: &mut C, message: &T) -> Result<(), CommunicationError> {
    match encode(message) {
        Ok(line) => serial.write_line(&line),
        Err(_) => {
            error!("response longer than {} bytes dropped", RESPONSE_CAPACITY);
            Ok(())
        }
    }
}
