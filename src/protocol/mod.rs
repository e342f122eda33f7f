//! Line protocol shared by the firmware and the host tool
//!
//! Requests are single text lines (`NEW`, `DEL`, `SET`, `READ`, `LIST`);
//! replies and periodic reports are single-line JSON objects terminated by
//! CRLF. The firmware parses [`Command`]s and encodes [`Response`]s and
//! [`Report`]s; the host renders commands and decodes replies with
//! [`message::DeviceMessage`] (feature `std`).

pub mod command;
pub mod line_buffer;
pub mod numeric;
pub mod response;

#[cfg(feature = "std")]
pub mod message;

pub use command::{Command, NewArgs, SetArgs};
pub use line_buffer::{LineBuffer, LineEvent};
pub use numeric::BadNumber;
pub use response::{encode, ErrorCode, ListEntry, Ready, Report, Response, RESPONSE_CAPACITY};
