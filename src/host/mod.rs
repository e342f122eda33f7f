//! Host-side tooling for the `pt100_host` shell
//!
//! - **link**: serial session with a background line reader
//! - **csv_log**: append-only temperature log
//! - **console**: human-readable rendering of device lines

pub mod console;
pub mod csv_log;
pub mod link;

pub use csv_log::{SampleSource, TemperatureLog};
pub use link::DeviceSession;
