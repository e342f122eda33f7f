//! Ports (interfaces) defining the boundaries of the application
//!
//! Ports are traits that define how the sensor bank interacts with the
//! hardware around it:
//!
//! - **AnalogPort**: raw ADC samples per channel (RP2040 ADC, test double)
//! - **CommunicationPort**: the serial byte transport to the host
//! - **Clock**: milliseconds since boot
//!
//! Every port is synchronous. The firmware runs one cooperative tick at a
//! time and no operation inside a tick may suspend.

pub mod analog;
pub mod clock;
pub mod communication;

pub use analog::{AnalogError, AnalogPort};
pub use clock::Clock;
pub use communication::{CommunicationError, CommunicationPort};
