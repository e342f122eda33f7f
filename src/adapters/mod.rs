//! Adapters - concrete implementations of ports
//!
//! Adapters connect the sensor bank to the outside world by implementing
//! the port traits. Each adapter knows how to work with a specific
//! technology or hardware.
//!
//! # Available Adapters
//!
//! - **serial_link**: any `embedded-io` byte stream (UART, test double)
//! - **rp_adc**: RP2040 ADC inputs (feature `embedded`)
//! - **embassy_clock**: embassy-time uptime clock (feature `embedded`)

pub mod serial_link;

#[cfg(feature = "embedded")]
pub mod embassy_clock;
#[cfg(feature = "embedded")]
pub mod rp_adc;

pub use serial_link::SerialLink;

#[cfg(feature = "embedded")]
pub use embassy_clock::EmbassyClock;
#[cfg(feature = "embedded")]
pub use rp_adc::RpAnalogInput;
