//! PT100 Sensor Bank Library
//!
//! Firmware core for a bank of resistance-temperature sensors, each
//! calibrated by a two-point linear map from a raw ADC reading to a
//! temperature. A host drives the bank over a serial link with single-line
//! text commands; sensors with a report interval also emit periodic
//! temperature reports on their own.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Domain Layer                                 │
//! │  - Calibration: two-point linear map                             │
//! │  - ReportSchedule: interval gate for periodic reports            │
//! │  - SensorRegistry: fixed 8-slot table keyed by sensor id         │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Protocol + Service                           │
//! │  - LineBuffer / Command / Response: text protocol                │
//! │  - Controller: tick = drain input, dispatch, report              │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Ports (Traits)                               │
//! │  - AnalogPort: averaged raw samples per channel                  │
//! │  - CommunicationPort: byte transport                             │
//! │  - Clock: milliseconds since boot                                │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Adapters                                     │
//! │  - SerialLink: any embedded-io UART                              │
//! │  - RpAnalogInput: RP2040 ADC (feature `embedded`)                │
//! │  - EmbassyClock: embassy-time (feature `embedded`)               │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `std` feature adds the [`host`] module used by the `pt100_host` shell.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod config;

/// Domain layer - pure business logic
pub mod domain;

/// Line protocol (shared between host and device)
pub mod protocol;

/// Ports - traits defining boundaries
pub mod ports;

/// Adapters - concrete implementations
pub mod adapters;

/// Application services driven by the scheduler loop
pub mod service;

/// Host-side tooling (serial session, CSV log)
#[cfg(feature = "std")]
pub mod host;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{FirmwareConfig, NumberParsing, LINE_CAPACITY, MAX_NAME_LEN, MAX_SENSORS};

// Re-export key domain types
pub use domain::{Calibration, ReportSchedule, Sensor, SensorName, SensorRegistry};

// Re-export key port traits
pub use ports::{AnalogPort, Clock, CommunicationPort};

// Re-export protocol entry points
pub use protocol::{Command, ErrorCode, LineBuffer, Report, Response};

pub use service::Controller;
