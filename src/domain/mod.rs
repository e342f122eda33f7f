//! Domain layer - pure business logic independent of infrastructure
//!
//! This module contains the sensor bank's entities: the two-point
//! calibration, the report schedule, the sensor record and the fixed-size
//! registry that owns every sensor.

pub mod calibration;
pub mod registry;
pub mod schedule;
pub mod sensor;

pub use calibration::Calibration;
pub use registry::{RegistryError, SensorRegistry};
pub use schedule::ReportSchedule;
pub use sensor::{NewSensor, Sensor, SensorName, SensorUpdate};
