//! Sensor domain entity
//!
//! One calibrated PT100 input: identity, analog channel, display name,
//! calibration and report schedule. The registry owns every `Sensor`; other
//! components only borrow one for the duration of a dispatch or report pass.

use heapless::String;

use crate::config::{DEFAULT_NAME, MAX_NAME_LEN};
use crate::domain::{Calibration, ReportSchedule};
use crate::ports::analog::{AnalogError, AnalogPort};

/// Bounded display name
pub type SensorName = String<MAX_NAME_LEN>;

/// Build a sensor name, truncating to [`MAX_NAME_LEN`] bytes on a character boundary
pub fn sensor_name(s: &str) -> SensorName {
    let mut end = s.len().min(MAX_NAME_LEN);
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    let mut name = SensorName::new();
    // Cannot fail: `end` is at most the capacity
    let _ = name.push_str(&s[..end]);
    name
}

/// The name given to sensors created without one
pub fn default_name() -> SensorName {
    sensor_name(DEFAULT_NAME)
}

/// A calibrated temperature sensor
#[derive(Clone, Debug, PartialEq)]
pub struct Sensor {
    id: u8,
    /// Whether the sensor takes part in periodic reporting
    pub active: bool,
    /// Physical analog input the sensor is wired to
    pub channel: u8,
    /// Display label
    pub name: SensorName,
    calibration: Calibration,
    last_temp: Option<f32>,
    schedule: ReportSchedule,
}

/// Everything needed to create a sensor
#[derive(Clone, Debug, PartialEq)]
pub struct NewSensor {
    pub id: u8,
    pub channel: u8,
    pub active: bool,
    pub name: SensorName,
    pub calibration: Calibration,
    pub interval_ms: u32,
}

impl NewSensor {
    /// Inactive sensor with the default name, calibration and no reporting
    pub fn new(id: u8, channel: u8) -> Self {
        Self {
            id,
            channel,
            active: false,
            name: default_name(),
            calibration: Calibration::DEFAULT,
            interval_ms: 0,
        }
    }
}

/// Partial update; `None` fields keep their current value
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SensorUpdate {
    pub active: Option<bool>,
    pub channel: Option<u8>,
    pub name: Option<SensorName>,
    pub t1: Option<f32>,
    pub q1: Option<i32>,
    pub t2: Option<f32>,
    pub q2: Option<i32>,
    pub interval_ms: Option<u32>,
}

impl Sensor {
    /// Build a sensor from its creation parameters at time `now_ms`
    pub fn new(params: NewSensor, now_ms: u32) -> Self {
        Self {
            id: params.id,
            active: params.active,
            channel: params.channel,
            name: params.name,
            calibration: params.calibration,
            last_temp: None,
            schedule: ReportSchedule::new(params.interval_ms, now_ms),
        }
    }

    /// Registry key
    pub const fn id(&self) -> u8 {
        self.id
    }

    pub const fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub const fn schedule(&self) -> &ReportSchedule {
        &self.schedule
    }

    /// Report interval in milliseconds (0 = disabled)
    pub const fn report_interval_ms(&self) -> u32 {
        self.schedule.interval_ms()
    }

    /// Most recently computed temperature, if any
    pub const fn last_temp(&self) -> Option<f32> {
        self.last_temp
    }

    /// Apply a partial update at time `now_ms`
    ///
    /// Calibration changes re-apply the `q1 != q2` fix-up. Supplying an
    /// interval resets the report clock.
    pub fn apply(&mut self, update: SensorUpdate, now_ms: u32) {
        if let Some(active) = update.active {
            self.active = active;
        }
        if let Some(channel) = update.channel {
            self.channel = channel;
        }
        if let Some(name) = update.name {
            self.name = name;
        }
        self.calibration
            .update(update.t1, update.q1, update.t2, update.q2);
        if let Some(interval_ms) = update.interval_ms {
            self.schedule.reset(interval_ms, now_ms);
        }
    }

    /// Convert a raw sample to temperature and remember it
    pub fn compute_temperature(&mut self, raw: i32) -> f32 {
        let temp = self.calibration.temperature(raw);
        self.last_temp = Some(temp);
        temp
    }

    /// Sample the sensor's channel and compute its temperature
    pub fn read_temperature<A: AnalogPort>(
        &mut self,
        analog: &mut A,
        samples: u16,
    ) -> Result<f32, AnalogError> {
        let raw = analog.read_averaged(self.channel, samples)?;
        Ok(self.compute_temperature(raw))
    }

    /// Periodic report gate
    ///
    /// True at most once per elapsed interval, and only for active sensors
    /// with a nonzero interval. Does not touch any state when it returns false.
    pub fn should_report(&mut self, now_ms: u32) -> bool {
        self.active && self.schedule.poll(now_ms)
    }
}
