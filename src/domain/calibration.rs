//! Two-point temperature calibration
//!
//! Converts averaged raw ADC readings to temperature using the line through
//! two reference points:
//! `T = t1 + (raw - q1) * (t2 - t1) / (q2 - q1)`

/// Two-point calibration parameters
///
/// `q1` and `q2` are raw readings taken at reference temperatures `t1` and
/// `t2`. The constructor and every setter keep `q1 != q2`, so the
/// interpolation divisor is never zero.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Calibration {
    t1: f32,
    q1: i32,
    t2: f32,
    q2: i32,
}

impl Calibration {
    /// Uncalibrated 10-bit ADC: raw 0 is 0 °C, raw 1023 is 100 °C
    pub const DEFAULT: Self = Self {
        t1: 0.0,
        q1: 0,
        t2: 100.0,
        q2: 1023,
    };

    /// Create a calibration from two (raw, temperature) points
    ///
    /// When both raw points are equal `q2` becomes `q1 + 1`.
    pub const fn new(t1: f32, q1: i32, t2: f32, q2: i32) -> Self {
        Self {
            t1,
            q1,
            t2,
            q2: Self::separate(q1, q2),
        }
    }

    /// Temperature at the first reference point
    pub const fn t1(&self) -> f32 {
        self.t1
    }

    /// Raw reading at the first reference point
    pub const fn q1(&self) -> i32 {
        self.q1
    }

    /// Temperature at the second reference point
    pub const fn t2(&self) -> f32 {
        self.t2
    }

    /// Raw reading at the second reference point
    pub const fn q2(&self) -> i32 {
        self.q2
    }

    /// Replace any subset of the four parameters
    ///
    /// Unspecified parameters keep their value. The `q1 != q2` fix-up is
    /// applied to the merged result.
    pub fn update(&mut self, t1: Option<f32>, q1: Option<i32>, t2: Option<f32>, q2: Option<i32>) {
        *self = Self::new(
            t1.unwrap_or(self.t1),
            q1.unwrap_or(self.q1),
            t2.unwrap_or(self.t2),
            q2.unwrap_or(self.q2),
        );
    }

    /// Convert an averaged raw reading to temperature in Celsius
    #[inline]
    pub fn temperature(&self, raw: i32) -> f32 {
        let dq = self.q2 as i64 - self.q1 as i64;
        let dt = self.t2 - self.t1;
        self.t1 + ((raw as i64 - self.q1 as i64) as f32 * dt) / dq as f32
    }

    const fn separate(q1: i32, q2: i32) -> i32 {
        if q1 == q2 {
            q1.wrapping_add(1)
        } else {
            q2
        }
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::DEFAULT
    }
}
