//! RP2040 analog input adapter
//!
//! This adapter implements the AnalogPort trait for the RP2040's ADC
//! inputs on GPIO26..=29. Channel numbers are resolved relative to the
//! configured analog base, so with the default base of 14 `A0` (channel
//! 14) is GPIO26 and `A3` (channel 17) is GPIO29.

use embassy_rp::adc::{Adc, Blocking, Channel as AdcChannel};

use crate::ports::analog::{AnalogError, AnalogPort};

/// Number of external ADC inputs on the RP2040
pub const ADC_INPUTS: usize = 4;

/// RP2040 ADC inputs
pub struct RpAnalogInput<'a> {
    /// ADC peripheral (blocking mode, a conversion takes ~2 µs)
    adc: Adc<'a, Blocking>,
    /// Inputs for `A0..A3`, `None` where a pin is used for something else
    inputs: [Option<AdcChannel<'a>>; ADC_INPUTS],
    /// Channel number of `A0`
    analog_base: u8,
    /// Right shift applied to each 12-bit conversion
    shift: u8,
}

impl<'a> RpAnalogInput<'a> {
    /// Create the adapter
    ///
    /// Conversions are scaled down to the 10-bit range that the default
    /// calibration (`q2=1023`) assumes.
    ///
    /// # Arguments
    ///
    /// * `adc` - ADC peripheral in blocking mode
    /// * `inputs` - ADC channels for GPIO26..=29
    /// * `analog_base` - channel number that `A0` resolves to
    pub fn new(adc: Adc<'a, Blocking>, inputs: [Option<AdcChannel<'a>>; ADC_INPUTS], analog_base: u8) -> Self {
        Self {
            adc,
            inputs,
            analog_base,
            shift: 2,
        }
    }

    /// Report raw 12-bit conversions instead of 10-bit ones
    pub fn full_resolution(mut self) -> Self {
        self.shift = 0;
        self
    }

    fn index(&self, channel: u8) -> Option<usize> {
        let index = channel.checked_sub(self.analog_base)? as usize;
        (index < ADC_INPUTS).then_some(index)
    }
}

impl<'a> AnalogPort for RpAnalogInput<'a> {
    fn sample(&mut self, channel: u8) -> Result<u16, AnalogError> {
        let input = self
            .index(channel)
            .and_then(|index| self.inputs[index].as_mut())
            .ok_or(AnalogError::UnknownChannel)?;
        let raw = self.adc.blocking_read(input).map_err(|_| AnalogError::ReadFailed)?;
        Ok(raw >> self.shift)
    }
}
