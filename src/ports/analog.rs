//! Analog port - abstraction for sampling analog input channels
//!
//! The core only needs "an averaged raw sample for a channel"; how a board
//! maps channel numbers to ADC inputs is the adapter's business.

/// Error type for analog sampling
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnalogError {
    /// No ADC input is wired to this channel number
    UnknownChannel,
    /// The ADC conversion failed
    ReadFailed,
}

/// Port for reading raw analog samples
///
/// # Example Implementation
///
/// ```ignore
/// struct BoardAdc {
///     adc: Adc<'static, Blocking>,
///     inputs: [AdcChannel<'static>; 4],
/// }
///
/// impl AnalogPort for BoardAdc {
///     fn sample(&mut self, channel: u8) -> Result<u16, AnalogError> {
///         let input = self.inputs.get_mut(channel as usize).ok_or(AnalogError::UnknownChannel)?;
///         self.adc.blocking_read(input).map_err(|_| AnalogError::ReadFailed)
///     }
/// }
/// ```
pub trait AnalogPort {
    /// Take a single raw sample from `channel`
    fn sample(&mut self, channel: u8) -> Result<u16, AnalogError>;

    /// Average `samples` successive raw samples (integer mean, truncating)
    ///
    /// A sample count of zero is treated as one.
    fn read_averaged(&mut self, channel: u8, samples: u16) -> Result<i32, AnalogError> {
        let count = samples.max(1);
        let mut sum: i64 = 0;
        for _ in 0..count {
            sum += self.sample(channel)? as i64;
        }
        Ok((sum / count as i64) as i32)
    }
}
