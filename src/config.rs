//! Firmware configuration
//!
//! Compile-time limits of the sensor bank plus the small set of runtime
//! knobs the firmware entry point chooses at boot.

/// Number of sensor slots in the registry
pub const MAX_SENSORS: usize = 8;

/// Longest command line (content bytes, terminator excluded)
pub const LINE_CAPACITY: usize = 160;

/// Longest sensor display name in bytes
pub const MAX_NAME_LEN: usize = 20;

/// Name given to sensors created without `name=`
pub const DEFAULT_NAME: &str = "PT100";

/// Default serial baud rate
pub const DEFAULT_BAUD: u32 = 9600;

/// Arduino-style `A0` channel number
pub const DEFAULT_ANALOG_BASE: u8 = 14;

/// Raw samples averaged per temperature computation
pub const DEFAULT_SAMPLES_PER_READ: u16 = 63;

/// How numeric command arguments are parsed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NumberParsing {
    /// Malformed numbers read as 0 (`atoi`/`atof` behaviour the host tooling relies on)
    #[default]
    Lenient,
    /// Malformed numbers reject the whole command with `bad_number`
    Strict,
}

/// Runtime configuration for the firmware
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FirmwareConfig {
    /// Serial link speed
    pub baud_rate: u32,
    /// Channel number that `A0` resolves to
    pub analog_base: u8,
    /// Number of raw samples averaged for each temperature
    pub samples_per_read: u16,
    /// Numeric argument parsing mode
    pub numbers: NumberParsing,
}

impl Default for FirmwareConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD,
            analog_base: DEFAULT_ANALOG_BASE,
            samples_per_read: DEFAULT_SAMPLES_PER_READ,
            numbers: NumberParsing::Lenient,
        }
    }
}

impl FirmwareConfig {
    /// Default configuration with strict numeric parsing
    pub const fn strict() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD,
            analog_base: DEFAULT_ANALOG_BASE,
            samples_per_read: DEFAULT_SAMPLES_PER_READ,
            numbers: NumberParsing::Strict,
        }
    }
}
