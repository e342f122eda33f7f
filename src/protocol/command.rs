//! Command parsing and rendering
//!
//! A command line is a command word followed by `key=value` tokens,
//! separated by runs of spaces or tabs:
//!
//! ```text
//! NEW id=1 pin=A0 name=Room t1=0 q1=0 t2=100 q2=1023 interval=5000
//! SET id=1 active=1
//! READ id=1
//! DEL id=1
//! LIST
//! ```
//!
//! Command words and keys are case-insensitive. Tokens without `=` and
//! unknown keys are skipped; when a key repeats, the last value wins.

use core::fmt;

use heapless::String;

use crate::config::FirmwareConfig;
use crate::domain::sensor::{sensor_name, NewSensor, SensorName, SensorUpdate};
use crate::domain::Calibration;
use crate::protocol::numeric::{parse_channel, parse_float, parse_int, parse_uint, BadNumber};

/// Longest unknown command word kept for diagnostics
pub const MAX_COMMAND_WORD: usize = 16;

/// Arguments of `NEW`
#[derive(Clone, Debug, PartialEq)]
pub struct NewArgs {
    pub id: Option<u8>,
    pub channel: Option<u8>,
    pub active: bool,
    pub name: Option<SensorName>,
    pub t1: f32,
    pub q1: i32,
    pub t2: f32,
    pub q2: i32,
    pub interval_ms: u32,
}

impl Default for NewArgs {
    fn default() -> Self {
        Self {
            id: None,
            channel: None,
            active: false,
            name: None,
            t1: Calibration::DEFAULT.t1(),
            q1: Calibration::DEFAULT.q1(),
            t2: Calibration::DEFAULT.t2(),
            q2: Calibration::DEFAULT.q2(),
            interval_ms: 0,
        }
    }
}

impl NewArgs {
    /// Creation parameters, or `None` when `id` or `pin` is missing
    pub fn to_params(&self) -> Option<NewSensor> {
        let mut params = NewSensor::new(self.id?, self.channel?);
        params.active = self.active;
        if let Some(name) = &self.name {
            params.name = name.clone();
        }
        params.calibration = Calibration::new(self.t1, self.q1, self.t2, self.q2);
        params.interval_ms = self.interval_ms;
        Some(params)
    }
}

/// Arguments of `SET`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SetArgs {
    pub id: Option<u8>,
    pub update: SensorUpdate,
}

/// A parsed command line
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Only whitespace; ignored without a response
    Blank,
    /// Create a sensor
    New(NewArgs),
    /// Delete a sensor
    Delete { id: Option<u8> },
    /// Update some fields of a sensor
    Set(SetArgs),
    /// Compute and return a sensor's temperature now
    Read { id: Option<u8> },
    /// Enumerate all sensors
    List,
    /// Unrecognized command word (truncated)
    Unknown(String<MAX_COMMAND_WORD>),
}

impl Command {
    /// Parse one command line
    ///
    /// Fails only in strict numeric mode, when a numeric argument is
    /// malformed.
    pub fn parse(line: &str, config: &FirmwareConfig) -> Result<Self, BadNumber> {
        // A carriage return ends the content; anything after it is noise
        let line = line.split('\r').next().unwrap_or_default();
        let mut tokens = line.split([' ', '\t']).filter(|t| !t.is_empty());

        let Some(word) = tokens.next() else {
            return Ok(Self::Blank);
        };
        let args = tokens.filter_map(|token| token.split_once('='));

        if word.eq_ignore_ascii_case("NEW") {
            parse_new(args, config).map(Self::New)
        } else if word.eq_ignore_ascii_case("DEL") {
            Ok(Self::Delete {
                id: parse_id_only(args, config)?,
            })
        } else if word.eq_ignore_ascii_case("SET") {
            parse_set(args, config).map(Self::Set)
        } else if word.eq_ignore_ascii_case("READ") {
            Ok(Self::Read {
                id: parse_id_only(args, config)?,
            })
        } else if word.eq_ignore_ascii_case("LIST") {
            Ok(Self::List)
        } else {
            Ok(Self::Unknown(truncated(word)))
        }
    }

    /// Create delete command
    pub fn delete(id: u8) -> Self {
        Self::Delete { id: Some(id) }
    }

    /// Create update command
    pub fn set(id: u8, update: SensorUpdate) -> Self {
        Self::Set(SetArgs {
            id: Some(id),
            update,
        })
    }

    /// Create read command
    pub fn read(id: u8) -> Self {
        Self::Read { id: Some(id) }
    }

    /// Create list command
    pub fn list() -> Self {
        Self::List
    }
}

fn key_is(key: &str, name: &str) -> bool {
    key.eq_ignore_ascii_case(name)
}

/// `NEW` ids wrap into `u8` the way the firmware always has
fn wrapping_id(value: &str, config: &FirmwareConfig) -> Result<u8, BadNumber> {
    Ok(parse_int(value, config.numbers)? as u8)
}

/// Lookup ids outside `0..=255` can never match a sensor
fn lookup_id(value: &str, config: &FirmwareConfig) -> Result<Option<u8>, BadNumber> {
    Ok(u8::try_from(parse_int(value, config.numbers)?).ok())
}

fn parse_bool(value: &str, config: &FirmwareConfig) -> Result<bool, BadNumber> {
    Ok(parse_int(value, config.numbers)? != 0)
}

fn parse_interval(value: &str, config: &FirmwareConfig) -> Result<u32, BadNumber> {
    parse_uint(value, config.numbers)
}

fn parse_new<'a>(
    args: impl Iterator<Item = (&'a str, &'a str)>,
    config: &FirmwareConfig,
) -> Result<NewArgs, BadNumber> {
    let mut new = NewArgs::default();
    for (key, value) in args {
        if key_is(key, "id") {
            new.id = Some(wrapping_id(value, config)?);
        } else if key_is(key, "active") {
            new.active = parse_bool(value, config)?;
        } else if key_is(key, "pin") {
            new.channel = Some(parse_channel(value, config.analog_base, config.numbers)? as u8);
        } else if key_is(key, "name") {
            new.name = Some(sensor_name(value));
        } else if key_is(key, "t1") {
            new.t1 = parse_float(value, config.numbers)?;
        } else if key_is(key, "q1") {
            new.q1 = parse_int(value, config.numbers)?;
        } else if key_is(key, "t2") {
            new.t2 = parse_float(value, config.numbers)?;
        } else if key_is(key, "q2") {
            new.q2 = parse_int(value, config.numbers)?;
        } else if key_is(key, "interval") {
            new.interval_ms = parse_interval(value, config)?;
        }
    }
    Ok(new)
}

fn parse_set<'a>(
    args: impl Iterator<Item = (&'a str, &'a str)>,
    config: &FirmwareConfig,
) -> Result<SetArgs, BadNumber> {
    let mut set = SetArgs::default();
    let update = &mut set.update;
    for (key, value) in args {
        if key_is(key, "id") {
            set.id = lookup_id(value, config)?;
        } else if key_is(key, "active") {
            update.active = Some(parse_bool(value, config)?);
        } else if key_is(key, "pin") {
            // A negative channel leaves the pin unchanged
            let channel = parse_channel(value, config.analog_base, config.numbers)?;
            if channel >= 0 {
                update.channel = Some(channel as u8);
            }
        } else if key_is(key, "name") {
            update.name = Some(sensor_name(value));
        } else if key_is(key, "t1") {
            update.t1 = Some(parse_float(value, config.numbers)?);
        } else if key_is(key, "q1") {
            update.q1 = Some(parse_int(value, config.numbers)?);
        } else if key_is(key, "t2") {
            update.t2 = Some(parse_float(value, config.numbers)?);
        } else if key_is(key, "q2") {
            update.q2 = Some(parse_int(value, config.numbers)?);
        } else if key_is(key, "interval") {
            update.interval_ms = Some(parse_interval(value, config)?);
        }
    }
    Ok(set)
}

fn parse_id_only<'a>(
    args: impl Iterator<Item = (&'a str, &'a str)>,
    config: &FirmwareConfig,
) -> Result<Option<u8>, BadNumber> {
    let mut id = None;
    for (key, value) in args {
        if key_is(key, "id") {
            id = lookup_id(value, config)?;
        }
    }
    Ok(id)
}

fn truncated(word: &str) -> String<MAX_COMMAND_WORD> {
    let mut end = word.len().min(MAX_COMMAND_WORD);
    while !word.is_char_boundary(end) {
        end -= 1;
    }
    let mut out = String::new();
    let _ = out.push_str(&word[..end]);
    out
}

/// The part of a name a command line can carry
///
/// Tokens end at a space or tab and the line at `\r` or `\n`, so a name is
/// cut at the first of those.
fn wire_name(name: &str) -> &str {
    name.split([' ', '\t', '\r', '\n']).next().unwrap_or_default()
}

fn write_opt<T: fmt::Display>(f: &mut fmt::Formatter<'_>, key: &str, value: Option<T>) -> fmt::Result {
    match value {
        Some(value) => write!(f, " {}={}", key, value),
        None => Ok(()),
    }
}

impl fmt::Display for Command {
    /// Render the command as a protocol line (without terminator)
    ///
    /// Names are cut at their first separator, so the line always parses
    /// back to the command it shows.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blank => Ok(()),
            Self::New(new) => {
                f.write_str("NEW")?;
                write_opt(f, "id", new.id)?;
                write_opt(f, "pin", new.channel)?;
                write!(f, " active={}", new.active as u8)?;
                write_opt(f, "name", new.name.as_deref().map(wire_name))?;
                write!(
                    f,
                    " t1={} q1={} t2={} q2={} interval={}",
                    new.t1, new.q1, new.t2, new.q2, new.interval_ms
                )
            }
            Self::Delete { id } => {
                f.write_str("DEL")?;
                write_opt(f, "id", *id)
            }
            Self::Set(set) => {
                let update = &set.update;
                f.write_str("SET")?;
                write_opt(f, "id", set.id)?;
                write_opt(f, "active", update.active.map(u8::from))?;
                write_opt(f, "pin", update.channel)?;
                write_opt(f, "name", update.name.as_deref().map(wire_name))?;
                write_opt(f, "t1", update.t1)?;
                write_opt(f, "q1", update.q1)?;
                write_opt(f, "t2", update.t2)?;
                write_opt(f, "q2", update.q2)?;
                write_opt(f, "interval", update.interval_ms)
            }
            Self::Read { id } => {
                f.write_str("READ")?;
                write_opt(f, "id", *id)
            }
            Self::List => f.write_str("LIST"),
            Self::Unknown(word) => f.write_str(word),
        }
    }
}
