//! Response encoding
//!
//! Every response is one compact JSON object on its own line:
//!
//! ```text
//! {"ok":true}
//! {"ok":false,"err":"need id&pin"}
//! {"ok":true,"id":3,"name":"PT100","t":23.45}
//! {"s":[{"id":1,"name":"Room","pin":14,"active":1}]}
//! {"id":1,"name":"Room","t":23.45}          <- unsolicited report
//! {"hello":"ready"}                          <- once at startup
//! ```
//!
//! Field names and error strings are fixed; host tooling matches on them.

use core::fmt::{self, Write};

use heapless::{String, Vec};

use crate::config::{MAX_NAME_LEN, MAX_SENSORS};
use crate::domain::{Sensor, SensorName};

/// Longest JSON string a name can become (every byte a `\u00XX` escape)
const NAME_JSON_LEN: usize = 2 + 6 * MAX_NAME_LEN;

/// Longest `LIST` row
const LIST_ENTRY_LEN: usize = r#"{"id":255,"name":,"pin":255,"active":1}"#.len() + NAME_JSON_LEN;

/// Largest encoded line: a full `LIST` of maximally escaped names
pub const RESPONSE_CAPACITY: usize = r#"{"s":[]}"#.len() + MAX_SENSORS * (LIST_ENTRY_LEN + 1);

/// Error strings carried in `{"ok":false,"err":...}`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorCode {
    /// `NEW` without `id` or `pin`
    NeedIdAndPin,
    /// `NEW` with a taken id, or with every slot in use
    ExistsOrFull,
    /// The id does not name a sensor
    NoSuchId,
    /// Unrecognized command word
    UnknownCommand,
    /// The line exceeded the input buffer
    LineOverflow,
    /// Malformed number in strict parsing mode
    BadNumber,
    /// The analog input could not be sampled
    ReadFailed,
}

impl ErrorCode {
    /// Wire representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NeedIdAndPin => "need id&pin",
            ErrorCode::ExistsOrFull => "exists_or_full",
            ErrorCode::NoSuchId => "no_such_id",
            ErrorCode::UnknownCommand => "unknown_cmd",
            ErrorCode::LineOverflow => "line_overflow",
            ErrorCode::BadNumber => "bad_number",
            ErrorCode::ReadFailed => "read_failed",
        }
    }
}

/// One row of a `LIST` response
#[derive(Clone, Debug, PartialEq)]
pub struct ListEntry {
    pub id: u8,
    pub name: SensorName,
    pub channel: u8,
    pub active: bool,
}

impl From<&Sensor> for ListEntry {
    fn from(sensor: &Sensor) -> Self {
        Self {
            id: sensor.id(),
            name: sensor.name.clone(),
            channel: sensor.channel,
            active: sensor.active,
        }
    }
}

/// Reply to a command
#[derive(Clone, Debug, PartialEq)]
pub enum Response {
    /// Success without payload
    Ok,
    /// Failure with a stable error code
    Failed(ErrorCode),
    /// Result of `READ`
    Reading {
        id: u8,
        name: SensorName,
        temperature: f32,
    },
    /// Result of `LIST`, in slot order
    Listing(Vec<ListEntry, MAX_SENSORS>),
}

impl Response {
    pub fn error(code: ErrorCode) -> Self {
        Self::Failed(code)
    }

    /// Build a listing from registry sensors (extra entries are dropped)
    pub fn listing<'a>(sensors: impl Iterator<Item = &'a Sensor>) -> Self {
        Self::Listing(sensors.map(ListEntry::from).take(MAX_SENSORS).collect())
    }
}

/// Unsolicited periodic temperature report
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub id: u8,
    pub name: SensorName,
    pub temperature: f32,
}

/// Readiness line sent once at startup
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ready;

/// Writes `s` as a JSON string literal
struct JsonStr<'a>(&'a str);

impl fmt::Display for JsonStr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char('"')?;
        for c in self.0.chars() {
            match c {
                '"' => f.write_str("\\\"")?,
                '\\' => f.write_str("\\\\")?,
                c if (c as u32) < 0x20 => write!(f, "\\u{:04x}", c as u32)?,
                c => f.write_char(c)?,
            }
        }
        f.write_char('"')
    }
}

/// Writes a temperature with two decimals, or `null` if not finite
struct Temperature(f32);

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_finite() {
            write!(f, "{:.2}", self.0)
        } else {
            f.write_str("null")
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Ok => f.write_str("{\"ok\":true}"),
            Response::Failed(code) => {
                write!(f, "{{\"ok\":false,\"err\":{}}}", JsonStr(code.as_str()))
            }
            Response::Reading {
                id,
                name,
                temperature,
            } => write!(
                f,
                "{{\"ok\":true,\"id\":{},\"name\":{},\"t\":{}}}",
                id,
                JsonStr(name),
                Temperature(*temperature)
            ),
            Response::Listing(entries) => {
                f.write_str("{\"s\":[")?;
                for (i, entry) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_char(',')?;
                    }
                    write!(
                        f,
                        "{{\"id\":{},\"name\":{},\"pin\":{},\"active\":{}}}",
                        entry.id,
                        JsonStr(&entry.name),
                        entry.channel,
                        entry.active as u8
                    )?;
                }
                f.write_str("]}")
            }
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"id\":{},\"name\":{},\"t\":{}}}",
            self.id,
            JsonStr(&self.name),
            Temperature(self.temperature)
        )
    }
}

impl fmt::Display for Ready {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{\"hello\":\"ready\"}")
    }
}

/// Render a message into a fixed-size line buffer
pub fn encode<T: fmt::Display>(message: &T) -> Result<String<RESPONSE_CAPACITY>, fmt::Error> {
    let mut line = String::new();
    write!(line, "{}", message)?;
    Ok(line)
}
