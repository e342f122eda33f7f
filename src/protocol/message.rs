//! Host-side decoding of device output
//!
//! Each line the firmware prints is one of: the readiness line, a command
//! reply, a `LIST` reply or an unsolicited report. Anything that is not
//! one of those JSON shapes is kept verbatim as text.

use serde::Deserialize;

/// One `LIST` entry as seen by the host
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ListedSensor {
    pub id: u8,
    pub name: String,
    pub pin: u8,
    pub active: u8,
}

impl ListedSensor {
    pub fn is_active(&self) -> bool {
        self.active != 0
    }
}

/// A decoded device line
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum DeviceMessage {
    /// `{"hello":"ready"}`
    Hello { hello: String },
    /// `{"s":[...]}`
    Listing { s: Vec<ListedSensor> },
    /// `{"ok":...}` with an optional error or reading
    Reply {
        ok: bool,
        err: Option<String>,
        id: Option<u8>,
        name: Option<String>,
        t: Option<f64>,
    },
    /// `{"id":..,"name":..,"t":..}` with no `ok` field
    Report {
        id: u8,
        name: String,
        t: Option<f64>,
    },
    /// Not a protocol line
    #[serde(skip_deserializing)]
    Text(String),
}

impl DeviceMessage {
    /// Decode one line (without terminator)
    pub fn decode(line: &str) -> Self {
        let line = line.trim_end_matches(['\r', '\n']);
        serde_json::from_str(line).unwrap_or_else(|_| Self::Text(line.to_string()))
    }

    /// True for the startup readiness line
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Hello { hello } if hello == "ready")
    }

    /// Temperature sample carried by this line, if any
    ///
    /// Returns `(id, name, temperature, periodic)`; `periodic` is false for
    /// a `READ` reply.
    pub fn temperature(&self) -> Option<(u8, &str, f64, bool)> {
        match self {
            Self::Reply {
                ok: true,
                id: Some(id),
                name: Some(name),
                t: Some(t),
                ..
            } => Some((*id, name.as_str(), *t, false)),
            Self::Report {
                id,
                name,
                t: Some(t),
            } => Some((*id, name.as_str(), *t, true)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::sensor::{sensor_name, NewSensor, Sensor};
    use crate::protocol::response::{encode, ErrorCode, Ready, Report, Response};

    #[test]
    fn test_decodes_ready() {
        let line = encode(&Ready).unwrap();
        assert!(DeviceMessage::decode(&line).is_ready());
    }

    #[test]
    fn test_decodes_error_reply() {
        let line = encode(&Response::error(ErrorCode::NoSuchId)).unwrap();
        assert_eq!(
            DeviceMessage::decode(&line),
            DeviceMessage::Reply {
                ok: false,
                err: Some("no_such_id".to_string()),
                id: None,
                name: None,
                t: None,
            }
        );
    }

    #[test]
    fn test_decodes_reading_and_report() {
        let reading = Response::Reading {
            id: 3,
            name: sensor_name("PT100"),
            temperature: 23.45,
        };
        let line = encode(&reading).unwrap();
        let (id, name, t, periodic) = DeviceMessage::decode(&line).temperature().unwrap();
        assert_eq!((id, name, periodic), (3, "PT100", false));
        assert!((t - 23.45).abs() < 1e-9);

        let report = Report {
            id: 1,
            name: sensor_name("Room"),
            temperature: -4.0,
        };
        let line = encode(&report).unwrap();
        let decoded = DeviceMessage::decode(&line);
        assert!(matches!(decoded, DeviceMessage::Report { id: 1, .. }));
        assert_eq!(decoded.temperature().map(|t| t.3), Some(true));
    }

    #[test]
    fn test_null_temperature_is_not_a_sample() {
        let decoded = DeviceMessage::decode(r#"{"id":1,"name":"Room","t":null}"#);
        assert!(matches!(decoded, DeviceMessage::Report { t: None, .. }));
        assert_eq!(decoded.temperature(), None);
    }

    #[test]
    fn test_decodes_listing() {
        let mut params = NewSensor::new(2, 14);
        params.active = true;
        let sensor = Sensor::new(params, 0);
        let line = encode(&Response::listing(core::iter::once(&sensor))).unwrap();

        let DeviceMessage::Listing { s } = DeviceMessage::decode(&line) else {
            panic!("not a listing");
        };
        assert_eq!(s.len(), 1);
        assert_eq!(s[0].id, 2);
        assert_eq!(s[0].pin, 14);
        assert!(s[0].is_active());
    }

    #[test]
    fn test_other_text_is_kept() {
        assert_eq!(
            DeviceMessage::decode("boot v1\r\n"),
            DeviceMessage::Text("boot v1".to_string())
        );
    }
}
