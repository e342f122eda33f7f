//! Rendering of device lines for the interactive shell

use crate::protocol::message::{DeviceMessage, ListedSensor};

fn temperature(t: Option<f64>) -> String {
    match t {
        Some(t) => format!("{:.2} °C", t),
        None => "n/a".to_string(),
    }
}

fn sensor_table(sensors: &[ListedSensor]) -> String {
    if sensors.is_empty() {
        return "No sensors defined".to_string();
    }
    let mut out = format!("{:<4} {:<20} {:<5} {}", "ID", "Name", "Pin", "Active");
    for sensor in sensors {
        out.push('\n');
        out.push_str(&format!(
            "{:<4} {:<20} {:<5} {}",
            sensor.id,
            sensor.name,
            sensor.pin,
            if sensor.is_active() { "yes" } else { "no" }
        ));
    }
    out
}

/// Describe one device message for the terminal
pub fn describe(message: &DeviceMessage) -> String {
    match message {
        DeviceMessage::Hello { hello } => format!("Device says hello ({})", hello),
        DeviceMessage::Listing { s } => sensor_table(s),
        DeviceMessage::Reply {
            ok: true,
            id: Some(id),
            name,
            t,
            ..
        } => format!(
            "#{} {}: {}",
            id,
            name.as_deref().unwrap_or(""),
            temperature(*t)
        ),
        DeviceMessage::Reply { ok: true, .. } => "OK".to_string(),
        DeviceMessage::Reply { ok: false, err, .. } => {
            format!("Error: {}", err.as_deref().unwrap_or("unknown"))
        }
        DeviceMessage::Report { id, name, t } => {
            format!("[report] #{} {}: {}", id, name, temperature(*t))
        }
        DeviceMessage::Text(text) => text.clone(),
    }
}
