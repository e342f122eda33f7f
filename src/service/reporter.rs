//! Periodic reporter
//!
//! Visits every sensor in slot order and emits an unsolicited report for
//! each one whose interval has elapsed.

use crate::domain::SensorRegistry;
use crate::ports::{AnalogPort, CommunicationError, CommunicationPort};
use crate::protocol::response::Report;
use crate::service::send;

/// Emit a report for every due sensor; returns the number of reports sent
///
/// A sensor whose channel cannot be sampled is skipped for this interval
/// (its gate has already fired) and the failure is logged.
pub fn report_due<const N: usize, A, C>(
    registry: &mut SensorRegistry<N>,
    analog: &mut A,
    serial: &mut C,
    now_ms: u32,
    samples: u16,
) -> Result<usize, CommunicationError>
where
    A: AnalogPort,
    C: CommunicationPort,
{
    let mut sent = 0;
    for sensor in registry.iter_mut() {
        if !sensor.should_report(now_ms) {
            continue;
        }
        debug!("sensor {}: interval {} ms", sensor.id(), sensor.report_interval_ms());

        let temperature = match sensor.read_temperature(analog, samples) {
            Ok(t) => t,
            Err(e) => {
                warn!("sensor {}: analog read failed: {:?}", sensor.id(), e);
                continue;
            }
        };
        let report = Report {
            id: sensor.id(),
            name: sensor.name.clone(),
            temperature,
        };
        send(serial, &report)?;
        sent += 1;
    }
    Ok(sent)
}
