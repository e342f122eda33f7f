//! Uptime clock backed by the embassy-time driver

use embassy_time::Instant;

use crate::ports::Clock;

/// Milliseconds since boot from the embassy time driver
#[derive(Clone, Copy, Debug, Default)]
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u32 {
        // Truncation gives the wrapping u32 the schedule expects
        Instant::now().as_millis() as u32
    }
}
