//! Clock port - milliseconds since boot

/// Monotonic millisecond clock that wraps at `u32::MAX`
pub trait Clock {
    /// Milliseconds since boot, modulo 2^32
    fn now_ms(&self) -> u32;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}
