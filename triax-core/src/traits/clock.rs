//! Monotonic clock and blocking delay abstraction
//!
//! All motion timing goes through this trait: pulse pacing, tick deadlines,
//! settle dwells, and decision timeouts. Implementations must be monotonic;
//! wall-clock time is never used.

/// Monotonic microsecond clock with a blocking delay primitive
pub trait Clock {
    /// Microseconds since an arbitrary (boot-time) origin
    fn now_us(&self) -> u64;

    /// Block for the given number of microseconds
    fn delay_us(&self, us: u32);

    /// Block for the given number of milliseconds
    fn delay_ms(&self, ms: u32) {
        // Chunked so large dwells cannot overflow the u32 microsecond arg
        let mut remaining = ms;
        while remaining > 0 {
            let chunk = remaining.min(1_000);
            self.delay_us(chunk * 1_000);
            remaining -= chunk;
        }
    }
}

impl<C: Clock> Clock for &C {
    fn now_us(&self) -> u64 {
        (**self).now_us()
    }

    fn delay_us(&self, us: u32) {
        (**self).delay_us(us)
    }
}
