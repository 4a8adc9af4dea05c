//! Asynchronous stop flag
//!
//! The stop flag is the sole cancellation mechanism. It is set
//! asynchronously relative to motion (from the serial side) and polled
//! synchronously at per-pulse granularity inside every blocking operation,
//! which bounds worst-case stop latency to one step period.

/// Shared stop flag, settable from outside the control flow
///
/// Methods take `&self`: implementations use interior mutability (an atomic
/// in the firmware, a `Cell` in tests) so the flag can be observed from
/// inside a blocking motion primitive that only holds shared references.
pub trait StopFlag {
    /// Check whether a stop has been requested
    fn is_set(&self) -> bool;

    /// Request a stop
    fn set(&self);

    /// Clear the stop request (UNSTOP)
    fn clear(&self);
}

impl<S: StopFlag> StopFlag for &S {
    fn is_set(&self) -> bool {
        (**self).is_set()
    }

    fn set(&self) {
        (**self).set()
    }

    fn clear(&self) {
        (**self).clear()
    }
}
