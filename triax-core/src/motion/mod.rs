//! Motion primitives
//!
//! Two synchronized XY travel profiles (eased scan move, fixed-rate rapid
//! move), the ramped single-axis Z stepper, and the homing sequence. All of
//! them block the control loop for their full duration and poll the stop
//! flag at per-pulse (or per-sub-step) granularity.
//!
//! The design is open loop: step counts are ground truth, the XY [`Position`]
//! is committed only on successful move completion, and an aborted move
//! leaves it untouched (physically unknown - the caller must re-home).

pub mod easing;
pub mod homing;
pub mod rapid;
pub mod scan;
pub mod z_axis;

pub use homing::home_all;
pub use rapid::rapid_move;
pub use scan::scan_move;
pub use z_axis::z_travel;

use crate::traits::{Clock, StopFlag};

/// The continuously tracked XY coordinate (mm)
///
/// Mutated exclusively by motion primitives on successful completion;
/// meaningful only after homing has established the origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Position {
    pub x_mm: f32,
    pub y_mm: f32,
}

impl Position {
    /// The homed origin
    pub const fn origin() -> Self {
        Self {
            x_mm: 0.0,
            y_mm: 0.0,
        }
    }
}

/// Errors a blocking motion operation can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionError {
    /// Stop flag observed; the pulse train was truncated mid-flight
    Stopped,
    /// Homing travelled its full cap without the limit sensor triggering
    LimitNotFound,
}

/// Granularity of stop polling inside dwells (µs)
const PAUSE_SLICE_US: u32 = 10_000;

/// Blocking dwell that polls the stop flag every few milliseconds
pub fn pause<C: Clock, S: StopFlag>(
    clock: &C,
    stop: &S,
    ms: u32,
) -> Result<(), MotionError> {
    let deadline = clock.now_us() + u64::from(ms) * 1_000;
    loop {
        if stop.is_set() {
            return Err(MotionError::Stopped);
        }
        let now = clock.now_us();
        if now >= deadline {
            return Ok(());
        }
        let remaining = (deadline - now) as u32;
        clock.delay_us(remaining.min(PAUSE_SLICE_US));
    }
}
