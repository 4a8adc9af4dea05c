//! Ramped single-axis Z travel
//!
//! The Z stepper runs a simple linear ramp: the inter-pulse delay starts
//! high, shrinks by a fixed amount each pulse, and clamps at the running
//! delay. Descend and ascend carry separate ramp parameters because the
//! mechanical load differs. Open loop: the step count is ground truth.

use crate::config::ZProfile;
use crate::motion::MotionError;
use crate::traits::{AxisIo, Clock, Direction, StopFlag};

/// Z travel direction in machine terms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ZTravel {
    /// Toward the table (away from the top limit)
    Descend,
    /// Toward the top limit
    Ascend,
}

impl ZTravel {
    /// Step/direction polarity: the Z home limit sits at the top, so
    /// ascending travels toward it
    pub fn direction(self) -> Direction {
        match self {
            ZTravel::Descend => Direction::Positive,
            ZTravel::Ascend => Direction::Negative,
        }
    }
}

/// Emit a ramped pulse train of `steps` pulses in the given direction
pub fn z_travel<Z, C, S>(
    z: &mut Z,
    clock: &C,
    stop: &S,
    profile: &ZProfile,
    travel: ZTravel,
    steps: u32,
) -> Result<(), MotionError>
where
    Z: AxisIo,
    C: Clock,
    S: StopFlag,
{
    z.set_direction(travel.direction());

    let mut delay_us = profile.start_delay_us.max(profile.run_delay_us);
    for _ in 0..steps {
        if stop.is_set() {
            return Err(MotionError::Stopped);
        }
        z.step();
        clock.delay_us(delay_us);
        delay_us = delay_us
            .saturating_sub(profile.ramp_us_per_step)
            .max(profile.run_delay_us);
    }
    Ok(())
}
