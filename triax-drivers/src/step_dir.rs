//! Step/dir stepper axis with a limit switch
//!
//! Works with any driver that takes a step pulse and a direction level
//! (A4988, DRV8825, TMC2208 in legacy mode). The pulse width is generated
//! inline with a blocking microsecond delay; inter-pulse pacing is the
//! motion planner's job, not the driver's.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use triax_core::traits::{AxisIo, Direction};

/// Wiring options for one step/dir axis
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StepDirConfig {
    /// High time of the step pulse (µs). A4988-class drivers need >= 1 µs;
    /// 3 µs leaves margin for optocoupled breakouts.
    pub pulse_width_us: u32,
    /// Swap the meaning of the direction level
    pub invert_direction: bool,
    /// Limit switch wired normally-closed to ground (reads low when hit)
    pub limit_active_low: bool,
}

impl Default for StepDirConfig {
    fn default() -> Self {
        Self {
            pulse_width_us: 3,
            invert_direction: false,
            limit_active_low: true,
        }
    }
}

/// One stepper axis: step pin, direction pin, limit switch input
pub struct StepDirAxis<STEP, DIR, LIMIT, D> {
    step: STEP,
    dir: DIR,
    limit: LIMIT,
    delay: D,
    config: StepDirConfig,
}

impl<STEP, DIR, LIMIT, D> StepDirAxis<STEP, DIR, LIMIT, D>
where
    STEP: OutputPin,
    DIR: OutputPin,
    LIMIT: InputPin,
    D: DelayNs,
{
    pub fn new(step: STEP, dir: DIR, limit: LIMIT, delay: D, config: StepDirConfig) -> Self {
        Self {
            step,
            dir,
            limit,
            delay,
            config,
        }
    }
}

impl<STEP, DIR, LIMIT, D> AxisIo for StepDirAxis<STEP, DIR, LIMIT, D>
where
    STEP: OutputPin,
    DIR: OutputPin,
    LIMIT: InputPin,
    D: DelayNs,
{
    fn set_direction(&mut self, direction: Direction) {
        let level = (direction == Direction::Positive) ^ self.config.invert_direction;
        // GPIO writes on this target are infallible
        let _ = if level {
            self.dir.set_high()
        } else {
            self.dir.set_low()
        };
    }

    fn step(&mut self) {
        let _ = self.step.set_high();
        self.delay.delay_us(self.config.pulse_width_us);
        let _ = self.step.set_low();
    }

    fn limit_triggered(&mut self) -> bool {
        // A read error counts as not triggered; the homing step cap is the
        // backstop for a dead switch
        if self.config.limit_active_low {
            self.limit.is_low().unwrap_or(false)
        } else {
            self.limit.is_high().unwrap_or(false)
        }
    }
}
