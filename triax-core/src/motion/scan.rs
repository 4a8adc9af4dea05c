//! Eased, synchronized XY scan move
//!
//! The vision-stabilization travel profile: both axes follow one shared
//! quintic easing curve so they start, accelerate, and settle together, and
//! the move always takes at least the configured minimum time so short hops
//! are never rushed.

use crate::config::{MachineConfig, Point};
use crate::motion::easing::eased_step_target;
use crate::motion::{MotionError, Position};
use crate::traits::{AxisIo, Clock, Direction, StopFlag};

/// Move both axes from `position` to `target` with quintic easing
///
/// Blocks for the move's full duration. On success `position` is committed
/// to `target` exactly (step counts are derived from the same rounding the
/// easing uses, so there is no residual error). On stop abort, `position`
/// is left untouched and the physical location is unknown.
pub fn scan_move<X, Y, C, S>(
    x: &mut X,
    y: &mut Y,
    clock: &C,
    stop: &S,
    cfg: &MachineConfig,
    position: &mut Position,
    target: Point,
) -> Result<(), MotionError>
where
    X: AxisIo,
    Y: AxisIo,
    C: Clock,
    S: StopFlag,
{
    let dx = target.x_mm - position.x_mm;
    let dy = target.y_mm - position.y_mm;

    let steps_x = cfg.x.mm_to_steps(abs(dx));
    let steps_y = cfg.y.mm_to_steps(abs(dy));

    // Direction outputs are latched once at move start
    x.set_direction(Direction::of(dx));
    y.set_direction(Direction::of(dy));

    let m = steps_x.max(steps_y);
    if m == 0 {
        *position = Position {
            x_mm: target.x_mm,
            y_mm: target.y_mm,
        };
        return Ok(());
    }

    // Duration: the slower axis's constant-velocity estimate, but never
    // below the configured floor
    let est_x_ms = abs(dx) / cfg.x.scan_speed_mm_s * 1_000.0;
    let est_y_ms = abs(dy) / cfg.y.scan_speed_mm_s * 1_000.0;
    let duration_ms = est_x_ms
        .max(est_y_ms)
        .max(cfg.motion.min_move_time_ms as f32);
    let duration_us = (duration_ms * 1_000.0) as u64;

    // Per-iteration pacing delay, clamped so neither axis can be asked to
    // pulse faster than its driver allows
    let floor_us = cfg
        .x
        .min_pulse_interval_us()
        .max(cfg.y.min_pulse_interval_us());
    let step_delay_us = ((duration_us / u64::from(m)) as u32).max(floor_us);

    let mut done_x = 0;
    let mut done_y = 0;

    for i in 1..=m {
        if stop.is_set() {
            // Position stays uncommitted; caller must re-home
            return Err(MotionError::Stopped);
        }

        let want_x = eased_step_target(steps_x, i, m);
        while done_x < want_x {
            x.step();
            done_x += 1;
        }

        let want_y = eased_step_target(steps_y, i, m);
        while done_y < want_y {
            y.step();
            done_y += 1;
        }

        clock.delay_us(step_delay_us);
    }

    debug_assert_eq!(done_x, steps_x);
    debug_assert_eq!(done_y, steps_y);

    *position = Position {
        x_mm: target.x_mm,
        y_mm: target.y_mm,
    };
    Ok(())
}

fn abs(v: f32) -> f32 {
    if v < 0.0 {
        -v
    } else {
        v
    }
}
