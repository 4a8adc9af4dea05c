//! Fixed-rate synchronized XY rapid move
//!
//! Transit profile for non-vision travel: a fixed control tick, an eased
//! intermediate target per tick, and an accumulator interleave that spreads
//! the tick's X and Y pulses evenly instead of batching them. Tick deadlines
//! are computed against the absolute start instant so timing error cannot
//! accumulate across a long move.

use crate::config::{MachineConfig, Point};
use crate::motion::easing::eased_step_target;
use crate::motion::{MotionError, Position};
use crate::traits::{AxisIo, Clock, Direction, StopFlag};

/// Granularity of stop polling while waiting out a tick (µs)
const WAIT_SLICE_US: u32 = 100;

/// Move both axes from `position` to `target` at rapid speed
///
/// Same commit semantics as [`scan_move`](crate::motion::scan_move):
/// `position` updates only on full completion.
pub fn rapid_move<X, Y, C, S>(
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

    x.set_direction(Direction::of(dx));
    y.set_direction(Direction::of(dy));

    if steps_x == 0 && steps_y == 0 {
        *position = Position {
            x_mm: target.x_mm,
            y_mm: target.y_mm,
        };
        return Ok(());
    }

    let est_x_ms = abs(dx) / cfg.x.rapid_speed_mm_s * 1_000.0;
    let est_y_ms = abs(dy) / cfg.y.rapid_speed_mm_s * 1_000.0;
    let duration_ms = est_x_ms
        .max(est_y_ms)
        .max(cfg.motion.min_move_time_ms as f32);
    let duration_us = (duration_ms * 1_000.0) as u64;

    let tick_us = u64::from(cfg.motion.rapid_tick_us.max(1));
    let ticks = ((duration_us + tick_us - 1) / tick_us).max(1) as u32;

    // Inter-pulse spacing inside a tick burst
    let burst_delay_us = cfg
        .x
        .min_pulse_interval_us()
        .max(cfg.y.min_pulse_interval_us());

    let start = clock.now_us();
    let mut done_x = 0;
    let mut done_y = 0;

    for k in 1..=ticks {
        // Saturating: a tick can never owe negative pulses even if the
        // eased targets were ever non-monotone
        let need_x = eased_step_target(steps_x, k, ticks).saturating_sub(done_x);
        let need_y = eased_step_target(steps_y, k, ticks).saturating_sub(done_y);

        emit_interleaved(x, y, clock, stop, need_x, need_y, burst_delay_us)?;
        done_x += need_x;
        done_y += need_y;

        // Absolute deadline, not accumulated sleep: late ticks shorten the
        // following wait instead of dragging every later tick with them
        let deadline = start + u64::from(k) * tick_us;
        loop {
            if stop.is_set() {
                return Err(MotionError::Stopped);
            }
            let now = clock.now_us();
            if now >= deadline {
                break;
            }
            clock.delay_us(((deadline - now) as u32).min(WAIT_SLICE_US));
        }
    }

    debug_assert_eq!(done_x, steps_x);
    debug_assert_eq!(done_y, steps_y);

    *position = Position {
        x_mm: target.x_mm,
        y_mm: target.y_mm,
    };
    Ok(())
}

/// Emit `nx` X pulses and `ny` Y pulses alternated line-drawing style, so
/// the two axes advance together within the burst
fn emit_interleaved<X, Y, C, S>(
    x: &mut X,
    y: &mut Y,
    clock: &C,
    stop: &S,
    nx: u32,
    ny: u32,
    burst_delay_us: u32,
) -> Result<(), MotionError>
where
    X: AxisIo,
    Y: AxisIo,
    C: Clock,
    S: StopFlag,
{
    let m = nx.max(ny);
    let mut acc_x = 0;
    let mut acc_y = 0;

    for _ in 0..m {
        if stop.is_set() {
            return Err(MotionError::Stopped);
        }

        acc_x += nx;
        if acc_x >= m {
            acc_x -= m;
            x.step();
        }

        acc_y += ny;
        if acc_y >= m {
            acc_y -= m;
            y.step();
        }

        clock.delay_us(burst_delay_us);
    }

    Ok(())
}

fn abs(v: f32) -> f32 {
    if v < 0.0 {
        -v
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{MockAxis, MockClock, MockStop};

    fn setup() -> (MockAxis, MockAxis, MockClock, MockStop, MachineConfig) {
        (
            MockAxis::new(),
            MockAxis::new(),
            MockClock::new(),
            MockStop::new(),
            MachineConfig::default(),
        )
    }

    #[test]
    fn test_exact_step_counts() {
        let (mut x, mut y, clock, stop, cfg) = setup();
        let mut pos = Position::origin();

        rapid_move(
            &mut x,
            &mut y,
            &clock,
            &stop,
            &cfg,
            &mut pos,
            Point::new(240.0, 400.0),
        )
        .unwrap();

        assert_eq!(x.pulses, cfg.x.mm_to_steps(240.0));
        assert_eq!(y.pulses, cfg.y.mm_to_steps(400.0));
        assert_eq!(pos, Position { x_mm: 240.0, y_mm: 400.0 });
    }

    #[test]
    fn test_faster_than_scan() {
        let (mut x, mut y, clock, stop, cfg) = setup();
        let mut pos = Position::origin();
        let t0 = clock.now_us();
        rapid_move(
            &mut x,
            &mut y,
            &clock,
            &stop,
            &cfg,
            &mut pos,
            Point::new(360.0, 0.0),
        )
        .unwrap();
        let rapid_us = clock.now_us() - t0;

        let (mut x, mut y, clock, stop, cfg) = setup();
        let mut pos = Position::origin();
        let t0 = clock.now_us();
        crate::motion::scan_move(
            &mut x,
            &mut y,
            &clock,
            &stop,
            &cfg,
            &mut pos,
            Point::new(360.0, 0.0),
        )
        .unwrap();
        let scan_us = clock.now_us() - t0;

        assert!(rapid_us < scan_us);
    }

    #[test]
    fn test_stop_aborts_mid_burst() {
        let (mut x, mut y, clock, stop, cfg) = setup();
        let mut pos = Position::origin();
        stop.trip_after(25);

        let err = rapid_move(
            &mut x,
            &mut y,
            &clock,
            &stop,
            &cfg,
            &mut pos,
            Point::new(360.0, 400.0),
        )
        .unwrap_err();

        assert_eq!(err, MotionError::Stopped);
        assert_eq!(pos, Position::origin());
    }

    #[test]
    fn test_interleave_emits_exact_counts() {
        let (mut x, mut y, clock, stop, _cfg) = setup();
        emit_interleaved(&mut x, &mut y, &clock, &stop, 7, 3, 10).unwrap();
        assert_eq!(x.pulses, 7);
        assert_eq!(y.pulses, 3);

        let (mut x, mut y, clock, stop, _cfg) = setup();
        emit_interleaved(&mut x, &mut y, &clock, &stop, 0, 5, 10).unwrap();
        assert_eq!(x.pulses, 0);
        assert_eq!(y.pulses, 5);
    }

    #[test]
    fn test_interleave_equal_counts_step_together() {
        let (mut x, mut y, clock, stop, _cfg) = setup();
        emit_interleaved(&mut x, &mut y, &clock, &stop, 6, 6, 10).unwrap();
        assert_eq!(x.pulses, y.pulses);
    }
}
