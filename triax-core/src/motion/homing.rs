//! Homing sequence
//!
//! Establishes the coordinate origin by driving each axis toward its limit
//! sensor at a slow fixed pace. Order is fixed: Z first (the head must clear
//! the fixtures before the gantry moves), then X, then Y. The sensor is
//! polled after every pulse; a stop request aborts immediately and leaves
//! the machine un-homed.

use triax_protocol::{AxisName, Report};

use crate::config::MachineConfig;
use crate::motion::MotionError;
use crate::traits::{AxisIo, Clock, Direction, Reporter, StopFlag};

/// Seek one axis to its limit sensor
///
/// `max_steps` caps the travel; exceeding it means the sensor never fired
/// (unplugged or jammed) and the axis state is untrustworthy.
fn seek_limit<A, C, S>(
    axis: &mut A,
    clock: &C,
    stop: &S,
    step_delay_us: u32,
    max_steps: u32,
) -> Result<(), MotionError>
where
    A: AxisIo,
    C: Clock,
    S: StopFlag,
{
    axis.set_direction(Direction::Negative);

    for _ in 0..max_steps {
        if stop.is_set() {
            return Err(MotionError::Stopped);
        }
        axis.step();
        clock.delay_us(step_delay_us);
        if axis.limit_triggered() {
            return Ok(());
        }
    }
    Err(MotionError::LimitNotFound)
}

/// Run the full homing sequence: Z, then X, then Y
///
/// Emits a `Homing` event per axis as it starts. On success the caller owns
/// resetting Position to the origin and setting the homed flag; any error
/// must leave the homed flag false.
pub fn home_all<X, Y, Z, C, S, R>(
    x: &mut X,
    y: &mut Y,
    z: &mut Z,
    clock: &C,
    stop: &S,
    cfg: &MachineConfig,
    rep: &mut R,
) -> Result<(), MotionError>
where
    X: AxisIo,
    Y: AxisIo,
    Z: AxisIo,
    C: Clock,
    S: StopFlag,
    R: Reporter,
{
    rep.report(Report::Homing(AxisName::Z));
    seek_limit(
        z,
        clock,
        stop,
        cfg.z.homing_step_delay_us,
        cfg.z.homing_max_steps,
    )?;

    rep.report(Report::Homing(AxisName::X));
    seek_limit(
        x,
        clock,
        stop,
        cfg.x.homing_step_delay_us,
        cfg.x.mm_to_steps(cfg.x.homing_max_travel_mm),
    )?;

    rep.report(Report::Homing(AxisName::Y));
    seek_limit(
        y,
        clock,
        stop,
        cfg.y.homing_step_delay_us,
        cfg.y.mm_to_steps(cfg.y.homing_max_travel_mm),
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{MockAxis, MockClock, MockStop, VecReporter};

    #[test]
    fn test_homing_order_z_x_y() {
        let mut x = MockAxis::with_limit_after(30);
        let mut y = MockAxis::with_limit_after(40);
        let mut z = MockAxis::with_limit_after(20);
        let clock = MockClock::new();
        let stop = MockStop::new();
        let cfg = MachineConfig::default();
        let mut rep = VecReporter::new();

        home_all(&mut x, &mut y, &mut z, &clock, &stop, &cfg, &mut rep).unwrap();

        assert_eq!(
            rep.reports.as_slice(),
            &[
                Report::Homing(AxisName::Z),
                Report::Homing(AxisName::X),
                Report::Homing(AxisName::Y),
            ]
        );
        assert_eq!(z.pulses, 20);
        assert_eq!(x.pulses, 30);
        assert_eq!(y.pulses, 40);
        assert_eq!(x.dir, Direction::Negative);
    }

    #[test]
    fn test_stop_aborts_partway() {
        let mut x = MockAxis::with_limit_after(30);
        let mut y = MockAxis::with_limit_after(40);
        let mut z = MockAxis::with_limit_after(500);
        let clock = MockClock::new();
        let stop = MockStop::new();
        let cfg = MachineConfig::default();
        let mut rep = VecReporter::new();
        stop.trip_after(100);

        let err =
            home_all(&mut x, &mut y, &mut z, &clock, &stop, &cfg, &mut rep).unwrap_err();
        assert_eq!(err, MotionError::Stopped);
        // Z never finished, so X and Y never started
        assert_eq!(x.pulses, 0);
        assert_eq!(y.pulses, 0);
    }

    #[test]
    fn test_missing_sensor_is_detected() {
        let mut x = MockAxis::with_limit_after(10);
        let mut y = MockAxis::with_limit_after(10);
        let mut z = MockAxis::new(); // limit never triggers
        let clock = MockClock::new();
        let stop = MockStop::new();
        let cfg = MachineConfig::default();
        let mut rep = VecReporter::new();

        let err =
            home_all(&mut x, &mut y, &mut z, &clock, &stop, &cfg, &mut rep).unwrap_err();
        assert_eq!(err, MotionError::LimitNotFound);
        assert_eq!(z.pulses, cfg.z.homing_max_steps);
    }
}
