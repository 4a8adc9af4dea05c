//! Pick action sequencer
//!
//! The fixed compound action executed over an object:
//!
//! 1. descend to pick depth, settle
//! 2. close gripper, hold
//! 3. ascend to travel height
//! 4. rapid transit to the bin
//! 5. descend to bin depth, settle
//! 6. open gripper, hold
//! 7. ascend to travel height
//!
//! Every phase polls the stop flag. An abort leaves the gripper and the
//! axes exactly where they were - no recovery move is attempted, because a
//! half-gripped object under a moving head is worse than a frozen one. The
//! operator must re-home before the next run.

use crate::config::{MachineConfig, Point};
use crate::motion::z_axis::{z_travel, ZTravel};
use crate::motion::{pause, rapid_move, MotionError, Position};
use crate::traits::{AxisIo, Clock, Gripper, StopFlag};

/// Run the full pick-and-drop sequence at the current position
///
/// On success the head ends at travel height over the bin with the gripper
/// open, and `position` holds the bin coordinate.
#[allow(clippy::too_many_arguments)]
pub fn pick_sequence<X, Y, Z, G, C, S>(
    x: &mut X,
    y: &mut Y,
    z: &mut Z,
    gripper: &mut G,
    clock: &C,
    stop: &S,
    cfg: &MachineConfig,
    position: &mut Position,
) -> Result<(), MotionError>
where
    X: AxisIo,
    Y: AxisIo,
    Z: AxisIo,
    G: Gripper,
    C: Clock,
    S: StopFlag,
{
    let stroke = cfg.z.stroke_steps;

    // Grab the object
    z_travel(z, clock, stop, &cfg.z.descend, ZTravel::Descend, stroke)?;
    pause(clock, stop, cfg.sequence.settle_ms)?;
    gripper.close();
    pause(clock, stop, cfg.sequence.grip_hold_ms)?;
    z_travel(z, clock, stop, &cfg.z.ascend, ZTravel::Ascend, stroke)?;

    // Carry it to the bin
    let bin = Point::new(cfg.sequence.bin_x_mm, cfg.sequence.bin_y_mm);
    rapid_move(x, y, clock, stop, cfg, position, bin)?;

    // Release
    z_travel(z, clock, stop, &cfg.z.descend, ZTravel::Descend, stroke)?;
    pause(clock, stop, cfg.sequence.settle_ms)?;
    gripper.open();
    pause(clock, stop, cfg.sequence.grip_hold_ms)?;
    z_travel(z, clock, stop, &cfg.z.ascend, ZTravel::Ascend, stroke)?;

    Ok(())
}
