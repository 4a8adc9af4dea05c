//! The control loop task
//!
//! One task owns the whole machine. Each iteration drains at most one
//! command line, advances the run state machine by one step, and yields.
//! Blocking motion inside a step keeps the serial link alive through the
//! stop-flag polling in [`SerialLink`].

use defmt::*;
use embassy_rp::gpio::{Input, Output};
use embassy_rp::pwm::PwmOutput;
use embassy_time::{Delay, Timer};
use triax_core::controller::Controller;
use triax_drivers::{ServoGripper, StepDirAxis};

use crate::io::{UartReporter, WallClock};
use crate::link::SerialLink;

/// One gantry axis over plain GPIO step/dir pins
pub type GantryAxis = StepDirAxis<Output<'static>, Output<'static>, Input<'static>, Delay>;

/// The fully concrete machine controller
pub type Machine = Controller<
    GantryAxis,
    GantryAxis,
    GantryAxis,
    ServoGripper<PwmOutput<'static>>,
    WallClock,
    &'static SerialLink,
>;

#[embassy_executor::task]
pub async fn control_task(
    mut machine: Machine,
    link: &'static SerialLink,
    mut reporter: UartReporter,
) {
    info!("Control task started");

    loop {
        link.pump();
        if let Some(line) = link.take_line() {
            debug!("rx: {}", line.as_str());
            machine.on_line(line.as_str(), &mut reporter);
        }
        machine.tick(&mut reporter);
        Timer::after_millis(1).await;
    }
}
