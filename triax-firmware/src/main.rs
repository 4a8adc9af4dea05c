//! Triax - Pick-and-Place Gantry Firmware
//!
//! Main firmware binary for RP2040-based 3-axis gantry controllers.
//! Drives three step/dir stepper axes and a servo gripper from a
//! line-oriented serial protocol at 115200 baud.
//!
//! Named for the three orthogonal stepper axes (X, Y, Z) the firmware
//! synchronizes - one control loop, one clock, three pulse trains.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUart, Config as UartConfig};
use embassy_time::Delay;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use triax_core::config::MachineConfig;
use triax_core::controller::Controller;
use triax_drivers::{ServoConfig, ServoGripper, StepDirAxis, StepDirConfig};

use crate::io::{UartReporter, WallClock};
use crate::link::SerialLink;

mod io;
mod link;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

// The serial link is shared between the control task and the stop-flag
// polling inside blocking motion
static LINK: StaticCell<SerialLink> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Triax firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    // Command UART to the vision backend: GP0 (TX) / GP1 (RX), 115200 8N1
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = 115_200;
    let uart = BufferedUart::new(
        p.UART0,
        p.PIN_0,
        p.PIN_1,
        Irqs,
        TX_BUF.init([0; 256]),
        RX_BUF.init([0; 256]),
        uart_config,
    );
    let (tx, rx) = uart.split();
    let link: &'static SerialLink = LINK.init(SerialLink::new(rx));

    // Step/dir axes; limit switches are normally-closed to ground
    let axis_config = StepDirConfig::default();
    let x_axis = StepDirAxis::new(
        Output::new(p.PIN_2, Level::Low),
        Output::new(p.PIN_3, Level::Low),
        Input::new(p.PIN_4, Pull::Up),
        Delay,
        axis_config,
    );
    let y_axis = StepDirAxis::new(
        Output::new(p.PIN_6, Level::Low),
        Output::new(p.PIN_7, Level::Low),
        Input::new(p.PIN_8, Pull::Up),
        Delay,
        axis_config,
    );
    let z_axis = StepDirAxis::new(
        Output::new(p.PIN_10, Level::Low),
        Output::new(p.PIN_11, Level::Low),
        Input::new(p.PIN_12, Pull::Up),
        Delay,
        axis_config,
    );

    // Gripper servo on GP16 (PWM slice 0 channel A), standard 50 Hz frame
    let mut pwm_config = PwmConfig::default();
    pwm_config.divider = 125u8.into(); // 125 MHz / 125 = 1 µs per tick
    pwm_config.top = 19_999; // 20 ms period
    let pwm = Pwm::new_output_a(p.PWM_SLICE0, p.PIN_16, pwm_config);
    let (Some(servo_pwm), _) = pwm.split() else {
        defmt::panic!("servo PWM output missing");
    };
    let gripper = ServoGripper::new(servo_pwm, ServoConfig::default());

    let machine = Controller::new(
        x_axis,
        y_axis,
        z_axis,
        gripper,
        WallClock,
        link,
        MachineConfig::default(),
    );
    let reporter = UartReporter::new(tx);

    spawner.spawn(tasks::control_task(machine, link, reporter)).unwrap();

    info!("Control loop running");
}
