//! Hobby-servo gripper
//!
//! Standard RC servo on 50 Hz PWM: the pulse width (1-2 ms within the
//! 20 ms period) selects the horn angle. The gripper is open at one end
//! of the travel and closed at the other; intermediate positions are not
//! used.

use embedded_hal::pwm::SetDutyCycle;
use triax_core::traits::Gripper;

/// Servo pulse timing
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ServoConfig {
    /// PWM period (µs); 20 000 for standard 50 Hz servos
    pub period_us: u16,
    /// Pulse width for the open position (µs)
    pub open_pulse_us: u16,
    /// Pulse width for the closed position (µs)
    pub closed_pulse_us: u16,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            period_us: 20_000,
            open_pulse_us: 1_000,
            closed_pulse_us: 2_000,
        }
    }
}

/// Gripper implementation over one PWM channel
pub struct ServoGripper<P> {
    pwm: P,
    config: ServoConfig,
    closed: bool,
}

impl<P: SetDutyCycle> ServoGripper<P> {
    /// Create the gripper and command the open position
    pub fn new(mut pwm: P, config: ServoConfig) -> Self {
        let _ = pwm.set_duty_cycle_fraction(config.open_pulse_us, config.period_us);
        Self {
            pwm,
            config,
            closed: false,
        }
    }

    fn set_pulse(&mut self, pulse_us: u16) {
        // PWM duty writes on this target are infallible
        let _ = self
            .pwm
            .set_duty_cycle_fraction(pulse_us, self.config.period_us);
    }
}

impl<P: SetDutyCycle> Gripper for ServoGripper<P> {
    fn open(&mut self) {
        self.set_pulse(self.config.open_pulse_us);
        self.closed = false;
    }

    fn close(&mut self) {
        self.set_pulse(self.config.closed_pulse_us);
        self.closed = true;
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}
