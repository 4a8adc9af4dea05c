//! Stepper axis I/O trait
//!
//! This trait abstracts one step/direction stepper channel plus its home
//! limit sensor. Implementations bit-bang real pins (A4988/DRV8825-class
//! drivers) or record pulses for tests.

/// Axis travel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Away from the home limit (increasing coordinate)
    Positive,
    /// Toward the home limit (decreasing coordinate)
    Negative,
}

impl Direction {
    /// Get the opposite direction
    pub fn opposite(self) -> Self {
        match self {
            Direction::Positive => Direction::Negative,
            Direction::Negative => Direction::Positive,
        }
    }

    /// Sign of the coordinate change per step (+1 / -1)
    pub fn sign(self) -> i32 {
        match self {
            Direction::Positive => 1,
            Direction::Negative => -1,
        }
    }

    /// Direction that moves the axis by `delta` (mm or steps)
    pub fn of(delta: f32) -> Self {
        if delta >= 0.0 {
            Direction::Positive
        } else {
            Direction::Negative
        }
    }
}

/// Trait for a single stepper axis with a home limit sensor
///
/// Contract: [`AxisIo::step`] emits exactly one pulse and must not return
/// before the driver's minimum high-time has elapsed. The control loop is
/// single-threaded, so the pulse is atomic with respect to all other work.
pub trait AxisIo {
    /// Latch the travel direction for subsequent pulses
    ///
    /// Direction is set once at move start; drivers sample it on the step
    /// edge, so it must not change while a pulse is in flight.
    fn set_direction(&mut self, dir: Direction);

    /// Emit one step pulse (assert, hold minimum high-time, deassert)
    fn step(&mut self);

    /// Read the home limit sensor
    fn limit_triggered(&mut self) -> bool;
}
