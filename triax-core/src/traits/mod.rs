//! Hardware abstraction traits
//!
//! These traits decouple the core logic from board-specific implementations.
//! The firmware crate provides implementations over real GPIO and timers;
//! tests use mock implementations.

pub mod axis;
pub mod clock;
pub mod gripper;
pub mod reporter;
pub mod stop;

pub use axis::{AxisIo, Direction};
pub use clock::Clock;
pub use gripper::Gripper;
pub use reporter::Reporter;
pub use stop::StopFlag;
