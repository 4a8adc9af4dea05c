//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in triax-core over the embedded-hal 1.0 interfaces:
//!
//! - Step/dir stepper axes with a limit switch input
//! - Hobby-servo gripper driven by 50 Hz PWM

#![no_std]
#![deny(unsafe_code)]

pub mod servo;
pub mod step_dir;

pub use servo::{ServoConfig, ServoGripper};
pub use step_dir::{StepDirAxis, StepDirConfig};
