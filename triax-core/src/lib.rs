//! Board-agnostic core logic for the Triax pick-and-place gantry firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (axis, gripper, clock, stop flag)
//! - Motion primitives (eased scan moves, rapid transit, ramped Z travel)
//! - Homing sequence
//! - Pick action sequencer
//! - Run state machine and command dispatcher
//! - Configuration type definitions
//!
//! Everything here runs single-threaded: one control-loop tick drains at
//! most one command line and advances the run state machine by one logical
//! step. Motion primitives block the loop for their full duration, polling
//! the stop flag at per-pulse granularity.

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod controller;
pub mod motion;
pub mod pick;
pub mod run;
pub mod state;
pub mod traits;

#[cfg(test)]
pub(crate) mod testutil;
