//! Triax Serial Command Protocol
//!
//! This crate defines the line-oriented ASCII protocol between the external
//! controller (vision/decision service, operator console) and the gantry
//! firmware. The protocol is designed for simplicity, human readability,
//! and robustness over a plain serial link.
//!
//! # Protocol Overview
//!
//! Both directions carry one message per line, terminated by `\n` (a bare
//! `\r` is also accepted). Commands are case-insensitive ASCII words with
//! whitespace-separated arguments:
//!
//! ```text
//! controller -> robot:   MODE 1        START        DEC PICK
//! robot -> controller:   OK            EVT ARRIVED P3        ERR NOT_HOMED
//! ```
//!
//! The robot answers every command line with `OK` or `ERR <reason>`, and
//! emits asynchronous `EVT` lines for arrivals, homing stages, pick/skip
//! outcomes, and run completion. Events carry no acknowledgment requirement.

#![no_std]
#![deny(unsafe_code)]

pub mod command;
pub mod events;
pub mod line;

pub use command::{Command, CommandError, Decision, Mode, MAX_LIST_POINTS};
pub use events::{AxisName, Reject, Report, StatusSnapshot, MAX_LINE_LEN};
pub use line::{Line, LineBuffer, LINE_CAP};
