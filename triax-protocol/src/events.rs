//! Outgoing reports: command replies and asynchronous events.
//!
//! Every line the robot sends starts with one of three words:
//!
//! - `OK` - the last command was accepted (and, for blocking commands,
//!   has completed)
//! - `ERR <reason>` - the last command was rejected; no state changed
//! - `EVT <...>` - asynchronous notification (arrival, homing stage,
//!   pick/skip outcome, run completion)

use core::fmt::Write;

use heapless::String;

/// Maximum encoded report line length (excluding the terminator)
pub const MAX_LINE_LEN: usize = 96;

/// Axis identity as it appears on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisName {
    X,
    Y,
    Z,
}

impl AxisName {
    fn as_str(self) -> &'static str {
        match self {
            AxisName::X => "X",
            AxisName::Y => "Y",
            AxisName::Z => "Z",
        }
    }
}

/// Reasons a command is rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reject {
    /// Operation requires a completed homing sequence
    NotHomed,
    /// Stop flag is set; issue UNSTOP first
    Stopped,
    /// A run is in progress
    Busy,
    /// Command not valid in the current mode
    BadMode,
    /// Malformed or out-of-range argument
    BadArg,
    /// Homing gave up before a limit sensor triggered
    Fault,
    /// Unrecognized command line
    Unknown,
}

impl Reject {
    fn as_str(self) -> &'static str {
        match self {
            Reject::NotHomed => "NOT_HOMED",
            Reject::Stopped => "STOPPED",
            Reject::Busy => "BUSY",
            Reject::BadMode => "BAD_MODE",
            Reject::BadArg => "BAD_ARG",
            Reject::Fault => "FAULT",
            Reject::Unknown => "UNKNOWN",
        }
    }
}

/// One-line machine status, answered to `?`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusSnapshot {
    /// Run state name (e.g. "IDLE", "WAIT_DECISION")
    pub state: &'static str,
    /// Active mode number (1-3)
    pub mode: u8,
    /// Homing completed and still trusted
    pub homed: bool,
    /// Stop flag currently set
    pub stopped: bool,
    /// Last committed X position in mm
    pub x_mm: f32,
    /// Last committed Y position in mm
    pub y_mm: f32,
}

/// A report line from the robot to the controller
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Report {
    /// Command accepted / completed
    Ok,
    /// Command rejected, no state change
    Error(Reject),
    /// Scan move finished; the head is settled over point `n`
    Arrived(u8),
    /// Pick sequence at point `n` completed
    Picked(u8),
    /// Point `n` skipped (external decision or timeout)
    Skipped(u8),
    /// Homing of one axis started
    Homing(AxisName),
    /// Full homing sequence completed; origin established
    Homed,
    /// List-driven pick run accepted with this many points
    ListAccepted(u8),
    /// Mode 2 scan traversal finished
    ScanDone,
    /// Run finished and the machine is back in IDLE
    RunDone,
    /// Stop flag observed; run truncated
    Stopped,
    /// Status snapshot
    Status(StatusSnapshot),
}

impl Report {
    /// Encode this report as a protocol line (no terminator)
    pub fn to_line(&self) -> String<MAX_LINE_LEN> {
        let mut out = String::new();
        // MAX_LINE_LEN bounds every variant; a full buffer truncates
        let _ = match self {
            Report::Ok => write!(out, "OK"),
            Report::Error(reason) => write!(out, "ERR {}", reason.as_str()),
            Report::Arrived(n) => write!(out, "EVT ARRIVED P{n}"),
            Report::Picked(n) => write!(out, "EVT PICKED P{n}"),
            Report::Skipped(n) => write!(out, "EVT SKIPPED P{n}"),
            Report::Homing(axis) => write!(out, "EVT HOMING {}", axis.as_str()),
            Report::Homed => write!(out, "EVT HOMED"),
            Report::ListAccepted(n) => write!(out, "EVT LIST {n}"),
            Report::ScanDone => write!(out, "EVT SCAN DONE"),
            Report::RunDone => write!(out, "EVT RUN DONE"),
            Report::Stopped => write!(out, "EVT STOPPED"),
            Report::Status(s) => write!(
                out,
                "OK STATE={} MODE={} HOMED={} STOPPED={} X={:.2} Y={:.2}",
                s.state,
                s.mode,
                u8::from(s.homed),
                u8::from(s.stopped),
                s.x_mm,
                s.y_mm
            ),
        };
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replies() {
        assert_eq!(Report::Ok.to_line().as_str(), "OK");
        assert_eq!(
            Report::Error(Reject::NotHomed).to_line().as_str(),
            "ERR NOT_HOMED"
        );
        assert_eq!(
            Report::Error(Reject::BadMode).to_line().as_str(),
            "ERR BAD_MODE"
        );
        assert_eq!(Report::Error(Reject::Fault).to_line().as_str(), "ERR FAULT");
    }

    #[test]
    fn test_events() {
        assert_eq!(Report::Arrived(3).to_line().as_str(), "EVT ARRIVED P3");
        assert_eq!(Report::Picked(9).to_line().as_str(), "EVT PICKED P9");
        assert_eq!(Report::Skipped(1).to_line().as_str(), "EVT SKIPPED P1");
        assert_eq!(
            Report::Homing(AxisName::Z).to_line().as_str(),
            "EVT HOMING Z"
        );
        assert_eq!(Report::Homed.to_line().as_str(), "EVT HOMED");
        assert_eq!(Report::ListAccepted(3).to_line().as_str(), "EVT LIST 3");
        assert_eq!(Report::ScanDone.to_line().as_str(), "EVT SCAN DONE");
        assert_eq!(Report::RunDone.to_line().as_str(), "EVT RUN DONE");
        assert_eq!(Report::Stopped.to_line().as_str(), "EVT STOPPED");
    }

    #[test]
    fn test_status_line() {
        let line = Report::Status(StatusSnapshot {
            state: "IDLE",
            mode: 2,
            homed: true,
            stopped: false,
            x_mm: 120.0,
            y_mm: 400.5,
        })
        .to_line();
        assert_eq!(
            line.as_str(),
            "OK STATE=IDLE MODE=2 HOMED=1 STOPPED=0 X=120.00 Y=400.50"
        );
    }

    #[test]
    fn test_lines_fit_buffer() {
        // Longest realistic status line must fit with headroom
        let line = Report::Status(StatusSnapshot {
            state: "WAIT_DECISION",
            mode: 1,
            homed: true,
            stopped: true,
            x_mm: -9999.25,
            y_mm: -9999.75,
        })
        .to_line();
        assert!(line.len() < MAX_LINE_LEN);
    }
}
