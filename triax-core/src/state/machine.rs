//! Run state machine definition
//!
//! One tagged value, advanced by exactly one logical step per scheduler
//! tick. States that wait on external input (decision, settle timer) are
//! non-blocking; states that invoke a motion primitive block the tick for
//! the operation's full duration.

/// Machine run states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RunState {
    /// No run active; commands accepted. Initial and terminal state.
    Idle,
    /// Eased scan move toward the current point (blocking)
    ScanMove,
    /// Settle dwell after arrival (non-blocking wait)
    ScanSettle,
    /// Arrival event emitted; branch by mode on the next tick
    ScanEvtSent,
    /// Mode 1 only: waiting for an external PICK/SKIP decision
    /// (non-blocking wait with timeout)
    WaitDecision,
    /// Pick sequence at the current point (blocking)
    DoPick,
    /// Mode 2 list run: rapid move to the next listed point (blocking)
    Mode2PickGoto,
    /// Mode 2 list run: pick at the listed point (blocking)
    Mode2PickDo,
    /// Mode 3: manual GOTO executing (blocking)
    Mode3WaitGoto,
    /// Mode 3: manual PICKNOW executing (blocking)
    Mode3DoPick,
}

impl RunState {
    /// Check if the machine is idle (no run active)
    pub fn is_idle(&self) -> bool {
        matches!(self, RunState::Idle)
    }

    /// Check if a run is in progress
    pub fn is_running(&self) -> bool {
        !self.is_idle()
    }

    /// Check if this state waits on external input without side effects
    pub fn is_waiting(&self) -> bool {
        matches!(self, RunState::ScanSettle | RunState::WaitDecision)
    }

    /// Wire name for STATUS reporting
    pub fn name(&self) -> &'static str {
        match self {
            RunState::Idle => "IDLE",
            RunState::ScanMove => "SCAN_MOVE",
            RunState::ScanSettle => "SCAN_SETTLE",
            RunState::ScanEvtSent => "SCAN_EVT_SENT",
            RunState::WaitDecision => "WAIT_DECISION",
            RunState::DoPick => "DO_PICK",
            RunState::Mode2PickGoto => "MODE2_PICK_GOTO",
            RunState::Mode2PickDo => "MODE2_PICK_DO",
            RunState::Mode3WaitGoto => "MODE3_WAIT_GOTO",
            RunState::Mode3DoPick => "MODE3_DO_PICK",
        }
    }
}
