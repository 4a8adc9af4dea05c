//! Command dispatcher
//!
//! [`Controller`] owns the hardware handles and all mutable machine state.
//! [`Controller::on_line`] parses one serial line and either replies
//! immediately, executes a blocking operation to completion, or arms the
//! run state machine for [`Controller::tick`](crate::run) to advance.
//!
//! Gate order for rejections is fixed: stop flag first, then busy, then
//! mode, then homed. A rejected command changes no state.

use heapless::Vec;
use triax_protocol::{
    Command, CommandError, Decision, Mode, Reject, Report, StatusSnapshot,
    MAX_LIST_POINTS,
};

use crate::config::{MachineConfig, Point, PointTable};
use crate::motion::{self, MotionError, Position};
use crate::pick::pick_sequence;
use crate::state::RunState;
use crate::traits::{AxisIo, Clock, Gripper, Reporter, StopFlag};

/// The machine controller: hardware handles plus run state
pub struct Controller<X, Y, Z, G, C, S> {
    pub(crate) x: X,
    pub(crate) y: Y,
    pub(crate) z: Z,
    pub(crate) gripper: G,
    pub(crate) clock: C,
    pub(crate) stop: S,
    pub(crate) cfg: MachineConfig,
    pub(crate) points: PointTable,
    pub(crate) position: Position,
    pub(crate) homed: bool,
    pub(crate) mode: Mode,
    pub(crate) state: RunState,
    /// Current scan target (1-9) during a traversal run
    pub(crate) point: u8,
    /// Point indices for a mode 2 list run
    pub(crate) list: Vec<u8, MAX_LIST_POINTS>,
    pub(crate) list_pos: usize,
    /// Decision received while in (or ahead of) WAIT_DECISION
    pub(crate) pending: Option<Decision>,
    pub(crate) settle_deadline_us: u64,
    pub(crate) decision_deadline_us: u64,
}

impl<X, Y, Z, G, C, S> Controller<X, Y, Z, G, C, S>
where
    X: AxisIo,
    Y: AxisIo,
    Z: AxisIo,
    G: Gripper,
    C: Clock,
    S: StopFlag,
{
    /// Create a controller in the unhomed idle state
    pub fn new(x: X, y: Y, z: Z, gripper: G, clock: C, stop: S, cfg: MachineConfig) -> Self {
        Self {
            x,
            y,
            z,
            gripper,
            clock,
            stop,
            cfg,
            points: PointTable::new(),
            position: Position::origin(),
            homed: false,
            mode: Mode::Live,
            state: RunState::Idle,
            point: 1,
            list: Vec::new(),
            list_pos: 0,
            pending: None,
            settle_deadline_us: 0,
            decision_deadline_us: 0,
        }
    }

    /// Last committed XY position (mm)
    pub fn position(&self) -> Position {
        self.position
    }

    /// Whether the origin is currently trusted
    pub fn is_homed(&self) -> bool {
        self.homed
    }

    /// Active mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Current run state
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Handle one complete serial line
    pub fn on_line<R: Reporter>(&mut self, line: &str, rep: &mut R) {
        match Command::parse(line) {
            Ok(cmd) => self.dispatch(cmd, rep),
            // Blank lines (stray terminators) are dropped without a reply
            Err(CommandError::Empty) => {}
            Err(CommandError::Unknown) => rep.report(Report::Error(Reject::Unknown)),
            Err(CommandError::BadArgument) => rep.report(Report::Error(Reject::BadArg)),
        }
    }

    fn dispatch<R: Reporter>(&mut self, cmd: Command, rep: &mut R) {
        match cmd {
            Command::Stop => {
                self.stop.set();
                rep.report(Report::Ok);
            }
            Command::Unstop => {
                self.stop.clear();
                rep.report(Report::Ok);
            }
            Command::Status => rep.report(Report::Status(self.snapshot())),
            // The offset applies from the next move on; accepted any time
            Command::Offset { dx_mm, dy_mm } => {
                self.points.set_offset(dx_mm, dy_mm);
                rep.report(Report::Ok);
            }
            Command::Home => self.cmd_home(rep),
            Command::SetMode(mode) => {
                if self.state.is_running() {
                    rep.report(Report::Error(Reject::Busy));
                } else {
                    self.mode = mode;
                    rep.report(Report::Ok);
                }
            }
            Command::Start => self.cmd_start(rep),
            Command::Dec(decision) => {
                // Only meaningful while a mode 1 run is waiting; otherwise
                // accepted and dropped so the vision backend never stalls
                if self.mode == Mode::Live && self.state.is_running() {
                    self.pending = Some(decision);
                }
                rep.report(Report::Ok);
            }
            Command::List(points) => self.cmd_list(points, rep),
            Command::Goto(n) => self.cmd_goto(n, rep),
            Command::PickNow => self.cmd_picknow(rep),
            Command::Dwell { seconds } => self.cmd_dwell(seconds, rep),
            Command::MoveTo { x_mm, y_mm } => self.cmd_move_to(x_mm, y_mm, rep),
            Command::PickAt { x_mm, y_mm } => self.cmd_pick_at(x_mm, y_mm, rep),
        }
    }

    /// Snapshot for the `?` status line
    pub(crate) fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            state: self.state.name(),
            mode: self.mode.number(),
            homed: self.homed,
            stopped: self.stop.is_set(),
            x_mm: self.position.x_mm,
            y_mm: self.position.y_mm,
        }
    }

    /// Common gates for commands that start motion from idle.
    /// Returns `false` (after replying) if the command must be rejected.
    fn gate_idle_motion<R: Reporter>(&mut self, rep: &mut R) -> bool {
        if self.stop.is_set() {
            rep.report(Report::Error(Reject::Stopped));
            return false;
        }
        if self.state.is_running() {
            rep.report(Report::Error(Reject::Busy));
            return false;
        }
        true
    }

    fn gate_homed<R: Reporter>(&mut self, rep: &mut R) -> bool {
        if self.homed {
            return true;
        }
        rep.report(Report::Error(Reject::NotHomed));
        false
    }

    fn cmd_home<R: Reporter>(&mut self, rep: &mut R) {
        if !self.gate_idle_motion(rep) {
            return;
        }
        match motion::home_all(
            &mut self.x,
            &mut self.y,
            &mut self.z,
            &self.clock,
            &self.stop,
            &self.cfg,
            rep,
        ) {
            Ok(()) => {
                self.position = Position::origin();
                self.homed = true;
                rep.report(Report::Homed);
                rep.report(Report::Ok);
            }
            Err(MotionError::Stopped) => {
                self.homed = false;
                rep.report(Report::Stopped);
                rep.report(Report::Error(Reject::Stopped));
            }
            Err(MotionError::LimitNotFound) => {
                self.homed = false;
                rep.report(Report::Error(Reject::Fault));
            }
        }
    }

    fn cmd_start<R: Reporter>(&mut self, rep: &mut R) {
        if !self.gate_idle_motion(rep) {
            return;
        }
        if self.mode == Mode::Manual {
            rep.report(Report::Error(Reject::BadMode));
            return;
        }
        if !self.gate_homed(rep) {
            return;
        }
        self.point = 1;
        self.pending = None;
        self.state = RunState::ScanMove;
        rep.report(Report::Ok);
    }

    fn cmd_list<R: Reporter>(&mut self, points: Vec<u8, MAX_LIST_POINTS>, rep: &mut R) {
        if self.mode != Mode::Scan {
            rep.report(Report::Error(Reject::BadMode));
            return;
        }
        if !self.gate_idle_motion(rep) || !self.gate_homed(rep) {
            return;
        }
        if points.is_empty() {
            // Nothing to do; stay idle
            rep.report(Report::Ok);
            return;
        }
        rep.report(Report::ListAccepted(points.len() as u8));
        self.list = points;
        self.list_pos = 0;
        self.state = RunState::Mode2PickGoto;
        rep.report(Report::Ok);
    }

    fn cmd_goto<R: Reporter>(&mut self, n: u8, rep: &mut R) {
        if self.mode != Mode::Manual {
            rep.report(Report::Error(Reject::BadMode));
            return;
        }
        if !self.gate_idle_motion(rep) || !self.gate_homed(rep) {
            return;
        }
        let Some(target) = self.points.get(n) else {
            rep.report(Report::Error(Reject::BadArg));
            return;
        };
        self.state = RunState::Mode3WaitGoto;
        let result = self.do_scan_move(target);
        self.state = RunState::Idle;
        self.reply_motion(result, rep);
    }

    fn cmd_picknow<R: Reporter>(&mut self, rep: &mut R) {
        if self.mode != Mode::Manual {
            rep.report(Report::Error(Reject::BadMode));
            return;
        }
        if !self.gate_idle_motion(rep) || !self.gate_homed(rep) {
            return;
        }
        self.state = RunState::Mode3DoPick;
        let result = self.do_pick();
        self.state = RunState::Idle;
        self.reply_motion(result, rep);
    }

    fn cmd_dwell<R: Reporter>(&mut self, seconds: f32, rep: &mut R) {
        if !self.gate_idle_motion(rep) {
            return;
        }
        let ms = (seconds * 1_000.0) as u32;
        match motion::pause(&self.clock, &self.stop, ms) {
            Ok(()) => rep.report(Report::Ok),
            // No motion was in flight, so the origin stays trusted
            Err(_) => rep.report(Report::Error(Reject::Stopped)),
        }
    }

    fn cmd_move_to<R: Reporter>(&mut self, x_mm: f32, y_mm: f32, rep: &mut R) {
        if !self.gate_idle_motion(rep) || !self.gate_homed(rep) {
            return;
        }
        let result = self.do_scan_move(Point::new(x_mm, y_mm));
        self.reply_motion(result, rep);
    }

    fn cmd_pick_at<R: Reporter>(&mut self, x_mm: f32, y_mm: f32, rep: &mut R) {
        if !self.gate_idle_motion(rep) || !self.gate_homed(rep) {
            return;
        }
        let result = self
            .do_scan_move(Point::new(x_mm, y_mm))
            .and_then(|()| self.do_pick());
        self.reply_motion(result, rep);
    }

    /// Reply for a synchronously executed motion command. A truncated pulse
    /// train leaves the physical position unknown, so the origin is dropped
    /// until the next homing.
    fn reply_motion<R: Reporter>(&mut self, result: Result<(), MotionError>, rep: &mut R) {
        match result {
            Ok(()) => rep.report(Report::Ok),
            Err(MotionError::Stopped) => {
                self.homed = false;
                rep.report(Report::Stopped);
                rep.report(Report::Error(Reject::Stopped));
            }
            Err(MotionError::LimitNotFound) => {
                self.homed = false;
                rep.report(Report::Error(Reject::Fault));
            }
        }
    }

    pub(crate) fn do_scan_move(&mut self, target: Point) -> Result<(), MotionError> {
        motion::scan_move(
            &mut self.x,
            &mut self.y,
            &self.clock,
            &self.stop,
            &self.cfg,
            &mut self.position,
            target,
        )
    }

    pub(crate) fn do_rapid_move(&mut self, target: Point) -> Result<(), MotionError> {
        motion::rapid_move(
            &mut self.x,
            &mut self.y,
            &self.clock,
            &self.stop,
            &self.cfg,
            &mut self.position,
            target,
        )
    }

    pub(crate) fn do_pick(&mut self) -> Result<(), MotionError> {
        pick_sequence(
            &mut self.x,
            &mut self.y,
            &mut self.z,
            &mut self.gripper,
            &self.clock,
            &self.stop,
            &self.cfg,
            &mut self.position,
        )
    }

    pub(crate) fn do_home<R: Reporter>(&mut self, rep: &mut R) -> Result<(), MotionError> {
        motion::home_all(
            &mut self.x,
            &mut self.y,
            &mut self.z,
            &self.clock,
            &self.stop,
            &self.cfg,
            rep,
        )
    }
}
