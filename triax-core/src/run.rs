//! Run state machine advancement
//!
//! [`Controller::tick`] advances an active run by one logical step.
//! Blocking states (scan move, rapid transit, pick) occupy the tick for the
//! operation's full duration; waiting states (settle, decision) return
//! immediately so the serial pump between ticks stays responsive.
//!
//! A run always ends by re-homing: the head returns to the origin and
//! `EVT RUN DONE` is the last event of a successful run.

use triax_protocol::{Decision, Mode, Reject, Report};

use crate::config::POINT_COUNT;
use crate::controller::Controller;
use crate::motion::{MotionError, Position};
use crate::state::RunState;
use crate::traits::{AxisIo, Clock, Gripper, Reporter, StopFlag};

impl<X, Y, Z, G, C, S> Controller<X, Y, Z, G, C, S>
where
    X: AxisIo,
    Y: AxisIo,
    Z: AxisIo,
    G: Gripper,
    C: Clock,
    S: StopFlag,
{
    /// Advance an active run by one step. A no-op while idle.
    pub fn tick<R: Reporter>(&mut self, rep: &mut R) {
        if self.state.is_idle() {
            return;
        }

        // A stop observed between motions aborts cleanly: no pulse train was
        // truncated, so the origin stays trusted
        if self.stop.is_set() {
            self.pending = None;
            self.list.clear();
            self.list_pos = 0;
            self.state = RunState::Idle;
            rep.report(Report::Stopped);
            return;
        }

        match self.state {
            RunState::Idle => {}
            RunState::ScanMove => self.tick_scan_move(rep),
            RunState::ScanSettle => {
                if self.clock.now_us() >= self.settle_deadline_us {
                    rep.report(Report::Arrived(self.point));
                    self.state = RunState::ScanEvtSent;
                }
            }
            RunState::ScanEvtSent => self.tick_branch_on_mode(rep),
            RunState::WaitDecision => self.tick_wait_decision(rep),
            RunState::DoPick => self.tick_do_pick(rep),
            RunState::Mode2PickGoto => self.tick_list_goto(rep),
            RunState::Mode2PickDo => self.tick_list_pick(rep),
            // Mode 3 operations run synchronously inside dispatch and never
            // reach the tick loop
            RunState::Mode3WaitGoto | RunState::Mode3DoPick => {
                self.state = RunState::Idle;
            }
        }
    }

    fn tick_scan_move<R: Reporter>(&mut self, rep: &mut R) {
        let Some(target) = self.points.get(self.point) else {
            self.state = RunState::Idle;
            return;
        };
        match self.do_scan_move(target) {
            Ok(()) => {
                self.settle_deadline_us =
                    self.clock.now_us() + u64::from(self.cfg.run.scan_settle_ms) * 1_000;
                self.state = RunState::ScanSettle;
            }
            Err(err) => self.abort_motion(err, rep),
        }
    }

    fn tick_branch_on_mode<R: Reporter>(&mut self, rep: &mut R) {
        match self.mode {
            Mode::Live => {
                self.decision_deadline_us = self.clock.now_us()
                    + u64::from(self.cfg.run.decision_timeout_ms) * 1_000;
                self.state = RunState::WaitDecision;
            }
            // Scan-only traversal records nothing; every point is skipped
            Mode::Scan => {
                rep.report(Report::Skipped(self.point));
                self.advance_or_finish(rep);
            }
            Mode::Manual => self.state = RunState::Idle,
        }
    }

    fn tick_wait_decision<R: Reporter>(&mut self, rep: &mut R) {
        if let Some(decision) = self.pending.take() {
            match decision {
                Decision::Pick => self.state = RunState::DoPick,
                Decision::Skip => {
                    rep.report(Report::Skipped(self.point));
                    self.advance_or_finish(rep);
                }
            }
        } else if self.clock.now_us() >= self.decision_deadline_us {
            // No decision in time defaults to skip so the run cannot hang
            rep.report(Report::Skipped(self.point));
            self.advance_or_finish(rep);
        }
    }

    fn tick_do_pick<R: Reporter>(&mut self, rep: &mut R) {
        match self.do_pick() {
            Ok(()) => {
                rep.report(Report::Picked(self.point));
                if usize::from(self.point) < POINT_COUNT {
                    self.point += 1;
                    // The head is over the bin; rapid transit back to the
                    // grid, then settle as after any arrival
                    let Some(target) = self.points.get(self.point) else {
                        self.state = RunState::Idle;
                        return;
                    };
                    match self.do_rapid_move(target) {
                        Ok(()) => {
                            self.settle_deadline_us = self.clock.now_us()
                                + u64::from(self.cfg.run.scan_settle_ms) * 1_000;
                            self.state = RunState::ScanSettle;
                        }
                        Err(err) => self.abort_motion(err, rep),
                    }
                } else {
                    self.finish_run(rep);
                }
            }
            Err(err) => self.abort_motion(err, rep),
        }
    }

    fn tick_list_goto<R: Reporter>(&mut self, rep: &mut R) {
        let Some(target) = self
            .list
            .get(self.list_pos)
            .and_then(|&n| self.points.get(n))
        else {
            self.state = RunState::Idle;
            return;
        };
        match self.do_rapid_move(target) {
            Ok(()) => self.state = RunState::Mode2PickDo,
            Err(err) => self.abort_motion(err, rep),
        }
    }

    fn tick_list_pick<R: Reporter>(&mut self, rep: &mut R) {
        let Some(&n) = self.list.get(self.list_pos) else {
            self.state = RunState::Idle;
            return;
        };
        match self.do_pick() {
            Ok(()) => {
                rep.report(Report::Picked(n));
                self.list_pos += 1;
                if self.list_pos >= self.list.len() {
                    self.finish_run(rep);
                } else {
                    self.state = RunState::Mode2PickGoto;
                }
            }
            Err(err) => self.abort_motion(err, rep),
        }
    }

    fn advance_or_finish<R: Reporter>(&mut self, rep: &mut R) {
        if usize::from(self.point) < POINT_COUNT {
            self.point += 1;
            self.state = RunState::ScanMove;
        } else {
            self.finish_run(rep);
        }
    }

    /// End a completed run: announce, return to the origin, report done
    fn finish_run<R: Reporter>(&mut self, rep: &mut R) {
        if self.mode == Mode::Scan && self.list.is_empty() {
            rep.report(Report::ScanDone);
        }
        match self.do_home(rep) {
            Ok(()) => {
                self.position = Position::origin();
                self.homed = true;
                rep.report(Report::Homed);
                rep.report(Report::RunDone);
            }
            Err(MotionError::Stopped) => {
                self.homed = false;
                rep.report(Report::Stopped);
            }
            Err(MotionError::LimitNotFound) => {
                self.homed = false;
                rep.report(Report::Error(Reject::Fault));
            }
        }
        self.list.clear();
        self.list_pos = 0;
        self.pending = None;
        self.state = RunState::Idle;
    }

    /// A motion primitive aborted mid-run. A truncated pulse train leaves
    /// the physical position unknown, so the origin is dropped.
    fn abort_motion<R: Reporter>(&mut self, err: MotionError, rep: &mut R) {
        self.homed = false;
        self.pending = None;
        self.list.clear();
        self.list_pos = 0;
        self.state = RunState::Idle;
        match err {
            MotionError::Stopped => rep.report(Report::Stopped),
            MotionError::LimitNotFound => rep.report(Report::Error(Reject::Fault)),
        }
    }
}
