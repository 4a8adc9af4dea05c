//! Mock hardware for unit tests
//!
//! The mocks keep virtual time: `MockClock::delay_us` advances `now_us`
//! instantly, so pulse-accurate motion runs in microseconds of host time.
//! `MockStop::trip_after(n)` arms the flag to flip on the n-th poll, which
//! is how mid-motion stop behavior is exercised deterministically.

use core::cell::Cell;

use heapless::Vec;
use triax_protocol::Report;

use crate::traits::{AxisIo, Clock, Direction, Gripper, Reporter};
use crate::traits::StopFlag;

/// Recording stepper axis
#[derive(Debug)]
pub struct MockAxis {
    /// Total pulses emitted
    pub pulses: u32,
    /// Last latched direction
    pub dir: Direction,
    /// Limit triggers after this many homeward (negative) pulses
    pub limit_after: Option<u32>,
    homeward_pulses: u32,
}

impl MockAxis {
    pub fn new() -> Self {
        Self {
            pulses: 0,
            dir: Direction::Positive,
            limit_after: None,
            homeward_pulses: 0,
        }
    }

    /// Axis whose limit sensor fires after `n` homeward pulses
    pub fn with_limit_after(n: u32) -> Self {
        Self {
            limit_after: Some(n),
            ..Self::new()
        }
    }
}

impl AxisIo for MockAxis {
    fn set_direction(&mut self, dir: Direction) {
        self.dir = dir;
    }

    fn step(&mut self) {
        self.pulses += 1;
        if self.dir == Direction::Negative {
            self.homeward_pulses += 1;
        }
    }

    fn limit_triggered(&mut self) -> bool {
        self.limit_after
            .map(|n| self.homeward_pulses >= n)
            .unwrap_or(false)
    }
}

/// Virtual-time clock
#[derive(Debug)]
pub struct MockClock {
    now: Cell<u64>,
    /// Extra microseconds added on every `now_us` read, simulating time
    /// passing between scheduler ticks
    pub auto_tick_us: Cell<u64>,
}

impl MockClock {
    pub fn new() -> Self {
        Self {
            now: Cell::new(0),
            auto_tick_us: Cell::new(0),
        }
    }

    pub fn with_auto_tick(us: u64) -> Self {
        let clock = Self::new();
        clock.auto_tick_us.set(us);
        clock
    }

    pub fn advance_us(&self, us: u64) {
        self.now.set(self.now.get() + us);
    }
}

impl Clock for MockClock {
    fn now_us(&self) -> u64 {
        self.advance_us(self.auto_tick_us.get());
        self.now.get()
    }

    fn delay_us(&self, us: u32) {
        self.advance_us(u64::from(us));
    }
}

/// Settable stop flag with an optional poll-count trip wire
#[derive(Debug)]
pub struct MockStop {
    flag: Cell<bool>,
    trip_in: Cell<Option<u32>>,
}

impl MockStop {
    pub fn new() -> Self {
        Self {
            flag: Cell::new(false),
            trip_in: Cell::new(None),
        }
    }

    /// Arm the flag to flip on the n-th `is_set` poll
    pub fn trip_after(&self, polls: u32) {
        self.trip_in.set(Some(polls));
    }
}

impl StopFlag for MockStop {
    fn is_set(&self) -> bool {
        if let Some(n) = self.trip_in.get() {
            if n == 0 {
                self.flag.set(true);
                self.trip_in.set(None);
            } else {
                self.trip_in.set(Some(n - 1));
            }
        }
        self.flag.get()
    }

    fn set(&self) {
        self.flag.set(true);
    }

    fn clear(&self) {
        self.flag.set(false);
        self.trip_in.set(None);
    }
}

/// Counting gripper
#[derive(Debug)]
pub struct MockGripper {
    pub closes: u32,
    pub opens: u32,
    closed: bool,
}

impl MockGripper {
    pub fn new() -> Self {
        Self {
            closes: 0,
            opens: 0,
            closed: false,
        }
    }
}

impl Gripper for MockGripper {
    fn open(&mut self) {
        self.opens += 1;
        self.closed = false;
    }

    fn close(&mut self) {
        self.closes += 1;
        self.closed = true;
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

/// Report sink collecting into a bounded Vec
#[derive(Debug)]
pub struct VecReporter {
    pub reports: Vec<Report, 128>,
}

impl VecReporter {
    pub fn new() -> Self {
        Self {
            reports: Vec::new(),
        }
    }

    /// Count reports matching a predicate
    pub fn count(&self, pred: impl Fn(&Report) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(r)).count()
    }

    /// Last report, if any
    pub fn last(&self) -> Option<&Report> {
        self.reports.last()
    }
}

impl Reporter for VecReporter {
    fn report(&mut self, report: Report) {
        // Tests assert on the collected list; overflow would only hide
        // reports, so drop silently at the cap
        let _ = self.reports.push(report);
    }
}
