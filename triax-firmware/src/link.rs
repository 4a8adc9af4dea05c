//! Serial command link
//!
//! Wraps the buffered UART receiver behind the core's stop-flag trait so
//! that blocking motion can notice a `STOP` while a pulse train is in
//! flight: every stop poll drains whatever bytes have arrived, and a
//! completed `STOP` line latches the flag immediately. All other completed
//! lines are queued for the control loop to dispatch between motions.

use core::cell::RefCell;
use core::sync::atomic::Ordering;

use embassy_rp::uart::BufferedUartRx;
use embedded_io::{Read, ReadReady};
use heapless::Deque;
use portable_atomic::AtomicBool;
use triax_core::traits::StopFlag;
use triax_protocol::{Line, LineBuffer};

/// Completed lines held between control-loop iterations
const LINE_QUEUE_DEPTH: usize = 4;

struct LinkInner {
    rx: BufferedUartRx<'static>,
    line: LineBuffer,
    queue: Deque<Line, LINE_QUEUE_DEPTH>,
}

/// The command link: UART receiver, line accumulator, stop latch
///
/// Lives in a `StaticCell` so the control task and the motion primitives
/// (through the `StopFlag` blanket impl on `&SerialLink`) can share it.
pub struct SerialLink {
    inner: RefCell<LinkInner>,
    stop: AtomicBool,
}

impl SerialLink {
    pub fn new(rx: BufferedUartRx<'static>) -> Self {
        Self {
            inner: RefCell::new(LinkInner {
                rx,
                line: LineBuffer::new(),
                queue: Deque::new(),
            }),
            stop: AtomicBool::new(false),
        }
    }

    /// Drain available UART bytes into the line accumulator
    ///
    /// Called from the control loop and from every stop poll. Never blocks:
    /// only bytes already in the UART ring buffer are consumed.
    pub fn pump(&self) {
        let mut inner = self.inner.borrow_mut();
        let mut byte = [0u8; 1];
        loop {
            match inner.rx.read_ready() {
                Ok(true) => {}
                _ => return,
            }
            let Ok(n) = inner.rx.read(&mut byte) else {
                return;
            };
            if n == 0 {
                return;
            }
            if let Some(line) = inner.line.push(byte[0]) {
                if is_stop_line(line.as_str()) {
                    self.stop.store(true, Ordering::Relaxed);
                }
                // The dispatcher still sees the STOP line (for the OK
                // reply); a full queue drops the newest line
                let _ = inner.queue.push_back(line);
            }
        }
    }

    /// Take the oldest completed line, if any
    pub fn take_line(&self) -> Option<Line> {
        self.inner.borrow_mut().queue.pop_front()
    }
}

impl StopFlag for SerialLink {
    fn is_set(&self) -> bool {
        self.pump();
        self.stop.load(Ordering::Relaxed)
    }

    fn set(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }

    fn clear(&self) {
        self.stop.store(false, Ordering::Relaxed);
    }
}

fn is_stop_line(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("STOP")
}
