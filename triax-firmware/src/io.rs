//! Clock and report sinks over the RP2040 peripherals

use embassy_rp::uart::BufferedUartTx;
use embassy_time::{block_for, Duration, Instant};
use embedded_io::Write;
use triax_core::traits::{Clock, Reporter};
use triax_protocol::Report;

/// Monotonic microsecond clock over the embassy time driver
///
/// Delays are busy-blocking on purpose: the control loop is synchronous
/// and pulse pacing must not yield to the executor mid-train.
pub struct WallClock;

impl Clock for WallClock {
    fn now_us(&self) -> u64 {
        Instant::now().as_micros()
    }

    fn delay_us(&self, us: u32) {
        block_for(Duration::from_micros(u64::from(us)));
    }
}

/// Report sink writing protocol lines to the command UART
pub struct UartReporter {
    tx: BufferedUartTx<'static>,
}

impl UartReporter {
    pub fn new(tx: BufferedUartTx<'static>) -> Self {
        Self { tx }
    }
}

impl Reporter for UartReporter {
    fn report(&mut self, report: Report) {
        let line = report.to_line();
        defmt::debug!("tx: {}", line.as_str());
        // A wedged host cannot be helped from here; drop on write error
        let _ = self.tx.write_all(line.as_bytes());
        let _ = self.tx.write_all(b"\r\n");
    }
}
