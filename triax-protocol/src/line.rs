//! Incoming line accumulation.
//!
//! Serial bytes arrive one at a time; the [`LineBuffer`] collects them until
//! a terminator is seen and then yields the completed line. The buffer is
//! bounded: once the cap is reached the oldest byte is dropped, so a runaway
//! sender can never wedge the parser - the most recent 200 bytes always win.

use heapless::{String, Vec};

/// Maximum accumulated line length in bytes
pub const LINE_CAP: usize = 200;

/// A completed input line
pub type Line = String<LINE_CAP>;

/// Accumulator for incoming serial bytes
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: Vec<u8, LINE_CAP>,
}

impl LineBuffer {
    /// Create an empty line buffer
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Feed a single byte
    ///
    /// Returns `Some(line)` when a terminator (`\n` or `\r`) completes a
    /// non-empty line. Empty lines (for example the `\n` of a `\r\n` pair)
    /// yield `None`. Non-UTF-8 content discards the pending line.
    pub fn push(&mut self, byte: u8) -> Option<Line> {
        if byte == b'\n' || byte == b'\r' {
            return self.take_line();
        }

        if self.buf.is_full() {
            // Drop the oldest byte to keep the most recent content
            self.buf.remove(0);
        }
        // Cannot fail: we just made room
        let _ = self.buf.push(byte);
        None
    }

    /// Feed a slice of bytes, returning the first completed line
    ///
    /// Bytes after the terminator are not consumed; call again with the
    /// remainder (or feed byte-wise) to drain multiple lines.
    pub fn push_bytes(&mut self, bytes: &[u8]) -> (usize, Option<Line>) {
        for (i, &byte) in bytes.iter().enumerate() {
            if let Some(line) = self.push(byte) {
                return (i + 1, Some(line));
            }
        }
        (bytes.len(), None)
    }

    /// Number of pending (unterminated) bytes
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Discard any pending bytes
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    fn take_line(&mut self) -> Option<Line> {
        if self.buf.is_empty() {
            return None;
        }
        let raw = core::mem::take(&mut self.buf);
        match String::from_utf8(raw) {
            Ok(line) => Some(line),
            // Garbage on the wire; drop it and resynchronize on the next line
            Err(_) => None,
        }
    }
}
