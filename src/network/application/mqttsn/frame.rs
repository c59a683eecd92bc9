//! Incremental frame assembly for the inbound byte stream.
//!
//! The first byte of every frame is its total length, so the reader only has
//! to count. It never blocks: bytes are pushed one at a time as they become
//! available and a complete frame is reported as soon as its last byte
//! arrives.
//!
//! A length byte of `0x01` introduces the three-byte length form used for
//! frames of 256 bytes and more. Such frames, and any one-byte length above
//! [`MAX_FRAME_SIZE`], cannot fit the receive buffer and are skipped without
//! being stored.

use super::types::MAX_FRAME_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    /// Waiting for a length byte.
    Length,
    /// Reading the two-byte extended length.
    Extended { high: Option<u8> },
    /// Storing frame bytes.
    Body,
    /// Skipping the rest of an oversized frame.
    Discard(usize),
}

/// Non-blocking frame assembler.
#[derive(Debug, Clone)]
pub struct FrameReader {
    state: ReaderState,
    buf: [u8; MAX_FRAME_SIZE],
    pos: usize,
    expected: usize,
    complete: usize,
    started_at: u32,
    frame_timeout_ms: u32,
}

impl Default for FrameReader {
    fn default() -> Self {
        Self::new(0)
    }
}

impl FrameReader {
    /// Create a reader. A partial frame older than `frame_timeout_ms` is
    /// dropped by [`expire`](Self::expire); `0` disables the timeout.
    pub const fn new(frame_timeout_ms: u32) -> Self {
        Self {
            state: ReaderState::Length,
            buf: [0u8; MAX_FRAME_SIZE],
            pos: 0,
            expected: 0,
            complete: 0,
            started_at: 0,
            frame_timeout_ms,
        }
    }

    /// Forget any partial frame.
    pub fn reset(&mut self) {
        self.state = ReaderState::Length;
        self.pos = 0;
        self.expected = 0;
    }

    /// `true` while a frame has been started but not finished.
    pub fn in_progress(&self) -> bool {
        self.state != ReaderState::Length
    }

    /// Feed one byte received at `now`.
    ///
    /// Returns the frame length when `byte` completed a frame; the frame is
    /// then available from [`frame`](Self::frame) until the next one
    /// completes.
    pub fn push(&mut self, byte: u8, now: u32) -> Option<usize> {
        match self.state {
            ReaderState::Length => {
                self.started_at = now;
                match byte {
                    0 => log::warn!("zero length byte dropped"),
                    1 => self.state = ReaderState::Extended { high: None },
                    len if len as usize > MAX_FRAME_SIZE => {
                        log::warn!("frame of {} bytes exceeds budget, skipping", len);
                        self.state = ReaderState::Discard(len as usize - 1);
                    }
                    len => {
                        self.buf[0] = len;
                        self.pos = 1;
                        self.expected = len as usize;
                        self.state = ReaderState::Body;
                    }
                }
                None
            }
            ReaderState::Extended { high: None } => {
                self.state = ReaderState::Extended { high: Some(byte) };
                None
            }
            ReaderState::Extended { high: Some(high) } => {
                let len = u16::from_be_bytes([high, byte]) as usize;
                log::warn!("extended frame of {} bytes exceeds budget, skipping", len);
                self.state = match len.checked_sub(3) {
                    Some(rest) if rest > 0 => ReaderState::Discard(rest),
                    _ => ReaderState::Length,
                };
                None
            }
            ReaderState::Body => {
                self.buf[self.pos] = byte;
                self.pos += 1;
                if self.pos < self.expected {
                    return None;
                }
                self.complete = self.expected;
                self.reset();
                Some(self.complete)
            }
            ReaderState::Discard(remaining) => {
                self.state = if remaining > 1 {
                    ReaderState::Discard(remaining - 1)
                } else {
                    ReaderState::Length
                };
                None
            }
        }
    }

    /// Drop a partial frame that has been pending for too long.
    ///
    /// Returns `true` when something was discarded.
    pub fn expire(&mut self, now: u32) -> bool {
        if self.frame_timeout_ms == 0 || !self.in_progress() {
            return false;
        }
        if now.wrapping_sub(self.started_at) < self.frame_timeout_ms {
            return false;
        }
        log::warn!("partial frame timed out after {} of {} bytes", self.pos, self.expected);
        self.reset();
        true
    }

    /// The last completed frame.
    pub fn frame(&self) -> &[u8] {
        &self.buf[..self.complete]
    }
}
