//! Single outstanding request tracking.
//!
//! MQTT-SN clients never pipeline: at most one request waits for its
//! acknowledgement at any time. [`ResponseWait`] records which message type
//! is expected, the correlation id, the retry budget and a copy of the frame
//! to retransmit.

use heapless::Vec;

use super::types::{MAX_FRAME_SIZE, MsgType, N_RETRY, T_RETRY};
use crate::network::error::Error;

/// Whether a request is outstanding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaitState {
    /// Nothing outstanding.
    Idle,
    /// Waiting for a message of the given type.
    Awaiting(MsgType),
}

/// What the caller must do after [`ResponseWait::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RetryAction {
    /// Nothing to do.
    None,
    /// Send [`ResponseWait::frame`] again.
    Retransmit,
    /// The retry budget is spent; the request was abandoned.
    GiveUp,
}

/// Response wait state machine with retry bookkeeping.
#[derive(Debug, Clone)]
pub struct ResponseWait {
    state: WaitState,
    message_id: Option<u16>,
    sent_at: u32,
    retries_remaining: u8,
    retry_interval_ms: u32,
    max_retries: u8,
    timed_out: bool,
    frame: Vec<u8, MAX_FRAME_SIZE>,
}

impl Default for ResponseWait {
    fn default() -> Self {
        Self::new(T_RETRY * 1000, N_RETRY)
    }
}

impl ResponseWait {
    /// Idle state machine with the given retry interval and budget.
    pub const fn new(retry_interval_ms: u32, max_retries: u8) -> Self {
        Self {
            state: WaitState::Idle,
            message_id: None,
            sent_at: 0,
            retries_remaining: 0,
            retry_interval_ms,
            max_retries,
            timed_out: false,
            frame: Vec::new(),
        }
    }

    /// Start waiting for `response` to the request encoded in `frame`.
    ///
    /// `message_id` is the correlation id the acknowledgement must echo, if
    /// the response type carries one. Clears a previous timeout.
    pub fn arm(
        &mut self,
        response: MsgType,
        message_id: Option<u16>,
        frame: &[u8],
        now: u32,
    ) -> Result<(), Error> {
        self.frame.clear();
        self.frame
            .extend_from_slice(frame)
            .map_err(|_| Error::BufferOverflow)?;
        self.state = WaitState::Awaiting(response);
        self.message_id = message_id;
        self.sent_at = now;
        self.retries_remaining = self.max_retries;
        self.timed_out = false;
        log::debug!("awaiting {:?} (msg id {:?})", response, message_id);
        Ok(())
    }

    /// Check the retry timer.
    ///
    /// Once `retry_interval_ms` has elapsed since the last transmission the
    /// request is either due for retransmission, which restarts the timer,
    /// or abandoned when no retries are left.
    pub fn poll(&mut self, now: u32) -> RetryAction {
        if self.state == WaitState::Idle {
            return RetryAction::None;
        }
        if now.wrapping_sub(self.sent_at) < self.retry_interval_ms {
            return RetryAction::None;
        }

        if self.retries_remaining == 0 {
            log::warn!("no response to {:?}, giving up", self.state);
            self.reset();
            self.timed_out = true;
            return RetryAction::GiveUp;
        }

        self.retries_remaining -= 1;
        self.sent_at = now;
        log::debug!("retrying, {} left", self.retries_remaining);
        RetryAction::Retransmit
    }

    /// Back to idle after the awaited response arrived.
    pub fn complete(&mut self) {
        self.reset();
    }

    /// Drop the outstanding request without touching the timeout flag.
    pub fn reset(&mut self) {
        self.state = WaitState::Idle;
        self.message_id = None;
        self.retries_remaining = 0;
        self.frame.clear();
    }

    /// Current state.
    pub fn state(&self) -> WaitState {
        self.state
    }

    /// `true` when nothing is outstanding.
    pub fn is_idle(&self) -> bool {
        self.state == WaitState::Idle
    }

    /// `true` when waiting for exactly `t`.
    pub fn is_awaiting(&self, t: MsgType) -> bool {
        self.state == WaitState::Awaiting(t)
    }

    /// Correlation id the awaited response must carry.
    pub fn message_id(&self) -> Option<u16> {
        self.message_id
    }

    /// Retransmissions left before giving up.
    pub fn retries_remaining(&self) -> u8 {
        self.retries_remaining
    }

    /// `true` when the last request was abandoned after its final retry.
    pub fn is_timed_out(&self) -> bool {
        self.timed_out
    }

    /// Frame to retransmit, empty when idle.
    pub fn frame(&self) -> &[u8] {
        &self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: &[u8] = &[2, 0x16];

    #[test]
    fn test_arm_and_complete() {
        let mut wait = ResponseWait::new(1000, 2);
        assert!(wait.is_idle());

        wait.arm(MsgType::PingResp, None, FRAME, 0).unwrap();
        assert!(wait.is_awaiting(MsgType::PingResp));
        assert!(!wait.is_awaiting(MsgType::ConnAck));
        assert_eq!(wait.frame(), FRAME);

        wait.complete();
        assert!(wait.is_idle());
        assert!(wait.frame().is_empty());
        assert!(!wait.is_timed_out());
    }

    #[test]
    fn test_retries_then_give_up() {
        let mut wait = ResponseWait::new(1000, 2);
        wait.arm(MsgType::ConnAck, None, FRAME, 0).unwrap();

        assert_eq!(wait.poll(999), RetryAction::None);
        assert_eq!(wait.poll(1000), RetryAction::Retransmit);
        assert_eq!(wait.poll(1500), RetryAction::None);
        assert_eq!(wait.poll(2000), RetryAction::Retransmit);
        assert_eq!(wait.retries_remaining(), 0);
        assert_eq!(wait.poll(3000), RetryAction::GiveUp);

        assert!(wait.is_idle());
        assert!(wait.is_timed_out());
        assert_eq!(wait.poll(10_000), RetryAction::None);
    }

    #[test]
    fn test_timer_survives_wraparound() {
        let mut wait = ResponseWait::new(1000, 1);
        wait.arm(MsgType::ConnAck, None, FRAME, u32::MAX - 100).unwrap();
        assert_eq!(wait.poll(500), RetryAction::None);
        assert_eq!(wait.poll(900), RetryAction::Retransmit);
    }

    #[test]
    fn test_rearm_clears_timeout() {
        let mut wait = ResponseWait::new(10, 0);
        wait.arm(MsgType::ConnAck, None, FRAME, 0).unwrap();
        assert_eq!(wait.poll(10), RetryAction::GiveUp);
        assert!(wait.is_timed_out());

        wait.arm(MsgType::RegAck, Some(3), FRAME, 20).unwrap();
        assert!(!wait.is_timed_out());
        assert_eq!(wait.message_id(), Some(3));
    }

    #[test]
    fn test_oversized_frame_is_rejected() {
        let mut wait = ResponseWait::default();
        let frame = [0u8; MAX_FRAME_SIZE + 1];
        assert_eq!(
            wait.arm(MsgType::ConnAck, None, &frame, 0),
            Err(Error::BufferOverflow)
        );
    }
}
