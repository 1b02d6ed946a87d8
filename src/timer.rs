//! Tick-based countdown used by every top-level state and by the phase scheduler.

use crate::constants::sec_to_ticks;

/// Duration of a timer that never expires on its own.
pub const INDEFINITE: u64 = u64::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    /// Reset, waiting for [`TickTimer::start`].
    Ready,
    Running,
    Expired,
}

/// Counts simulation ticks against a fixed (or indefinite) duration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickTimer {
    duration: u64,
    elapsed: u64,
    state: TimerState,
}

impl Default for TickTimer {
    fn default() -> Self {
        Self::new(INDEFINITE)
    }
}

impl TickTimer {
    pub fn new(duration: u64) -> Self {
        Self {
            duration,
            elapsed: 0,
            state: TimerState::Ready,
        }
    }

    /// Rewinds the timer to zero with a new duration. The timer must be started again.
    pub fn reset(&mut self, duration: u64) {
        self.duration = duration;
        self.elapsed = 0;
        self.state = TimerState::Ready;
    }

    /// Starts a ready timer. Running or expired timers are left alone.
    pub fn start(&mut self) {
        if self.state == TimerState::Ready {
            self.state = TimerState::Running;
        }
    }

    /// Counts one tick if the timer is running.
    pub fn advance(&mut self) {
        if self.state != TimerState::Running {
            return;
        }
        self.elapsed += 1;
        if self.duration != INDEFINITE && self.elapsed >= self.duration {
            self.state = TimerState::Expired;
        }
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn has_expired(&self) -> bool {
        self.state == TimerState::Expired
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn is_indefinite(&self) -> bool {
        self.duration == INDEFINITE
    }

    /// True on exactly the tick at which a running timer has counted `seconds`.
    pub fn is_running_seconds(&self, seconds: u32) -> bool {
        self.is_running() && self.elapsed == sec_to_ticks(seconds)
    }

    pub fn duration(&self) -> u64 {
        self.duration
    }

    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    /// Ticks left until expiry, `None` for indefinite timers.
    pub fn remaining(&self) -> Option<u64> {
        (!self.is_indefinite()).then(|| self.duration.saturating_sub(self.elapsed))
    }
}
