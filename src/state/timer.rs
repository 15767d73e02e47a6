//! Countdown timer state machine

use std::fmt;

use serde::{Deserialize, Serialize};

/// Default countdown duration in seconds (25 minutes).
pub const DEFAULT_DURATION_SECONDS: u64 = 1500;

/// Errors reported by timer commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    /// `set_duration` was called with a negative number of seconds.
    InvalidDuration(i64),
}

impl fmt::Display for TimerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerError::InvalidDuration(seconds) => {
                write!(f, "invalid timer duration: {} seconds", seconds)
            }
        }
    }
}

impl std::error::Error for TimerError {}

/// Lifecycle phase derived from the timer fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    Idle,
    Running,
    Expired,
}

/// What a single tick did to the timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Decremented by one second, still counting down.
    Ticked,
    /// Decremented to zero; the countdown is over.
    Expired,
    /// The timer was not running; nothing changed.
    Ignored,
}

/// Countdown timer state
///
/// The tick process never lives here; the state machine only records
/// whether one should be running. Mutations return whether the state
/// actually changed so callers can skip publishing no-op transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerState {
    remaining_seconds: u64,
    configured_duration_seconds: u64,
    running: bool,
}

impl TimerState {
    /// Create a stopped timer with the default 25-minute duration.
    pub fn new() -> Self {
        Self::with_duration(DEFAULT_DURATION_SECONDS)
    }

    /// Create a stopped timer with a specific configured duration.
    pub fn with_duration(seconds: u64) -> Self {
        Self {
            remaining_seconds: seconds,
            configured_duration_seconds: seconds,
            running: false,
        }
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn configured_duration_seconds(&self) -> u64 {
        self.configured_duration_seconds
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn phase(&self) -> TimerPhase {
        if self.running {
            TimerPhase::Running
        } else if self.remaining_seconds == 0 {
            TimerPhase::Expired
        } else {
            TimerPhase::Idle
        }
    }

    /// Zero-padded `MM:SS` rendering of the remaining time.
    pub fn display(&self) -> String {
        format_clock(self.remaining_seconds)
    }

    /// Begin counting down. No-op when already running or already expired.
    /// Returns whether the state changed.
    pub fn start(&mut self) -> bool {
        if self.running || self.remaining_seconds == 0 {
            return false;
        }
        self.running = true;
        true
    }

    /// Halt the countdown without touching the remaining time. Idempotent.
    /// Returns whether the state changed.
    pub fn stop(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        true
    }

    /// Halt the countdown and restore the configured duration. Idempotent.
    pub fn reset(&mut self) {
        self.running = false;
        self.remaining_seconds = self.configured_duration_seconds;
    }

    /// Replace the configured duration. The remaining time snaps to the new
    /// value and the countdown halts. Negative input is rejected and the
    /// state is left untouched.
    pub fn set_duration(&mut self, total_seconds: i64) -> Result<(), TimerError> {
        if total_seconds < 0 {
            return Err(TimerError::InvalidDuration(total_seconds));
        }
        let total = total_seconds as u64;
        self.configured_duration_seconds = total;
        self.remaining_seconds = total;
        self.running = false;
        Ok(())
    }

    /// Apply one one-second tick. A tick that arrives after the timer has
    /// left the running state applies nothing.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.running {
            return TickOutcome::Ignored;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.running = false;
            TickOutcome::Expired
        } else {
            TickOutcome::Ticked
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Format a second count as zero-padded `MM:SS`. Minutes are not capped at
/// 59, so durations over an hour render as e.g. `61:05`.
pub fn format_clock(total_seconds: u64) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}
