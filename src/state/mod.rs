//! State management module
//!
//! This module contains all state-related structures and their management logic.

pub mod app_state;
pub mod picker;
pub mod timer;

// Re-export main types
pub use app_state::{AppState, StateError};
pub use picker::PickerState;
pub use timer::{
    format_clock, TickOutcome, TimerError, TimerPhase, TimerState, DEFAULT_DURATION_SECONDS,
};
