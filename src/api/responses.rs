//! API response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{PickerState, TimerPhase, TimerState};

/// Timer fields reported by every timer-facing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerReport {
    pub phase: TimerPhase,
    pub running: bool,
    pub remaining_seconds: u64,
    pub configured_duration_seconds: u64,
    /// Zero-padded `MM:SS` rendering of the remaining time
    pub display: String,
}

impl From<&TimerState> for TimerReport {
    fn from(timer: &TimerState) -> Self {
        Self {
            phase: timer.phase(),
            running: timer.is_running(),
            remaining_seconds: timer.remaining_seconds(),
            configured_duration_seconds: timer.configured_duration_seconds(),
            display: timer.display(),
        }
    }
}

/// Open picker session fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickerReport {
    pub selected_minutes: u64,
    pub selected_seconds: u64,
}

impl From<&PickerState> for PickerReport {
    fn from(picker: &PickerState) -> Self {
        Self {
            selected_minutes: picker.selected_minutes(),
            selected_seconds: picker.selected_seconds(),
        }
    }
}

/// API response structure for timer command endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerReport,
}

impl CommandResponse {
    /// Create a new command response
    pub fn new(status: String, message: String, timer: &TimerState) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer: timer.into(),
        }
    }

    /// Create a response for an accepted command
    pub fn ok(message: String, timer: &TimerState) -> Self {
        Self::new("ok".to_string(), message, timer)
    }

    /// Create a response for a rejected command, reporting the unchanged
    /// timer state
    pub fn rejected(message: String, timer: &TimerState) -> Self {
        Self::new("rejected".to_string(), message, timer)
    }
}

/// API response structure for picker session endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickerResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub picker: PickerReport,
}

impl PickerResponse {
    pub fn ok(message: String, picker: &PickerState) -> Self {
        Self {
            status: "ok".to_string(),
            message,
            timestamp: Utc::now(),
            picker: picker.into(),
        }
    }
}

/// API response structure for the theme endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub dark_theme: bool,
}

impl ThemeResponse {
    pub fn ok(message: String, dark_theme: bool) -> Self {
        Self {
            status: "ok".to_string(),
            message,
            timestamp: Utc::now(),
            dark_theme,
        }
    }
}

/// Enhanced status response with picker, theme and uptime information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerReport,
    pub picker: Option<PickerReport>,
    pub dark_theme: bool,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: "0.1.0".to_string(),
        }
    }
}

/// Request body for POST /duration.
///
/// Signed so a negative duration reaches the timer's own validation and
/// comes back as a rejected command rather than a deserialization error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetDurationRequest {
    pub seconds: i64,
}

/// Request body for the picker column endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickRequest {
    pub value: u64,
}
