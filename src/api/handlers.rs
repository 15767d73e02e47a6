//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::Json};
use tracing::{error, info, warn};

use crate::state::{AppState, StateError};

use super::responses::{
    CommandResponse, HealthResponse, PickRequest, PickerReport, PickerResponse,
    SetDurationRequest, StatusResponse, ThemeResponse,
};

fn internal_error(context: &str, e: &StateError) -> StatusCode {
    error!("{}: {}", context, e);
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Map picker command failures: a closed session is the caller's mistake,
/// anything else is ours.
fn picker_error(context: &str, e: &StateError) -> StatusCode {
    match e {
        StateError::PickerClosed => {
            warn!("{}: {}", context, e);
            StatusCode::CONFLICT
        }
        _ => internal_error(context, e),
    }
}

/// Handle POST /start - Start the countdown
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CommandResponse>, StatusCode> {
    match state.start_timer() {
        Ok(timer) => {
            info!("Start endpoint called - countdown running");
            Ok(Json(CommandResponse::ok(
                "Countdown started".to_string(),
                &timer,
            )))
        }
        Err(e) => Err(internal_error("Failed to start countdown", &e)),
    }
}

/// Handle POST /stop - Stop the countdown
pub async fn stop_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CommandResponse>, StatusCode> {
    match state.stop_timer() {
        Ok(timer) => {
            info!("Stop endpoint called - countdown halted");
            Ok(Json(CommandResponse::ok(
                "Countdown stopped".to_string(),
                &timer,
            )))
        }
        Err(e) => Err(internal_error("Failed to stop countdown", &e)),
    }
}

/// Handle POST /reset - Restore the configured duration
pub async fn reset_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CommandResponse>, StatusCode> {
    match state.reset_timer() {
        Ok(timer) => {
            info!("Reset endpoint called - countdown restored");
            Ok(Json(CommandResponse::ok(
                "Countdown reset".to_string(),
                &timer,
            )))
        }
        Err(e) => Err(internal_error("Failed to reset countdown", &e)),
    }
}

/// Handle POST /duration - Replace the configured duration directly
pub async fn duration_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SetDurationRequest>,
) -> Result<Json<CommandResponse>, StatusCode> {
    match state.set_timer_duration(request.seconds) {
        Ok(timer) => {
            info!("Duration endpoint called - duration set to {}s", request.seconds);
            Ok(Json(CommandResponse::ok(
                format!("Duration set to {} seconds", request.seconds),
                &timer,
            )))
        }
        Err(StateError::Timer(e)) => {
            // A rejected command, not a transport failure; report the
            // unchanged timer alongside the reason.
            warn!("Duration rejected: {}", e);
            match state.get_timer_state() {
                Ok(timer) => Ok(Json(CommandResponse::rejected(e.to_string(), &timer))),
                Err(e) => Err(internal_error("Failed to get timer state", &e)),
            }
        }
        Err(e) => Err(internal_error("Failed to set duration", &e)),
    }
}

/// Handle POST /picker/open - Open a duration picker session
pub async fn picker_open_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PickerResponse>, StatusCode> {
    match state.open_picker() {
        Ok(picker) => {
            info!("Picker opened");
            Ok(Json(PickerResponse::ok(
                "Picker opened".to_string(),
                &picker,
            )))
        }
        Err(e) => Err(internal_error("Failed to open picker", &e)),
    }
}

/// Handle POST /picker/minutes - Select the minute column
pub async fn picker_minutes_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PickRequest>,
) -> Result<Json<PickerResponse>, StatusCode> {
    match state.pick_minutes(request.value) {
        Ok(picker) => Ok(Json(PickerResponse::ok(
            format!("Selected {} minutes", picker.selected_minutes()),
            &picker,
        ))),
        Err(e) => Err(picker_error("Failed to select minutes", &e)),
    }
}

/// Handle POST /picker/seconds - Select the second column
pub async fn picker_seconds_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<PickRequest>,
) -> Result<Json<PickerResponse>, StatusCode> {
    match state.pick_seconds(request.value) {
        Ok(picker) => Ok(Json(PickerResponse::ok(
            format!("Selected {} seconds", picker.selected_seconds()),
            &picker,
        ))),
        Err(e) => Err(picker_error("Failed to select seconds", &e)),
    }
}

/// Handle POST /picker/commit - Apply the picked duration to the timer
pub async fn picker_commit_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CommandResponse>, StatusCode> {
    match state.commit_picker() {
        Ok(timer) => {
            info!("Picker committed");
            Ok(Json(CommandResponse::ok(
                format!("Duration set to {} seconds", timer.configured_duration_seconds()),
                &timer,
            )))
        }
        Err(e) => Err(picker_error("Failed to commit picker", &e)),
    }
}

/// Handle POST /picker/cancel - Discard the open picker session
pub async fn picker_cancel_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CommandResponse>, StatusCode> {
    match state.cancel_picker() {
        Ok(()) => {
            info!("Picker cancelled");
            match state.get_timer_state() {
                Ok(timer) => Ok(Json(CommandResponse::ok(
                    "Picker cancelled".to_string(),
                    &timer,
                ))),
                Err(e) => Err(internal_error("Failed to get timer state", &e)),
            }
        }
        Err(e) => Err(picker_error("Failed to cancel picker", &e)),
    }
}

/// Handle POST /dark - Switch to the dark theme
pub async fn dark_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ThemeResponse>, StatusCode> {
    match state.set_dark_theme(true) {
        Ok(dark) => {
            info!("Dark endpoint called - dark theme enabled");
            Ok(Json(ThemeResponse::ok("Dark theme enabled".to_string(), dark)))
        }
        Err(e) => Err(internal_error("Failed to enable dark theme", &e)),
    }
}

/// Handle POST /light - Switch to the light theme
pub async fn light_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ThemeResponse>, StatusCode> {
    match state.set_dark_theme(false) {
        Ok(dark) => {
            info!("Light endpoint called - light theme enabled");
            Ok(Json(ThemeResponse::ok("Light theme enabled".to_string(), dark)))
        }
        Err(e) => Err(internal_error("Failed to enable light theme", &e)),
    }
}

/// Handle GET /status - Return current timer, picker and theme status
pub async fn status_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = match state.get_timer_state() {
        Ok(t) => t,
        Err(e) => return Err(internal_error("Failed to get timer state", &e)),
    };

    let picker = match state.picker_state() {
        Ok(p) => p,
        Err(e) => return Err(internal_error("Failed to get picker state", &e)),
    };

    let dark_theme = match state.dark_theme() {
        Ok(d) => d,
        Err(e) => return Err(internal_error("Failed to get theme state", &e)),
    };

    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer: (&timer).into(),
        picker: picker.as_ref().map(PickerReport::from),
        dark_theme,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
