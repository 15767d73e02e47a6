//! Main application state management

use std::{
    fmt,
    sync::{Arc, Mutex},
    time::Instant,
};

use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, watch};
use tracing::{info, warn};

use crate::services::{PreferenceStore, DARK_THEME_KEY};

use super::{PickerState, TickOutcome, TimerError, TimerState};

/// Errors surfaced by state commands.
#[derive(Debug)]
pub enum StateError {
    /// A command was rejected by the timer state machine.
    Timer(TimerError),
    /// A picker command arrived while no picker session was open.
    PickerClosed,
    /// A poisoned lock or a failed preference write.
    Internal(String),
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::Timer(e) => write!(f, "{}", e),
            StateError::PickerClosed => write!(f, "no duration picker session is open"),
            StateError::Internal(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for StateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StateError::Timer(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TimerError> for StateError {
    fn from(e: TimerError) -> Self {
        StateError::Timer(e)
    }
}

/// Main application state that composes the timer, the picker session and
/// the theme preference
#[derive(Debug)]
pub struct AppState {
    /// Countdown timer, the single source of truth for remaining time
    pub timer: Arc<Mutex<TimerState>>,
    /// Open duration-picker session, if any
    pub picker: Arc<Mutex<Option<PickerState>>>,
    /// In-memory copy of the persisted dark-theme flag
    pub dark_theme: Arc<Mutex<bool>>,
    /// Write-through backing store for the theme flag
    pub prefs: Arc<PreferenceStore>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Command transitions, consumed by the countdown tick task
    pub control_change_tx: broadcast::Sender<TimerState>,
    /// Every timer mutation including ticks, for display refresh
    pub timer_update_tx: watch::Sender<TimerState>,
    /// Keep the receiver alive to prevent channel closure
    pub _timer_update_rx: watch::Receiver<TimerState>,
}

impl AppState {
    /// Create a new AppState. The initial theme is read from the preference
    /// store, falling back to the configured default until a preference has
    /// been persisted.
    pub fn new(
        port: u16,
        host: String,
        duration_seconds: u64,
        default_dark: bool,
        prefs: Arc<PreferenceStore>,
    ) -> Self {
        let timer = TimerState::with_duration(duration_seconds);
        let dark_theme = prefs.get_bool(DARK_THEME_KEY, default_dark);
        let (control_change_tx, _) = broadcast::channel(100);
        let (timer_update_tx, timer_update_rx) = watch::channel(timer.clone());

        Self {
            timer: Arc::new(Mutex::new(timer)),
            picker: Arc::new(Mutex::new(None)),
            dark_theme: Arc::new(Mutex::new(dark_theme)),
            prefs,
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            control_change_tx,
            timer_update_tx,
            _timer_update_rx: timer_update_rx,
        }
    }

    /// Apply a timer command and publish the resulting state.
    ///
    /// Transitions go to both channels; commands that did not change the
    /// state publish nothing, so the tick task never sees phantom events.
    fn command<F>(&self, action: &str, apply: F) -> Result<TimerState, StateError>
    where
        F: FnOnce(&mut TimerState) -> Result<bool, TimerError>,
    {
        let mut timer = self
            .timer
            .lock()
            .map_err(|e| StateError::Internal(format!("failed to lock timer state: {}", e)))?;

        let changed = apply(&mut timer)?;
        let snapshot = timer.clone();
        drop(timer); // Release the lock early

        self.note_action(action);

        if changed {
            if let Err(e) = self.timer_update_tx.send(snapshot.clone()) {
                warn!("Failed to send timer update: {}", e);
            }
            if let Err(e) = self.control_change_tx.send(snapshot.clone()) {
                warn!("Failed to send control change notification: {}", e);
            }
        }

        Ok(snapshot)
    }

    /// Start the countdown. No-op when already running or expired.
    pub fn start_timer(&self) -> Result<TimerState, StateError> {
        info!("Starting countdown");
        self.command("start", |timer| Ok(timer.start()))
    }

    /// Stop the countdown, keeping the remaining time.
    pub fn stop_timer(&self) -> Result<TimerState, StateError> {
        info!("Stopping countdown");
        self.command("stop", |timer| Ok(timer.stop()))
    }

    /// Stop the countdown and restore the configured duration.
    pub fn reset_timer(&self) -> Result<TimerState, StateError> {
        info!("Resetting countdown");
        self.command("reset", |timer| {
            timer.reset();
            Ok(true)
        })
    }

    /// Replace the configured duration; rejects negative input.
    pub fn set_timer_duration(&self, total_seconds: i64) -> Result<TimerState, StateError> {
        info!("Setting countdown duration to {}s", total_seconds);
        self.command("set-duration", |timer| {
            timer.set_duration(total_seconds).map(|_| true)
        })
    }

    /// Apply one tick from the countdown task. Ticks publish to the display
    /// watch channel only; they are not control transitions.
    pub fn apply_tick(&self) -> Result<(TickOutcome, TimerState), StateError> {
        let mut timer = self
            .timer
            .lock()
            .map_err(|e| StateError::Internal(format!("failed to lock timer state: {}", e)))?;

        let outcome = timer.tick();
        let snapshot = timer.clone();
        drop(timer);

        if outcome != TickOutcome::Ignored {
            if let Err(e) = self.timer_update_tx.send(snapshot.clone()) {
                warn!("Failed to send timer update: {}", e);
            }
        }

        Ok((outcome, snapshot))
    }

    /// Get current timer state
    pub fn get_timer_state(&self) -> Result<TimerState, StateError> {
        self.timer
            .lock()
            .map(|timer| timer.clone())
            .map_err(|e| StateError::Internal(format!("failed to lock timer state: {}", e)))
    }

    /// Open a picker session pre-filled from the timer's current time.
    /// Reopening replaces any session already open.
    pub fn open_picker(&self) -> Result<PickerState, StateError> {
        let current = self.get_timer_state()?.remaining_seconds();
        let session = PickerState::open(current);

        let mut picker = self.lock_picker()?;
        *picker = Some(session);
        drop(picker);

        info!("Picker opened at {}s", current);
        self.note_action("picker-open");
        Ok(session)
    }

    /// Select the minute column of the open picker session.
    pub fn pick_minutes(&self, minutes: u64) -> Result<PickerState, StateError> {
        let mut picker = self.lock_picker()?;
        let session = picker.as_mut().ok_or(StateError::PickerClosed)?;
        session.select_minutes(minutes);
        let snapshot = *session;
        drop(picker);

        self.note_action("picker-minutes");
        Ok(snapshot)
    }

    /// Select the second column of the open picker session.
    pub fn pick_seconds(&self, seconds: u64) -> Result<PickerState, StateError> {
        let mut picker = self.lock_picker()?;
        let session = picker.as_mut().ok_or(StateError::PickerClosed)?;
        session.select_seconds(seconds);
        let snapshot = *session;
        drop(picker);

        self.note_action("picker-seconds");
        Ok(snapshot)
    }

    /// Close the open picker session and apply its composed duration to the
    /// timer.
    pub fn commit_picker(&self) -> Result<TimerState, StateError> {
        let mut picker = self.lock_picker()?;
        let session = picker.take().ok_or(StateError::PickerClosed)?;
        drop(picker);

        let total = session.commit();
        info!("Picker committed {}s", total);
        self.set_timer_duration(total as i64)
    }

    /// Discard the open picker session without touching the timer.
    pub fn cancel_picker(&self) -> Result<(), StateError> {
        let mut picker = self.lock_picker()?;
        if picker.take().is_none() {
            return Err(StateError::PickerClosed);
        }
        drop(picker);

        info!("Picker cancelled");
        self.note_action("picker-cancel");
        Ok(())
    }

    /// Get the open picker session, if any.
    pub fn picker_state(&self) -> Result<Option<PickerState>, StateError> {
        self.lock_picker().map(|picker| *picker)
    }

    /// Current dark-theme flag.
    pub fn dark_theme(&self) -> Result<bool, StateError> {
        self.dark_theme
            .lock()
            .map(|dark| *dark)
            .map_err(|e| StateError::Internal(format!("failed to lock theme state: {}", e)))
    }

    /// Set the dark-theme flag, writing through to the preference store.
    pub fn set_dark_theme(&self, dark: bool) -> Result<bool, StateError> {
        info!("Setting dark theme to: {}", dark);
        let mut current = self
            .dark_theme
            .lock()
            .map_err(|e| StateError::Internal(format!("failed to lock theme state: {}", e)))?;
        *current = dark;
        drop(current);

        self.prefs
            .set_bool(DARK_THEME_KEY, dark)
            .map_err(|e| StateError::Internal(format!("failed to persist theme: {:#}", e)))?;

        self.note_action(if dark { "dark" } else { "light" });
        Ok(dark)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    fn note_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    fn lock_picker(&self) -> Result<std::sync::MutexGuard<'_, Option<PickerState>>, StateError> {
        self.picker
            .lock()
            .map_err(|e| StateError::Internal(format!("failed to lock picker state: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TimerPhase;
    use tempfile::{tempdir, TempDir};

    fn state() -> (TempDir, AppState) {
        state_with_duration(1500)
    }

    fn state_with_duration(seconds: u64) -> (TempDir, AppState) {
        let dir = tempdir().unwrap();
        let prefs = Arc::new(PreferenceStore::load(dir.path().join("settings.json")).unwrap());
        let app = AppState::new(0, "127.0.0.1".to_string(), seconds, false, prefs);
        (dir, app)
    }

    #[test]
    fn commands_drive_the_timer_through_its_phases() {
        let (_dir, app) = state();

        let started = app.start_timer().unwrap();
        assert!(started.is_running());

        let stopped = app.stop_timer().unwrap();
        assert!(!stopped.is_running());
        assert_eq!(stopped.remaining_seconds(), 1500);

        let reconfigured = app.set_timer_duration(75).unwrap();
        assert_eq!(reconfigured.remaining_seconds(), 75);
        assert_eq!(reconfigured.phase(), TimerPhase::Idle);
    }

    #[test]
    fn rejected_duration_leaves_state_and_channels_untouched() {
        let (_dir, app) = state();
        app.start_timer().unwrap();
        let before = app.get_timer_state().unwrap();
        let watched_before = app.timer_update_tx.subscribe().borrow().clone();

        let err = app.set_timer_duration(-5).unwrap_err();
        assert!(matches!(
            err,
            StateError::Timer(TimerError::InvalidDuration(-5))
        ));
        assert_eq!(app.get_timer_state().unwrap(), before);
        assert_eq!(*app.timer_update_tx.subscribe().borrow(), watched_before);
    }

    #[test]
    fn mutations_publish_to_the_watch_channel() {
        let (_dir, app) = state();
        let rx = app.timer_update_tx.subscribe();

        app.start_timer().unwrap();
        assert!(rx.borrow().is_running());

        app.apply_tick().unwrap();
        assert_eq!(rx.borrow().remaining_seconds(), 1499);
    }

    #[test]
    fn command_noops_do_not_publish_control_events() {
        let (_dir, app) = state();
        let mut control_rx = app.control_change_tx.subscribe();

        app.stop_timer().unwrap(); // already stopped
        assert!(control_rx.try_recv().is_err());

        app.start_timer().unwrap();
        assert!(control_rx.try_recv().unwrap().is_running());
        app.start_timer().unwrap(); // already running
        assert!(control_rx.try_recv().is_err());
    }

    #[test]
    fn apply_tick_expires_and_goes_quiet() {
        let (_dir, app) = state_with_duration(1);
        app.start_timer().unwrap();

        let (outcome, snapshot) = app.apply_tick().unwrap();
        assert_eq!(outcome, TickOutcome::Expired);
        assert_eq!(snapshot.remaining_seconds(), 0);
        assert!(!snapshot.is_running());

        let (outcome, _) = app.apply_tick().unwrap();
        assert_eq!(outcome, TickOutcome::Ignored);
    }

    #[test]
    fn picker_session_commits_into_the_timer() {
        let (_dir, app) = state_with_duration(90);

        let session = app.open_picker().unwrap();
        assert_eq!(session.selected_minutes(), 1);
        assert_eq!(session.selected_seconds(), 30);

        app.pick_minutes(1).unwrap();
        app.pick_seconds(15).unwrap();
        let timer = app.commit_picker().unwrap();

        assert_eq!(timer.remaining_seconds(), 75);
        assert_eq!(timer.configured_duration_seconds(), 75);
        assert!(!timer.is_running());
        assert!(app.picker_state().unwrap().is_none());
    }

    #[test]
    fn picker_opens_from_remaining_time_not_configured_duration() {
        let (_dir, app) = state_with_duration(120);
        app.start_timer().unwrap();
        app.apply_tick().unwrap();

        let session = app.open_picker().unwrap();
        assert_eq!(session.selected_minutes(), 1);
        assert_eq!(session.selected_seconds(), 59);
    }

    #[test]
    fn picker_cancel_discards_the_selection() {
        let (_dir, app) = state_with_duration(90);
        app.open_picker().unwrap();
        app.pick_minutes(5).unwrap();
        app.cancel_picker().unwrap();

        assert!(app.picker_state().unwrap().is_none());
        assert_eq!(app.get_timer_state().unwrap().remaining_seconds(), 90);
    }

    #[test]
    fn picker_commands_without_a_session_are_rejected() {
        let (_dir, app) = state();
        assert!(matches!(app.pick_minutes(5), Err(StateError::PickerClosed)));
        assert!(matches!(app.commit_picker(), Err(StateError::PickerClosed)));
        assert!(matches!(app.cancel_picker(), Err(StateError::PickerClosed)));
    }

    #[test]
    fn theme_setter_writes_through_to_the_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let prefs = Arc::new(PreferenceStore::load(&path).unwrap());
        let app = AppState::new(0, "127.0.0.1".to_string(), 1500, false, prefs);

        assert!(!app.dark_theme().unwrap());
        app.set_dark_theme(true).unwrap();
        assert!(app.dark_theme().unwrap());

        let reopened = PreferenceStore::load(&path).unwrap();
        assert!(reopened.get_bool(DARK_THEME_KEY, false));
    }

    #[test]
    fn persisted_theme_wins_over_the_configured_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let prefs = Arc::new(PreferenceStore::load(&path).unwrap());
        prefs.set_bool(DARK_THEME_KEY, true).unwrap();

        let app = AppState::new(0, "127.0.0.1".to_string(), 1500, false, prefs);
        assert!(app.dark_theme().unwrap());
    }

    #[test]
    fn commands_track_the_last_action() {
        let (_dir, app) = state();
        assert_eq!(app.get_last_action().0, None);

        app.start_timer().unwrap();
        let (action, time) = app.get_last_action();
        assert_eq!(action.as_deref(), Some("start"));
        assert!(time.is_some());

        app.reset_timer().unwrap();
        assert_eq!(app.get_last_action().0.as_deref(), Some("reset"));
    }
}
