//! Countdown tick background task

use std::{sync::Arc, time::Duration};

use tokio::time::{interval_at, sleep, Instant};
use tracing::{debug, error, info};

use crate::state::{AppState, TickOutcome};

/// Background task that drives the one-second countdown tick.
///
/// The task blocks on the control channel until a command transition
/// reports the timer running, then decrements once per second until the
/// countdown expires or another command moves the timer out of the running
/// state. Only one countdown loop ever exists because the task is either
/// waiting or ticking, never both.
pub async fn countdown_tick_task(state: Arc<AppState>) {
    info!("Starting countdown tick task");

    let mut control_rx = state.control_change_tx.subscribe();

    loop {
        match control_rx.recv().await {
            Ok(snapshot) => {
                if !snapshot.is_running() {
                    debug!("Timer not running, waiting for start");
                    continue;
                }

                info!(
                    "Countdown running with {}s remaining",
                    snapshot.remaining_seconds()
                );

                // A start after a stop waits a full second before the first
                // decrement; a partially elapsed interval is never resumed.
                let period = Duration::from_secs(1);
                let mut ticks = interval_at(Instant::now() + period, period);
                let mut cancelled = false;

                loop {
                    tokio::select! {
                        // Timer tick - decrement the countdown
                        _ = ticks.tick() => {
                            match state.apply_tick() {
                                Ok((TickOutcome::Ticked, snapshot)) => {
                                    debug!("Tick: {} remaining", snapshot.display());
                                }
                                Ok((TickOutcome::Expired, _)) => {
                                    info!("Countdown expired");
                                    break;
                                }
                                Ok((TickOutcome::Ignored, _)) => {
                                    // The timer left the running state between
                                    // the tick firing and the lock being taken.
                                    cancelled = true;
                                    break;
                                }
                                Err(e) => {
                                    error!("Failed to apply tick: {}", e);
                                    break;
                                }
                            }
                        }

                        // Command transition - cancel when no longer running
                        Ok(snapshot) = control_rx.recv() => {
                            if !snapshot.is_running() {
                                info!("Countdown cancelled");
                                cancelled = true;
                                break;
                            }
                        }
                    }
                }

                if cancelled {
                    debug!("Countdown stopped before expiry, waiting for next start");
                }
            }
            Err(e) => {
                error!("Error receiving control change: {}", e);
                // Wait a bit before retrying
                sleep(Duration::from_secs(1)).await;
            }
        }
    }
}
