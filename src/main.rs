//! Take Five - A state-managed HTTP server for Pomodoro countdown timing
//!
//! This is the main entry point for the take-five application.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use take_five::{
    api::create_router, config::Config, services::PreferenceStore, state::AppState,
    tasks::countdown_tick_task, utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "take_five={},tower_http=info",
            config.log_level()
        ))
        .init();

    info!("Starting take-five server v0.1.0");
    info!(
        "Configuration: host={}, port={}, duration={}min, default_theme={:?}",
        config.host, config.port, config.duration, config.default_theme
    );

    // The preference store must be readable before anything else starts
    let prefs = match PreferenceStore::load(config.prefs_path()) {
        Ok(prefs) => Arc::new(prefs),
        Err(e) => {
            tracing::error!("{:#}", e);
            std::process::exit(1);
        }
    };
    info!("Preferences at {}", prefs.path().display());

    // Create application state
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        config.duration_seconds(),
        config.default_dark(),
        Arc::clone(&prefs),
    ));

    // Start the countdown tick background task
    let tick_state = Arc::clone(&state);
    tokio::spawn(async move {
        countdown_tick_task(tick_state).await;
    });

    // Create HTTP router with all endpoints
    let app = create_router(state);

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /start          - Start the countdown");
    info!("  POST /stop           - Stop the countdown");
    info!("  POST /reset          - Restore the configured duration");
    info!("  POST /duration       - Set the duration in seconds");
    info!("  POST /picker/...     - Duration picker session");
    info!("  POST /dark, /light   - Switch theme");
    info!("  GET  /status         - Check timer and theme status");
    info!("  GET  /health         - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}
