//! Configuration and CLI argument handling

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Theme used until a preference has been persisted.
///
/// System-theme detection belongs to the platform shell, so the fallback
/// is an explicit choice here rather than something detected at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DefaultTheme {
    Light,
    Dark,
}

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "take-five")]
#[command(about = "A state-managed HTTP server for Pomodoro countdown timing")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20654")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Countdown duration in minutes used until one is picked
    #[arg(short, long, default_value = "25")]
    pub duration: u64,

    /// Theme to fall back to before any preference is saved
    #[arg(long, value_enum, default_value = "light")]
    pub default_theme: DefaultTheme,

    /// Preference file location; defaults to the platform config directory
    #[arg(long)]
    pub prefs: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    /// Configured countdown duration in seconds
    pub fn duration_seconds(&self) -> u64 {
        self.duration * 60
    }

    /// Whether the pre-preference fallback theme is dark
    pub fn default_dark(&self) -> bool {
        self.default_theme == DefaultTheme::Dark
    }

    /// Resolved preference file path
    pub fn prefs_path(&self) -> PathBuf {
        self.prefs.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("take-five")
                .join("settings.json")
        })
    }
}
