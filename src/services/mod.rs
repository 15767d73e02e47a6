//! External collaborator module
//!
//! This module contains the collaborators the core delegates to, currently
//! just the key-value preference store backing the theme flag.

pub mod prefs;

// Re-export main types
pub use prefs::{PreferenceStore, DARK_THEME_KEY};
