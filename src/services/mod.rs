//! Collaborators outside the timer core
//!
//! This module contains the host command sinks and the settings store.

pub mod host;
pub mod settings_store;

// Re-export main types
pub use host::{CommandSink, HookSink, HostCommand, LogSink};
pub use settings_store::{SettingsStore, SETTINGS_KEY};
