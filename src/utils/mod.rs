//! Utility functions module
//!
//! This module contains signal wiring and shortcut handling used throughout the
//! application.

pub mod signals;
pub mod shortcuts;

// Re-export main functions
pub use signals::{host_event_signals, shutdown_signal};
pub use shortcuts::{fallback_trigger, normalize_shortcut, KeyPress};
