//! Zen Rest - A focus/rest interval timer daemon
//!
//! This library provides the work/rest timer state machine, settings persistence,
//! the host command sinks, and the HTTP surface a host shell drives it through.

pub mod config;
pub mod state;
pub mod api;
pub mod services;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, TimerMachine, Trigger};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
