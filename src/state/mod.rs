//! State management module
//!
//! This module contains the timer state machine, the settings it runs against,
//! the view derived from both, and the shared application state that serializes
//! every trigger.

pub mod settings;
pub mod timer_state;
pub mod machine;
pub mod view;
pub mod app_state;

// Re-export main types
pub use settings::Settings;
pub use timer_state::{Phase, TimerState};
pub use machine::{HostEvent, TimerMachine, Transition, Trigger};
pub use view::View;
pub use app_state::{AppState, Outcome, SettingsError, Snapshot};
