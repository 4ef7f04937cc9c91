//! Background tasks module
//!
//! This module contains the tick source and the host command worker that run
//! alongside the HTTP server.

pub mod ticker;
pub mod command_worker;

// Re-export main items
pub use ticker::Ticker;
pub use command_worker::command_worker_task;
