//! One-second tick source for an active timer

use std::{sync::Weak, time::Duration};
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant},
};
use tracing::debug;

use crate::state::AppState;

/// Handle to a live tick task. The task is aborted when the handle is stopped
/// or dropped, so replacing or clearing the handle disposes the tick source.
#[derive(Debug)]
pub struct Ticker {
    generation: u64,
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Spawn a tick task whose ticks are stamped with `generation`
    pub fn spawn(state: Weak<AppState>, generation: u64, period: Duration) -> Self {
        debug!("Starting tick source for generation {}", generation);
        let handle = tokio::spawn(tick_task(state, generation, period));
        Self { generation, handle }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn stop(self) {
        debug!("Stopping tick source for generation {}", self.generation);
        // Drop aborts the task
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Deliver one tick per period until the state is gone or stops accepting
/// ticks for this generation
async fn tick_task(state: Weak<AppState>, generation: u64, period: Duration) {
    // The first tick fires one full period after the run (or phase) began
    let mut interval = interval_at(Instant::now() + period, period);

    loop {
        interval.tick().await;

        let Some(state) = state.upgrade() else {
            break;
        };
        if !state.tick(generation) {
            debug!("Tick source for generation {} is stale, exiting", generation);
            break;
        }
    }
}
