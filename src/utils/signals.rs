//! Signal handling for graceful shutdown and host shortcut events

use std::sync::Arc;
use signal_hook::consts::{SIGINT, SIGTERM, SIGUSR1, SIGUSR2};
use signal_hook_tokio::Signals;
use futures::stream::StreamExt;
use tracing::{error, info, warn};

use crate::state::{AppState, HostEvent};

/// Wait for shutdown signals (SIGTERM, SIGINT)
pub async fn shutdown_signal() {
    let mut signals = match Signals::new([SIGTERM, SIGINT]) {
        Ok(signals) => signals,
        Err(e) => {
            error!("Failed to create shutdown signal handler: {}", e);
            return std::future::pending().await;
        }
    };

    if let Some(signal) = signals.next().await {
        info!("Received signal: {}", signal);
    }
}

/// Map a POSIX signal onto the host event it stands for
pub fn event_for_signal(signal: i32) -> Option<HostEvent> {
    match signal {
        SIGUSR1 => Some(HostEvent::ForceSkip),
        SIGUSR2 => Some(HostEvent::TogglePause),
        _ => None,
    }
}

/// Background task turning SIGUSR1/SIGUSR2 into force-skip/toggle-pause events,
/// so window-manager key bindings can drive the timer with `pkill -USR1`
pub async fn host_event_signals(state: Arc<AppState>) {
    let mut signals = match Signals::new([SIGUSR1, SIGUSR2]) {
        Ok(signals) => signals,
        Err(e) => {
            error!("Failed to create host event signal handler: {}", e);
            return;
        }
    };

    info!("Listening for host events on SIGUSR1 (skip) and SIGUSR2 (pause)");

    while let Some(signal) = signals.next().await {
        let Some(event) = event_for_signal(signal) else {
            continue;
        };
        if let Err(e) = state.handle_event(event) {
            warn!("Failed to apply {} from signal {}: {}", event.name(), signal, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_signals_map_to_host_events() {
        assert_eq!(event_for_signal(SIGUSR1), Some(HostEvent::ForceSkip));
        assert_eq!(event_for_signal(SIGUSR2), Some(HostEvent::TogglePause));
        assert_eq!(event_for_signal(SIGTERM), None);
    }
}
