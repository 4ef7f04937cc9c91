//! Main application state management

use std::{
    fmt,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{mpsc::UnboundedSender, watch, Notify};
use tracing::{debug, info, warn};

use crate::{
    services::{HostCommand, SettingsStore},
    tasks::Ticker,
};
use super::{HostEvent, Settings, TimerMachine, TimerState, Transition, Trigger, View};

/// Everything the presentation layer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub state: String,
    pub timer: TimerState,
    pub settings: Settings,
    pub settings_open: bool,
    pub view: View,
}

impl Snapshot {
    fn new(machine: &TimerMachine, settings_open: bool) -> Self {
        Self {
            state: machine.timer().label(),
            timer: machine.timer().clone(),
            settings: machine.settings().clone(),
            settings_open,
            view: View::derive(machine.timer(), machine.settings(), settings_open),
        }
    }
}

/// A trigger's transition together with the snapshot it produced
#[derive(Debug, Clone)]
pub struct Outcome {
    pub transition: Transition,
    pub snapshot: Snapshot,
}

/// Why a settings save was refused
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// The submitted record is out of range or malformed
    Invalid(String),
    /// The record was valid but could not be stored or applied
    Failed(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Invalid(e) => write!(f, "invalid settings: {}", e),
            SettingsError::Failed(e) => write!(f, "{}", e),
        }
    }
}

/// Shared application state. Every trigger goes through [`AppState::dispatch`],
/// which applies it to the machine under one lock and then reconciles the tick
/// source and the command queue before the lock is released.
#[derive(Debug)]
pub struct AppState {
    /// The timer core; the lock is the serialization point for all triggers
    machine: Mutex<TimerMachine>,
    /// Live tick source, present only while the timer is running
    ticker: Mutex<Option<Ticker>>,
    tick_interval: Duration,
    /// Whether the settings view is open (does not affect the timer)
    settings_open: AtomicBool,
    store: SettingsStore,
    /// Queue to the host command worker; taken on shutdown
    commands: Mutex<Option<UnboundedSender<HostCommand>>>,
    /// Channel for snapshot updates
    snapshot_tx: watch::Sender<Snapshot>,
    /// Keep the receiver alive to prevent channel closure
    _snapshot_rx: watch::Receiver<Snapshot>,
    shutdown: Notify,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    last_action: Mutex<Option<String>>,
    last_action_time: Mutex<Option<DateTime<Utc>>>,
}

impl AppState {
    /// Create the state with settings loaded from the store
    pub fn new(
        port: u16,
        host: String,
        store: SettingsStore,
        commands: UnboundedSender<HostCommand>,
        tick_interval: Duration,
    ) -> Self {
        let machine = TimerMachine::new(store.load());
        let (snapshot_tx, snapshot_rx) = watch::channel(Snapshot::new(&machine, false));

        Self {
            machine: Mutex::new(machine),
            ticker: Mutex::new(None),
            tick_interval,
            settings_open: AtomicBool::new(false),
            store,
            commands: Mutex::new(Some(commands)),
            snapshot_tx,
            _snapshot_rx: snapshot_rx,
            shutdown: Notify::new(),
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
        }
    }

    /// Tell the host about the configured shortcuts
    pub fn announce_shortcuts(&self) -> Result<(), String> {
        let machine = self.lock_machine()?;
        self.queue_commands(&machine.initial_commands());
        Ok(())
    }

    /// Apply one trigger as a single atomic transition
    pub fn dispatch(self: &Arc<Self>, trigger: Trigger) -> Result<Outcome, String> {
        let name = trigger.name();
        let is_tick = matches!(trigger, Trigger::Tick { .. });

        let outcome = {
            let mut machine = self.lock_machine()?;
            self.apply_locked(&mut machine, trigger)?
        };

        if outcome.transition.applied && !is_tick {
            info!("Trigger '{}' applied, timer is now {}", name, outcome.snapshot.state);
            self.record_action(name);
        }

        Ok(outcome)
    }

    /// Apply an inbound host event
    pub fn handle_event(self: &Arc<Self>, event: HostEvent) -> Result<Outcome, String> {
        debug!("Received host event '{}'", event.name());
        self.dispatch(event.trigger())
    }

    /// Deliver one tick from the tick source. Returns false once the tick source
    /// should stop.
    pub fn tick(self: &Arc<Self>, generation: u64) -> bool {
        match self.dispatch(Trigger::Tick { generation }) {
            Ok(outcome) => outcome.transition.applied,
            Err(e) => {
                warn!("Failed to apply tick: {}", e);
                false
            }
        }
    }

    /// Validate, persist and apply new settings. The file and the live settings
    /// are updated under the machine lock, so concurrent saves cannot interleave.
    pub fn save_settings(self: &Arc<Self>, settings: Settings) -> Result<Outcome, SettingsError> {
        let settings = settings.validated().map_err(SettingsError::Invalid)?;

        let outcome = {
            let mut machine = self.lock_machine().map_err(SettingsError::Failed)?;
            self.store.save(&settings).map_err(SettingsError::Failed)?;
            self.apply_locked(&mut machine, Trigger::UpdateSettings(settings))
                .map_err(SettingsError::Failed)?
        };

        info!("Settings saved, timer is now {}", outcome.snapshot.state);
        self.record_action("update-settings");
        Ok(outcome)
    }

    /// Show or hide the settings view
    pub fn set_settings_open(&self, open: bool) -> Result<Snapshot, String> {
        let snapshot = {
            let machine = self.lock_machine()?;
            self.settings_open.store(open, Ordering::SeqCst);
            self.publish(&machine)
        };

        self.record_action(if open { "open-settings" } else { "close-settings" });
        Ok(snapshot)
    }

    /// Forward a window action to the host; quitting also stops the daemon
    pub fn window_action(&self, command: HostCommand) -> Result<(), String> {
        let quit = command == HostCommand::QuitApp;
        self.record_action(command.name());

        {
            let _machine = self.lock_machine()?;
            self.queue_commands(&[command]);
        }

        if quit {
            info!("Quit requested");
            self.shutdown.notify_one();
        }
        Ok(())
    }

    /// Current snapshot of timer, settings and view
    pub fn snapshot(&self) -> Result<Snapshot, String> {
        let machine = self.lock_machine()?;
        Ok(Snapshot::new(&machine, self.settings_open.load(Ordering::SeqCst)))
    }

    /// Subscribe to snapshot updates
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Resolves once a quit has been requested
    pub async fn shutdown_requested(&self) {
        self.shutdown.notified().await
    }

    /// Stop the tick source and close the command queue so the worker can drain
    pub fn shutdown(&self) {
        if let Ok(mut ticker) = self.ticker.lock() {
            if let Some(ticker) = ticker.take() {
                ticker.stop();
            }
        }
        if let Ok(mut commands) = self.commands.lock() {
            commands.take();
        }
        info!("Timer stopped for shutdown");
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    fn lock_machine(&self) -> Result<std::sync::MutexGuard<'_, TimerMachine>, String> {
        self.machine
            .lock()
            .map_err(|e| format!("Failed to lock timer machine: {}", e))
    }

    /// Make the tick source match the machine: one source stamped with the
    /// current generation while running, none otherwise
    fn sync_ticker(self: &Arc<Self>, machine: &TimerMachine) -> Result<(), String> {
        let mut ticker = self
            .ticker
            .lock()
            .map_err(|e| format!("Failed to lock tick source: {}", e))?;

        let current = ticker.as_ref().map(Ticker::generation);
        if machine.wants_ticks() && current == Some(machine.generation()) {
            return Ok(());
        }

        if let Some(old) = ticker.take() {
            old.stop();
        }
        if machine.wants_ticks() {
            *ticker = Some(Ticker::spawn(
                Arc::downgrade(self),
                machine.generation(),
                self.tick_interval,
            ));
        }
        Ok(())
    }

    /// Queue commands for the worker without waiting on the host
    fn queue_commands(&self, commands: &[HostCommand]) {
        if commands.is_empty() {
            return;
        }

        let sender = match self.commands.lock() {
            Ok(sender) => sender,
            Err(e) => {
                warn!("Failed to lock host command queue: {}", e);
                return;
            }
        };

        for command in commands {
            match sender.as_ref() {
                Some(tx) => {
                    if tx.send(command.clone()).is_err() {
                        warn!("Host command worker is gone, dropping {}", command);
                    }
                }
                None => debug!("Shutting down, dropping {}", command),
            }
        }
    }

    /// Apply a trigger while the caller holds the machine lock. Ticking must
    /// be reconciled before anything else observes the new state.
    fn apply_locked(
        self: &Arc<Self>,
        machine: &mut TimerMachine,
        trigger: Trigger,
    ) -> Result<Outcome, String> {
        let transition = machine.apply(trigger);

        let snapshot = if transition.applied {
            self.sync_ticker(machine)?;
            self.queue_commands(&transition.commands);
            self.publish(machine)
        } else {
            Snapshot::new(machine, self.settings_open.load(Ordering::SeqCst))
        };

        Ok(Outcome { transition, snapshot })
    }

    fn publish(&self, machine: &TimerMachine) -> Snapshot {
        let snapshot = Snapshot::new(machine, self.settings_open.load(Ordering::SeqCst));
        self.snapshot_tx.send_replace(snapshot.clone());
        snapshot
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }
}
