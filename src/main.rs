//! Zen Rest - A focus/rest interval timer daemon
//!
//! This is the main entry point for the zen-rest application.

use std::{sync::Arc, time::Duration};
use tokio::{net::TcpListener, sync::mpsc};
use tracing::info;

use zen_rest::{
    api::create_router,
    config::Config,
    services::{CommandSink, LogSink, SettingsStore},
    state::AppState,
    tasks::command_worker_task,
    utils::{host_event_signals, shutdown_signal},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("zen_rest={},tower_http=info", config.log_level()))
        .init();

    info!("Starting zen-rest v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: host={}, port={}, settings={}",
          config.host, config.port, config.settings_file.display());

    // Pick the host command sink
    let hooks = config.hooks();
    let sink: Arc<dyn CommandSink> = if hooks.is_empty() {
        info!("No host hooks configured, host commands will only be logged");
        Arc::new(LogSink)
    } else {
        Arc::new(hooks)
    };

    // Start the host command worker
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let worker = tokio::spawn(command_worker_task(command_rx, sink));

    // Create application state
    let store = SettingsStore::new(config.settings_file.clone());
    let state = Arc::new(AppState::new(
        config.port,
        config.host.clone(),
        store,
        command_tx,
        config.tick_interval(),
    ));
    state
        .announce_shortcuts()
        .map_err(|e| anyhow::anyhow!("Failed to announce shortcuts: {}", e))?;

    // Listen for host shortcut signals
    tokio::spawn(host_event_signals(Arc::clone(&state)));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /timer/{{start,toggle,pause,resume,toggle-pause,skip,reset}}");
    info!("  POST /events/{{force-skip,toggle-pause,key}}");
    info!("  GET  /settings, PUT /settings, POST /settings/{{open,close}}");
    info!("  POST /window/{{minimize,quit}}");
    info!("  GET  /view, /stream, /status, /health");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = shutdown_signal() => {
            info!("Shutdown signal received");
        }
        _ = state.shutdown_requested() => {
            info!("Quit requested, shutting down");
        }
    }

    // Let queued host commands (such as quit_app) finish
    state.shutdown();
    if tokio::time::timeout(Duration::from_secs(3), worker).await.is_err() {
        tracing::warn!("Host command worker did not finish in time");
    }

    info!("Server shutdown complete");
    Ok(())
}
