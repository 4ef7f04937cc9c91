//! Background task that hands queued host commands to the command sink

use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};

use crate::services::{CommandSink, HostCommand};

/// Execute host commands one at a time, in the order they were queued.
///
/// A failed command is logged and skipped; the timer never waits on the host.
/// The task ends once every sender has been dropped and the queue is drained.
pub async fn command_worker_task(
    mut commands: UnboundedReceiver<HostCommand>,
    sink: Arc<dyn CommandSink>,
) {
    info!("Starting host command worker");

    while let Some(command) = commands.recv().await {
        debug!("Executing host command {}", command);
        if let Err(e) = sink.execute(&command).await {
            warn!("Host command {} failed: {}", command.name(), e);
        }
    }

    info!("Host command worker stopped");
}
