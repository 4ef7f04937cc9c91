//! Host-side commands and the sinks that carry them out

use std::fmt;
use futures::future::BoxFuture;
use serde::Serialize;
use tokio::process::Command;
use tracing::{debug, info};

/// A side effect requested from the host shell
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum HostCommand {
    /// Re-register the global skip and pause shortcuts
    #[serde(rename_all = "camelCase")]
    UpdateShortcuts {
        skip_shortcut: String,
        pause_shortcut: String,
    },
    /// Show the rest screen fullscreen and on top
    EnterRestMode,
    /// Restore the normal window after a rest
    ExitRestMode,
    MinimizeToTray,
    QuitApp,
}

impl HostCommand {
    pub fn name(&self) -> &'static str {
        match self {
            HostCommand::UpdateShortcuts { .. } => "update_shortcuts",
            HostCommand::EnterRestMode => "enter_rest_mode",
            HostCommand::ExitRestMode => "exit_rest_mode",
            HostCommand::MinimizeToTray => "minimize_to_tray",
            HostCommand::QuitApp => "quit_app",
        }
    }
}

impl fmt::Display for HostCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostCommand::UpdateShortcuts {
                skip_shortcut,
                pause_shortcut,
            } => write!(
                f,
                "{}(skip={}, pause={})",
                self.name(),
                skip_shortcut,
                pause_shortcut
            ),
            _ => write!(f, "{}()", self.name()),
        }
    }
}

/// Receiver of host commands. Implementations may fail; callers log the failure
/// and carry on.
pub trait CommandSink: Send + Sync {
    fn execute<'a>(&'a self, command: &'a HostCommand) -> BoxFuture<'a, Result<(), String>>;
}

/// Sink used when no host integration is configured: commands are only logged
#[derive(Debug, Default, Clone)]
pub struct LogSink;

impl CommandSink for LogSink {
    fn execute<'a>(&'a self, command: &'a HostCommand) -> BoxFuture<'a, Result<(), String>> {
        Box::pin(async move {
            info!("Host command (no host attached): {}", command);
            Ok(())
        })
    }
}

/// Shell hooks, one optional command line per host command
#[derive(Debug, Default, Clone)]
pub struct HookSink {
    pub on_update_shortcuts: Option<String>,
    pub on_enter_rest: Option<String>,
    pub on_exit_rest: Option<String>,
    pub on_minimize: Option<String>,
    pub on_quit: Option<String>,
}

impl HookSink {
    /// Whether any hook is configured at all
    pub fn is_empty(&self) -> bool {
        self.on_update_shortcuts.is_none()
            && self.on_enter_rest.is_none()
            && self.on_exit_rest.is_none()
            && self.on_minimize.is_none()
            && self.on_quit.is_none()
    }

    fn hook_for(&self, command: &HostCommand) -> Option<&str> {
        match command {
            HostCommand::UpdateShortcuts { .. } => self.on_update_shortcuts.as_deref(),
            HostCommand::EnterRestMode => self.on_enter_rest.as_deref(),
            HostCommand::ExitRestMode => self.on_exit_rest.as_deref(),
            HostCommand::MinimizeToTray => self.on_minimize.as_deref(),
            HostCommand::QuitApp => self.on_quit.as_deref(),
        }
    }
}

impl CommandSink for HookSink {
    fn execute<'a>(&'a self, command: &'a HostCommand) -> BoxFuture<'a, Result<(), String>> {
        Box::pin(async move {
            let Some(hook) = self.hook_for(command) else {
                debug!("No hook configured for {}", command.name());
                return Ok(());
            };

            run_hook(hook, command).await
        })
    }
}

/// Run one hook through `sh -c`, exposing the command through the environment
async fn run_hook(hook: &str, command: &HostCommand) -> Result<(), String> {
    debug!("Running hook for {}: {}", command.name(), hook);

    let mut process = Command::new("sh");
    process
        .args(["-c", hook])
        .env("ZEN_REST_COMMAND", command.name());

    if let HostCommand::UpdateShortcuts {
        skip_shortcut,
        pause_shortcut,
    } = command
    {
        process
            .env("ZEN_REST_SKIP_SHORTCUT", skip_shortcut)
            .env("ZEN_REST_PAUSE_SHORTCUT", pause_shortcut);
    }

    let output = process
        .output()
        .await
        .map_err(|e| format!("Failed to execute {} hook: {}", command.name(), e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(format!(
            "{} hook failed ({}): {}",
            command.name(),
            output.status,
            stderr.trim()
        ));
    }

    info!("{} hook executed", command.name());
    Ok(())
}
