//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};
use clap::Parser;

use crate::services::HookSink;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "zen-rest")]
#[command(about = "A focus/rest interval timer daemon driven by host shortcuts")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Key-value file the settings are stored in
    #[arg(long, default_value = "zen-rest.json")]
    pub settings_file: PathBuf,

    /// Tick period in milliseconds
    #[arg(long, default_value = "1000", hide = true)]
    pub tick_ms: u64,

    /// Shell command run when a rest begins
    #[arg(long)]
    pub on_enter_rest: Option<String>,

    /// Shell command run when a rest ends
    #[arg(long)]
    pub on_exit_rest: Option<String>,

    /// Shell command run when the global shortcuts change
    #[arg(long)]
    pub on_update_shortcuts: Option<String>,

    /// Shell command run on a minimize request
    #[arg(long)]
    pub on_minimize: Option<String>,

    /// Shell command run on a quit request
    #[arg(long)]
    pub on_quit: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }

    /// Shell hooks from the command line
    pub fn hooks(&self) -> HookSink {
        HookSink {
            on_update_shortcuts: self.on_update_shortcuts.clone(),
            on_enter_rest: self.on_enter_rest.clone(),
            on_exit_rest: self.on_exit_rest.clone(),
            on_minimize: self.on_minimize.clone(),
            on_quit: self.on_quit.clone(),
        }
    }
}
