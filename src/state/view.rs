//! Which screen the host UI should show, derived from timer state

use serde::Serialize;

use super::{Phase, Settings, TimerState};

/// The single live view. Settings wins over the timer views while open and
/// never touches timer state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "camelCase")]
pub enum View {
    #[serde(rename_all = "camelCase")]
    Work {
        time_left: u64,
        total_time: u64,
        clock: String,
        progress: f64,
        is_active: bool,
        is_paused: bool,
        current_cycle: u32,
        total_cycles: u32,
    },
    #[serde(rename_all = "camelCase")]
    Rest {
        time_left: u64,
        total_time: u64,
        clock: String,
        progress: f64,
        is_paused: bool,
        skip_shortcut: String,
    },
    Settings { settings: Settings },
}

impl View {
    pub fn derive(timer: &TimerState, settings: &Settings, settings_open: bool) -> Self {
        if settings_open {
            return View::Settings {
                settings: settings.clone(),
            };
        }

        let total_time = timer.phase.duration(settings);
        let progress = if total_time == 0 {
            0.0
        } else {
            timer.time_left as f64 / total_time as f64
        };

        match timer.phase {
            Phase::Work => View::Work {
                time_left: timer.time_left,
                total_time,
                clock: format_clock(timer.time_left),
                progress,
                is_active: timer.is_active,
                is_paused: timer.is_paused,
                current_cycle: timer.current_cycle,
                total_cycles: settings.total_cycles,
            },
            Phase::Rest => View::Rest {
                time_left: timer.time_left,
                total_time,
                clock: format_clock(timer.time_left),
                progress,
                is_paused: timer.is_paused,
                skip_shortcut: settings.skip_shortcut.clone(),
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            View::Work { .. } => "work",
            View::Rest { .. } => "rest",
            View::Settings { .. } => "settings",
        }
    }
}

/// Format seconds as `mm:ss`; minutes are not wrapped into hours
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
