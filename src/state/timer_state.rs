//! Timer state structure and management

use serde::{Deserialize, Serialize};

use super::Settings;

/// Which half of the schedule the timer is in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    Work,
    Rest,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Work => "work",
            Phase::Rest => "rest",
        }
    }

    /// Full length of this phase in seconds under the given settings
    pub fn duration(&self, settings: &Settings) -> u64 {
        match self {
            Phase::Work => settings.work_seconds(),
            Phase::Rest => settings.rest_seconds(),
        }
    }
}

/// Timer state for tracking the work/rest countdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub phase: Phase,
    /// Seconds remaining in the current phase
    pub time_left: u64,
    pub is_active: bool,
    pub is_paused: bool,
    /// 1-based count of work phases started in this run
    pub current_cycle: u32,
}

impl TimerState {
    /// Create an idle timer at the start of a work phase
    pub fn new(settings: &Settings) -> Self {
        Self {
            phase: Phase::Work,
            time_left: settings.work_seconds(),
            is_active: false,
            is_paused: false,
            current_cycle: 1,
        }
    }

    /// Check if the timer is counting down right now
    pub fn is_running(&self) -> bool {
        self.is_active && !self.is_paused
    }

    /// Human-readable state name, e.g. `running-rest`
    pub fn label(&self) -> String {
        let activity = match (self.is_active, self.is_paused) {
            (false, _) => "idle",
            (true, false) => "running",
            (true, true) => "paused",
        };
        format!("{}-{}", activity, self.phase.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_idle_work() {
        let settings = Settings::default();
        let state = TimerState::new(&settings);

        assert_eq!(state.phase, Phase::Work);
        assert_eq!(state.time_left, settings.work_seconds());
        assert_eq!(state.current_cycle, 1);
        assert!(!state.is_running());
        assert_eq!(state.label(), "idle-work");
    }

    #[test]
    fn phase_duration_uses_phase_units() {
        let settings = Settings {
            work_duration: 2,
            rest_duration: 30,
            ..Settings::default()
        };
        assert_eq!(Phase::Work.duration(&settings), 120);
        assert_eq!(Phase::Rest.duration(&settings), 30);
    }
}
