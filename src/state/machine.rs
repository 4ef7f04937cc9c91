//! The work/rest state machine
//!
//! Every trigger, whatever its source, is applied through [`TimerMachine::apply`]
//! as one atomic transition. The machine never performs side effects itself: it
//! returns the host commands the transition asks for and the caller queues them.

use tracing::debug;

use crate::services::HostCommand;
use super::{Phase, Settings, TimerState};

/// Everything that can move the timer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// Begin a run from idle
    Start,
    /// Start when idle, stop without resetting when running a work phase
    Toggle,
    Pause,
    Resume,
    /// Flip the paused flag of an active timer
    TogglePause,
    /// End the rest phase early
    Skip,
    /// Return to idle work with a fresh cycle count
    Reset,
    /// One elapsed second, stamped with the tick generation that scheduled it
    Tick { generation: u64 },
    /// Replace the settings snapshot
    UpdateSettings(Settings),
}

impl Trigger {
    pub fn name(&self) -> &'static str {
        match self {
            Trigger::Start => "start",
            Trigger::Toggle => "toggle",
            Trigger::Pause => "pause",
            Trigger::Resume => "resume",
            Trigger::TogglePause => "toggle-pause",
            Trigger::Skip => "skip",
            Trigger::Reset => "reset",
            Trigger::Tick { .. } => "tick",
            Trigger::UpdateSettings(_) => "update-settings",
        }
    }
}

/// Asynchronous signal delivered by the host shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// Global skip shortcut, only meaningful during a rest
    ForceSkip,
    /// Global pause shortcut
    TogglePause,
}

impl HostEvent {
    pub fn name(&self) -> &'static str {
        match self {
            HostEvent::ForceSkip => "force-skip",
            HostEvent::TogglePause => "toggle-pause",
        }
    }

    /// The trigger this event maps onto; phase filtering is left to the machine
    pub fn trigger(self) -> Trigger {
        match self {
            HostEvent::ForceSkip => Trigger::Skip,
            HostEvent::TogglePause => Trigger::TogglePause,
        }
    }
}

/// Result of applying one trigger
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Transition {
    /// False when the trigger was not valid for the current state and was dropped
    pub applied: bool,
    /// Host commands to issue, in order
    pub commands: Vec<HostCommand>,
}

impl Transition {
    fn ignored() -> Self {
        Self::default()
    }

    fn applied(commands: Vec<HostCommand>) -> Self {
        Self {
            applied: true,
            commands,
        }
    }
}

/// Owner of the timer state and the settings snapshot it runs against
#[derive(Debug, Clone)]
pub struct TimerMachine {
    settings: Settings,
    timer: TimerState,
    /// Bumped whenever ticking starts, stops or changes phase. Ticks carrying an
    /// older generation were scheduled for a state that no longer exists.
    generation: u64,
}

impl TimerMachine {
    pub fn new(settings: Settings) -> Self {
        let timer = TimerState::new(&settings);
        Self {
            settings,
            timer,
            generation: 0,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn timer(&self) -> &TimerState {
        &self.timer
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a tick source should be live for the current state
    pub fn wants_ticks(&self) -> bool {
        self.timer.is_running()
    }

    /// Commands the host needs once at startup
    pub fn initial_commands(&self) -> Vec<HostCommand> {
        vec![self.shortcuts_command()]
    }

    /// Apply a single trigger
    pub fn apply(&mut self, trigger: Trigger) -> Transition {
        let name = trigger.name();
        let transition = match trigger {
            Trigger::Start => self.start(),
            Trigger::Toggle => self.toggle(),
            Trigger::Pause => self.set_paused(true),
            Trigger::Resume => self.set_paused(false),
            Trigger::TogglePause => {
                let paused = !self.timer.is_paused;
                self.set_paused(paused)
            }
            Trigger::Skip => self.skip(),
            Trigger::Reset => self.reset(),
            Trigger::Tick { generation } => self.tick(generation),
            Trigger::UpdateSettings(settings) => self.update_settings(settings),
        };

        if !transition.applied {
            debug!("Ignored trigger '{}' in state {}", name, self.timer.label());
        }

        transition
    }

    fn start(&mut self) -> Transition {
        if self.timer.is_active {
            return Transition::ignored();
        }

        self.timer.phase = Phase::Work;
        self.timer.time_left = self.settings.work_seconds();
        self.timer.current_cycle = 1;
        self.timer.is_active = true;
        self.timer.is_paused = false;
        self.generation += 1;
        Transition::applied(Vec::new())
    }

    fn toggle(&mut self) -> Transition {
        if !self.timer.is_active {
            return self.start();
        }
        if self.timer.phase == Phase::Rest {
            return Transition::ignored();
        }

        // Stopping keeps the remaining time and cycle on display
        self.timer.is_active = false;
        self.timer.is_paused = false;
        self.generation += 1;
        Transition::applied(Vec::new())
    }

    fn set_paused(&mut self, paused: bool) -> Transition {
        if !self.timer.is_active || self.timer.is_paused == paused {
            return Transition::ignored();
        }

        self.timer.is_paused = paused;
        self.generation += 1;
        Transition::applied(Vec::new())
    }

    fn skip(&mut self) -> Transition {
        if self.timer.phase != Phase::Rest {
            return Transition::ignored();
        }
        self.finish_rest()
    }

    fn reset(&mut self) -> Transition {
        let mut commands = Vec::new();
        if self.timer.phase == Phase::Rest {
            commands.push(HostCommand::ExitRestMode);
        }

        self.timer = TimerState::new(&self.settings);
        self.generation += 1;
        Transition::applied(commands)
    }

    fn tick(&mut self, generation: u64) -> Transition {
        if generation != self.generation || !self.timer.is_running() {
            return Transition::ignored();
        }

        self.timer.time_left = self.timer.time_left.saturating_sub(1);
        if self.timer.time_left > 0 {
            return Transition::applied(Vec::new());
        }

        match self.timer.phase {
            Phase::Work => self.begin_rest(),
            Phase::Rest => self.finish_rest(),
        }
    }

    fn begin_rest(&mut self) -> Transition {
        self.timer.phase = Phase::Rest;
        self.timer.time_left = self.settings.rest_seconds();
        self.generation += 1;
        Transition::applied(vec![HostCommand::EnterRestMode])
    }

    fn finish_rest(&mut self) -> Transition {
        let total = self.settings.total_cycles;
        let run_complete = total > 0 && self.timer.current_cycle >= total;

        self.timer.phase = Phase::Work;
        self.timer.time_left = self.settings.work_seconds();
        self.timer.is_paused = false;

        if run_complete {
            self.timer.current_cycle = 1;
            self.timer.is_active = false;
        } else {
            self.timer.current_cycle += 1;
            self.timer.is_active = self.settings.auto_start;
        }

        self.generation += 1;
        Transition::applied(vec![HostCommand::ExitRestMode])
    }

    fn update_settings(&mut self, settings: Settings) -> Transition {
        let shortcuts_changed = settings.shortcuts_differ(&self.settings);
        self.settings = settings;

        if !self.timer.is_active {
            self.timer.time_left = self.settings.work_seconds();
        } else {
            let limit = self.timer.phase.duration(&self.settings);
            self.timer.time_left = self.timer.time_left.min(limit);
        }

        let mut commands = Vec::new();
        if shortcuts_changed {
            commands.push(self.shortcuts_command());
        }
        Transition::applied(commands)
    }

    fn shortcuts_command(&self) -> HostCommand {
        HostCommand::UpdateShortcuts {
            skip_shortcut: self.settings.skip_shortcut.clone(),
            pause_shortcut: self.settings.pause_shortcut.clone(),
        }
    }
}
