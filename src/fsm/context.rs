//! Shared mutable context threaded through every FSM handler.
//!
//! `FsmContext` is the blackboard state handlers read from and write to:
//! the current time, when the active state was entered, the debounced
//! button timing, pending output commands, the shared timer budget and
//! the configuration.  The service fills the inputs before each update and
//! drains the output commands afterwards.

use crate::config::TimerConfig;
use crate::drivers::button::SwitchInput;
use crate::drivers::led_patterns::BarFrame;

// ---------------------------------------------------------------------------
// Button timing (read-only to state handlers; written by the service)
// ---------------------------------------------------------------------------

/// Debounced button state as seen at the start of the current tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonTiming {
    /// Committed level is "pressed".
    pub pressed: bool,
    /// Milliseconds since the last committed press.
    pub since_pressed_ms: u32,
    /// Milliseconds since the last committed release.
    pub since_released_ms: u32,
}

impl ButtonTiming {
    pub fn from_switch(switch: &SwitchInput, now_ms: u32) -> Self {
        Self {
            pressed: switch.is_pressed(),
            since_pressed_ms: switch.time_since_pressed(now_ms),
            since_released_ms: switch.time_since_released(now_ms),
        }
    }
}

// ---------------------------------------------------------------------------
// Output commands (written by state handlers; consumed by the service)
// ---------------------------------------------------------------------------

/// One LED-bar update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarCommand {
    /// First `n` segments full, rest off.
    Level(u8),
    /// Individual brightness per segment.
    Leds(BarFrame),
}

/// Commands produced during one tick.  Later writes in the same tick win.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputCommands {
    pub bar: Option<BarCommand>,
    pub indicator: Option<bool>,
}

// ---------------------------------------------------------------------------
// Shared timer budget
// ---------------------------------------------------------------------------

/// Countdown length chosen in Program and consumed by Timer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimerBudget {
    total_ms: u32,
}

impl TimerBudget {
    pub fn from_ms(total_ms: u32) -> Self {
        Self { total_ms }
    }

    /// `segments * bar_time_ms`.
    pub fn from_segments(segments: u8, bar_time_ms: u32) -> Self {
        Self::from_ms(u32::from(segments).saturating_mul(bar_time_ms))
    }

    pub fn as_ms(self) -> u32 {
        self.total_ms
    }
}

// ---------------------------------------------------------------------------
// FsmContext
// ---------------------------------------------------------------------------

pub struct FsmContext {
    // -- Timing --
    /// Monotonic time of the current tick (wrapping).
    pub now_ms: u32,
    /// Time at which the active state was entered.
    pub state_entered_ms: u32,

    // -- Inputs --
    pub button: ButtonTiming,

    // -- Outputs --
    pub commands: OutputCommands,

    // -- Shared data --
    /// Written once by Program on its way out, read by Timer.
    pub budget: TimerBudget,

    // -- Configuration --
    pub config: TimerConfig,
}

impl FsmContext {
    pub fn new(config: TimerConfig) -> Self {
        Self {
            now_ms: 0,
            state_entered_ms: 0,
            button: ButtonTiming::default(),
            commands: OutputCommands::default(),
            budget: TimerBudget::default(),
            config,
        }
    }

    /// Milliseconds since the active state was entered.
    pub fn state_time_ms(&self) -> u32 {
        self.now_ms.wrapping_sub(self.state_entered_ms)
    }

    pub fn set_bar_level(&mut self, level: u8) {
        self.commands.bar = Some(BarCommand::Level(level));
    }

    pub fn set_bar_leds(&mut self, frame: BarFrame) {
        self.commands.bar = Some(BarCommand::Leds(frame));
    }

    /// Drive the button's own LED.
    pub fn set_indicator(&mut self, on: bool) {
        self.commands.indicator = Some(on);
    }

    /// Hand the pending commands to the caller and clear them.
    pub fn take_commands(&mut self) -> OutputCommands {
        core::mem::take(&mut self.commands)
    }
}
