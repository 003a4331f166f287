//! Concrete state behaviours and table builder.
//!
//! Each mode is a small struct holding its own counters; [`StateBehavior`]
//! is the closed set of modes the machine can register.  Every `update`
//! applies [`common_transition`] first and returns immediately if it fires.
//!
//! ```text
//!  OFF ──[Pressed]──▶ STARTUP ──[1.5 s]──▶ PROGRAM
//!   ▲                    ▲                    │
//!   │                    │            [idle 4.5 s]
//!   │                    │                    ▼
//!   │                    └──[Pressed]── WAIT ◀──[budget spent]── TIMER
//!   │
//!  Any state ──[LongPress]──▶ OFF
//! ```

use log::info;

use super::context::{FsmContext, TimerBudget};
use super::{State, StateId, common_transition};
use crate::config::BAR_SEGMENTS;
use crate::drivers::button::Event;
use crate::drivers::led_patterns::{
    SweepCursor, blink_on, progress_level, startup_fill_level,
};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// One behaviour per mode.  Called once at startup.
pub fn build_state_table() -> [StateBehavior; StateId::COUNT] {
    [
        StateBehavior::Off(OffState),
        StateBehavior::Startup(StartupState),
        StateBehavior::Program(ProgramState::new()),
        StateBehavior::Timer(TimerState::new()),
        StateBehavior::Wait(WaitState::new()),
    ]
}

/// The closed set of registrable state behaviours.
#[derive(Debug, Clone)]
pub enum StateBehavior {
    Off(OffState),
    Startup(StartupState),
    Program(ProgramState),
    Timer(TimerState),
    Wait(WaitState),
}

impl State for StateBehavior {
    fn id(&self) -> StateId {
        match self {
            Self::Off(s) => s.id(),
            Self::Startup(s) => s.id(),
            Self::Program(s) => s.id(),
            Self::Timer(s) => s.id(),
            Self::Wait(s) => s.id(),
        }
    }

    fn enter(&mut self, ctx: &mut FsmContext) {
        match self {
            Self::Off(s) => s.enter(ctx),
            Self::Startup(s) => s.enter(ctx),
            Self::Program(s) => s.enter(ctx),
            Self::Timer(s) => s.enter(ctx),
            Self::Wait(s) => s.enter(ctx),
        }
    }

    fn update(&mut self, event: Event, ctx: &mut FsmContext) -> Option<StateId> {
        match self {
            Self::Off(s) => s.update(event, ctx),
            Self::Startup(s) => s.update(event, ctx),
            Self::Program(s) => s.update(event, ctx),
            Self::Timer(s) => s.update(event, ctx),
            Self::Wait(s) => s.update(event, ctx),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  OFF — bar dark, indicator dark, waiting for a press
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default)]
pub struct OffState;

impl State for OffState {
    fn id(&self) -> StateId {
        StateId::Off
    }

    fn enter(&mut self, ctx: &mut FsmContext) {
        ctx.set_bar_level(0);
        ctx.set_indicator(false);
    }

    fn update(&mut self, event: Event, _ctx: &mut FsmContext) -> Option<StateId> {
        if let Some(next) = common_transition(event) {
            return Some(next);
        }

        (event == Event::Pressed).then_some(StateId::Startup)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  STARTUP — indicator on, bar fills as a self-test
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default)]
pub struct StartupState;

impl State for StartupState {
    fn id(&self) -> StateId {
        StateId::Startup
    }

    fn enter(&mut self, ctx: &mut FsmContext) {
        ctx.set_indicator(true);
    }

    fn update(&mut self, event: Event, ctx: &mut FsmContext) -> Option<StateId> {
        if let Some(next) = common_transition(event) {
            return Some(next);
        }

        let elapsed = ctx.state_time_ms();
        if elapsed >= ctx.config.startup_duration_ms {
            return Some(StateId::Program);
        }

        ctx.set_bar_level(startup_fill_level(elapsed));
        None
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  PROGRAM — presses select 1..=10 segments, inactivity arms the timer
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
pub struct ProgramState {
    /// Segments selected, always within `1..=BAR_SEGMENTS`.
    selected: u8,
}

impl Default for ProgramState {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgramState {
    pub fn new() -> Self {
        Self { selected: 1 }
    }

    pub fn selected(&self) -> u8 {
        self.selected
    }
}

impl State for ProgramState {
    fn id(&self) -> StateId {
        StateId::Program
    }

    fn enter(&mut self, ctx: &mut FsmContext) {
        self.selected = 1;
        ctx.set_bar_level(self.selected);
    }

    fn update(&mut self, event: Event, ctx: &mut FsmContext) -> Option<StateId> {
        if let Some(next) = common_transition(event) {
            return Some(next);
        }

        if event == Event::Pressed {
            self.selected = if usize::from(self.selected) >= BAR_SEGMENTS {
                1
            } else {
                self.selected + 1
            };
            ctx.set_bar_level(self.selected);
        }

        let hold = ctx.config.program_hold_ms;
        let button = ctx.button;
        if button.pressed || button.since_pressed_ms <= hold || button.since_released_ms <= hold {
            return None;
        }

        // Idle long enough: blink the selection until the timeout arms the timer.
        let idle = button.since_released_ms - hold;
        let lit = if blink_on(idle, ctx.config.program_blink_ms) {
            self.selected
        } else {
            0
        };
        ctx.set_bar_level(lit);

        if button.since_released_ms > ctx.config.program_timeout_ms {
            ctx.budget = TimerBudget::from_segments(self.selected, ctx.config.bar_time_ms());
            info!(
                "PROGRAM: {} segment(s) selected, budget {}ms",
                self.selected,
                ctx.budget.as_ms()
            );
            return Some(StateId::Timer);
        }

        None
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  TIMER — bar tracks the share of the budget already spent
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default)]
pub struct TimerState {
    /// `None` until the first render after entry.
    last_render_ms: Option<u32>,
}

impl TimerState {
    pub fn new() -> Self {
        Self { last_render_ms: None }
    }
}

impl State for TimerState {
    fn id(&self) -> StateId {
        StateId::Timer
    }

    fn enter(&mut self, ctx: &mut FsmContext) {
        self.last_render_ms = None;
        ctx.set_bar_level(0);
    }

    fn update(&mut self, event: Event, ctx: &mut FsmContext) -> Option<StateId> {
        if let Some(next) = common_transition(event) {
            return Some(next);
        }

        let now = ctx.now_ms;
        let interval = ctx.config.timer_render_interval_ms;
        let budget = ctx.budget.as_ms();
        let elapsed = ctx.state_time_ms();

        if self
            .last_render_ms
            .is_none_or(|last| now.wrapping_sub(last) > interval)
        {
            self.last_render_ms = Some(now);
            ctx.set_bar_level(progress_level(elapsed, budget));
        }

        if elapsed > budget {
            info!("TIMER: {}ms budget spent", budget);
            return Some(StateId::Wait);
        }

        None
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  WAIT — bouncing sweep until the user acknowledges
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default)]
pub struct WaitState {
    cursor: SweepCursor,
    last_step_ms: u32,
}

impl WaitState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> &SweepCursor {
        &self.cursor
    }
}

impl State for WaitState {
    fn id(&self) -> StateId {
        StateId::Wait
    }

    fn enter(&mut self, ctx: &mut FsmContext) {
        self.cursor = SweepCursor::new();
        self.last_step_ms = ctx.now_ms;
        ctx.set_bar_level(0);
    }

    fn update(&mut self, event: Event, ctx: &mut FsmContext) -> Option<StateId> {
        if let Some(next) = common_transition(event) {
            return Some(next);
        }

        if event == Event::Pressed {
            return Some(StateId::Startup);
        }

        if ctx.now_ms.wrapping_sub(self.last_step_ms) > ctx.config.sweep_step_ms {
            self.last_step_ms = ctx.now_ms;
            self.cursor.advance();
            ctx.set_bar_leds(self.cursor.frame());
        }

        None
    }
}
