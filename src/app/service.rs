//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the debouncer, the FSM and the shared context.
//! It exposes a clean, hardware-agnostic API.  All I/O flows through
//! port traits injected at call sites, making the entire service
//! testable with mock adapters.
//!
//! ```text
//!   ClockPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!  ButtonPort ◀──▶│       AppService        │
//!  LedBarPort ◀── │  SwitchInput · FSM      │
//!                 └────────────────────────┘
//! ```

use heapless::HistoryBuffer;
use log::info;

use crate::config::TimerConfig;
use crate::drivers::button::{Event, SwitchInput};
use crate::fsm::context::{BarCommand, ButtonTiming, FsmContext, TimerBudget};
use crate::fsm::states::{StateBehavior, build_state_table};
use crate::fsm::{Fsm, StateId};

use super::events::AppEvent;
use super::ports::{ButtonPort, ClockPort, EventSink, LedBarPort};

/// Transitions kept for diagnostics.
pub const JOURNAL_DEPTH: usize = 8;

/// One entry of the transition journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: StateId,
    pub to: StateId,
    pub at_ms: u32,
}

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    fsm: Fsm,
    ctx: FsmContext,
    switch: SwitchInput,
    journal: HistoryBuffer<Transition, JOURNAL_DEPTH>,
    tick_count: u64,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM — call [`start`](Self::start) next.
    pub fn new(config: TimerConfig) -> Self {
        let switch = SwitchInput::from_config(&config);
        let fsm = Fsm::with_states(build_state_table());
        Self {
            fsm,
            ctx: FsmContext::new(config),
            switch,
            journal: HistoryBuffer::new(),
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Enter `Off` and push its outputs to the hardware.
    pub fn start(
        &mut self,
        clock: &impl ClockPort,
        hw: &mut (impl ButtonPort + LedBarPort),
        sink: &mut impl EventSink,
    ) {
        self.ctx.now_ms = clock.now_ms();
        self.fsm.set_state(StateId::Off, &mut self.ctx);
        self.flush_outputs(hw);
        sink.emit(&AppEvent::Started(StateId::Off));
        info!("AppService started in {}", StateId::Off);
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle: sample button → debounce → FSM → outputs.
    ///
    /// The `hw` parameter satisfies **both** [`ButtonPort`] and
    /// [`LedBarPort`] — this avoids a double mutable borrow while keeping
    /// the port boundary explicit.
    pub fn tick(
        &mut self,
        clock: &impl ClockPort,
        hw: &mut (impl ButtonPort + LedBarPort),
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;
        let now = clock.now_ms();
        self.ctx.now_ms = now;

        // 1. Debounce the raw level
        let raw = hw.read_raw_level();
        let event = self.switch.poll(raw, now);
        self.ctx.button = ButtonTiming::from_switch(&self.switch, now);

        // 2. FSM (pure state logic)
        let prev = self.fsm.current_state();
        self.fsm.update(event, &mut self.ctx);

        // 3. Drive the outputs
        self.flush_outputs(hw);

        // 4. Report
        if event != Event::None {
            sink.emit(&AppEvent::ButtonEvent(event));
        }

        let (Some(from), Some(to)) = (prev, self.fsm.current_state()) else {
            return;
        };
        if from == to {
            return;
        }

        self.journal.write(Transition { from, to, at_ms: now });
        sink.emit(&AppEvent::StateChanged { from, to });

        match (from, to) {
            (StateId::Program, StateId::Timer) => {
                sink.emit(&AppEvent::TimerArmed {
                    segments: self.programmed_segments(),
                    budget_ms: self.ctx.budget.as_ms(),
                });
            }
            (StateId::Timer, StateId::Wait) => sink.emit(&AppEvent::TimerFinished),
            _ => {}
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current FSM state, `None` before [`start`](Self::start).
    pub fn state(&self) -> Option<StateId> {
        self.fsm.current_state()
    }

    /// Countdown most recently armed by Program.
    pub fn budget(&self) -> TimerBudget {
        self.ctx.budget
    }

    pub fn switch(&self) -> &SwitchInput {
        &self.switch
    }

    pub fn config(&self) -> &TimerConfig {
        &self.ctx.config
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// The last [`JOURNAL_DEPTH`] transitions, oldest first.
    pub fn recent_transitions(&self) -> impl Iterator<Item = &Transition> + '_ {
        self.journal.oldest_ordered()
    }

    // ── Internal ──────────────────────────────────────────────

    fn programmed_segments(&self) -> u8 {
        match self.fsm.state(StateId::Program) {
            Some(StateBehavior::Program(program)) => program.selected(),
            _ => 0,
        }
    }

    /// Translate pending FSM commands into port calls.
    fn flush_outputs(&mut self, hw: &mut (impl ButtonPort + LedBarPort)) {
        let cmds = self.ctx.take_commands();

        match cmds.bar {
            Some(BarCommand::Level(level)) => hw.set_level(level),
            Some(BarCommand::Leds(frame)) => hw.set_leds(&frame),
            None => {}
        }

        if let Some(on) = cmds.indicator {
            hw.set_led_state(on);
        }
    }
}
