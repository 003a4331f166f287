//! Registry-backed finite state machine engine.
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │  Fsm                                          │
//! │  ┌──────────┬──────────────────────────────┐  │
//! │  │ StateId  │ registered behaviour         │  │
//! │  ├──────────┼──────────────────────────────┤  │
//! │  │ Off      │ Option<StateBehavior>        │  │
//! │  │ Startup  │ Option<StateBehavior>        │  │
//! │  │ Program  │ Option<StateBehavior>        │  │
//! │  │ Timer    │ Option<StateBehavior>        │  │
//! │  │ Wait     │ Option<StateBehavior>        │  │
//! │  └──────────┴──────────────────────────────┘  │
//! │  current: Option<StateId>                     │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine hands the button [`Event`] to the **current**
//! behaviour.  If it returns `Some(next)`, the engine switches to `next`
//! and runs its `enter` hook.  Requests the machine cannot honour (same
//! state, unregistered behaviour, unknown raw id) are dropped silently:
//! the control loop must never halt, so the machine just stays put.
//!
//! All handlers receive `&mut FsmContext`, which carries time, button
//! timing, pending outputs, the shared budget and the configuration.

pub mod context;
pub mod states;

use core::fmt;

use context::FsmContext;
use log::{debug, info};
use states::StateBehavior;

use crate::drivers::button::Event;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Device modes.  Index 0 is reserved for "no state", so raw ids start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    Off = 1,
    Startup = 2,
    Program = 3,
    Timer = 4,
    Wait = 5,
}

impl StateId {
    /// Number of real states — sizes the registry.
    pub const COUNT: usize = 5;

    pub const ALL: [StateId; Self::COUNT] = [
        Self::Off,
        Self::Startup,
        Self::Program,
        Self::Timer,
        Self::Wait,
    ];

    /// Convert a raw id back to `StateId`.  `0` and anything past the last
    /// state have no identity.
    pub fn from_index(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(Self::Off),
            2 => Some(Self::Startup),
            3 => Some(Self::Program),
            4 => Some(Self::Timer),
            5 => Some(Self::Wait),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::Startup => "Startup",
            Self::Program => "Program",
            Self::Timer => "Timer",
            Self::Wait => "Wait",
        }
    }

    fn slot(self) -> usize {
        self as usize - 1
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// State behaviour interface
// ---------------------------------------------------------------------------

pub trait State {
    fn id(&self) -> StateId;

    /// Runs once on every transition into this state, after the entry
    /// timestamp has been reset.
    fn enter(&mut self, ctx: &mut FsmContext);

    /// Per-tick handler.  Returns `Some(next)` to request a transition,
    /// `None` to stay.
    fn update(&mut self, event: Event, ctx: &mut FsmContext) -> Option<StateId>;
}

/// Rule shared by every state, checked before any state-specific logic:
/// a long press always means "switch off".
pub fn common_transition(event: Event) -> Option<StateId> {
    (event == Event::LongPress).then_some(StateId::Off)
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

pub struct Fsm {
    /// Registry indexed by `StateId::slot()`.
    table: [Option<StateBehavior>; StateId::COUNT],
    /// `None` until the first successful `set_state`.
    current: Option<StateId>,
}

impl Default for Fsm {
    fn default() -> Self {
        Self::new()
    }
}

impl Fsm {
    /// An empty machine with nothing registered.
    pub fn new() -> Self {
        Self {
            table: core::array::from_fn(|_| None),
            current: None,
        }
    }

    /// An empty machine with every behaviour in `states` registered.
    pub fn with_states(states: impl IntoIterator<Item = StateBehavior>) -> Self {
        let mut fsm = Self::new();
        for state in states {
            fsm.add_state(state);
        }
        fsm
    }

    /// Register `state` under its own id, replacing any earlier behaviour.
    pub fn add_state(&mut self, state: StateBehavior) {
        let id = state.id();
        if self.table[id.slot()].replace(state).is_some() {
            debug!("FSM: replaced behaviour for {}", id);
        }
    }

    /// Feed one event to the current behaviour and apply any transition it
    /// requests.  No-op while no registered state is active.
    pub fn update(&mut self, event: Event, ctx: &mut FsmContext) {
        let Some(id) = self.current else {
            return;
        };
        let Some(state) = self.table[id.slot()].as_mut() else {
            return;
        };

        if let Some(next) = state.update(event, ctx) {
            self.set_state(next, ctx);
        }
    }

    /// Switch to `next` and run its `enter` hook.  Ignored if `next` is
    /// already current or has no registered behaviour.
    pub fn set_state(&mut self, next: StateId, ctx: &mut FsmContext) {
        if self.current == Some(next) {
            return;
        }
        let Some(state) = self.table[next.slot()].as_mut() else {
            debug!("FSM: ignoring transition to unregistered {}", next);
            return;
        };

        match self.current {
            Some(prev) => info!("FSM transition: {} -> {}", prev, next),
            None => info!("FSM starting in state: {}", next),
        }

        self.current = Some(next);
        ctx.state_entered_ms = ctx.now_ms;
        state.enter(ctx);
    }

    /// [`set_state`](Self::set_state) for a raw id, e.g. one decoded from
    /// outside the firmware.  Unknown ids are ignored.
    pub fn set_state_index(&mut self, raw: u8, ctx: &mut FsmContext) {
        match StateId::from_index(raw) {
            Some(id) => self.set_state(id, ctx),
            None => debug!("FSM: ignoring transition to invalid state id {}", raw),
        }
    }

    /// The active state, or `None` before the first transition.
    pub fn current_state(&self) -> Option<StateId> {
        self.current
    }

    /// The behaviour registered for `id`, if any.
    pub fn state(&self, id: StateId) -> Option<&StateBehavior> {
        self.table[id.slot()].as_ref()
    }
}
