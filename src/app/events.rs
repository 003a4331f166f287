//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.

use crate::drivers::button::Event;
use crate::fsm::StateId;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// The application service has started (carries initial state).
    Started(StateId),

    /// A debounced button event was delivered to the FSM.
    ButtonEvent(Event),

    /// The FSM transitioned between states.
    StateChanged { from: StateId, to: StateId },

    /// Program handed a countdown to Timer.
    TimerArmed { segments: u8, budget_ms: u32 },

    /// The countdown ran out and the bar is sweeping.
    TimerFinished,
}
