//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (button, LED bar, clock, event sinks) implement these
//! traits.  The [`AppService`](super::service::AppService) consumes them via
//! generics, so the domain core never touches hardware directly.
//!
//! Output ports are infallible from the domain's point of view: a failed
//! GPIO write is the adapter's problem to log, and the next tick simply
//! writes the pattern again.

use crate::config::BAR_SEGMENTS;

// ───────────────────────────────────────────────────────────────
// Button port (driven adapter: hardware ↔ domain)
// ───────────────────────────────────────────────────────────────

/// The illuminated push button: one input line and the LED inside it.
pub trait ButtonPort {
    /// Instantaneous, undebounced level.  `true` means "pressed" after
    /// polarity has been applied.
    fn read_raw_level(&mut self) -> bool;

    /// Switch the button's built-in LED.
    fn set_led_state(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// LED bar port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

pub trait LedBarPort {
    /// Light segments `0..level` at full brightness, the rest off.
    fn set_level(&mut self, level: u8);

    /// Per-segment brightness, segment 0 first.
    fn set_leds(&mut self, levels: &[u8; BAR_SEGMENTS]);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond counter.  Wraps at `u32::MAX`; every consumer
/// measures intervals with `wrapping_sub`.
pub trait ClockPort {
    fn now_ms(&self) -> u32;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
