//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{debug, info};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_state={}", state);
            }
            AppEvent::ButtonEvent(ev) => {
                debug!("BUTTON | {:?}", ev);
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {} -> {}", from, to);
            }
            AppEvent::TimerArmed {
                segments,
                budget_ms,
            } => {
                info!(
                    "TIMER | armed {} segment(s), {}s",
                    segments,
                    budget_ms / 1000
                );
            }
            AppEvent::TimerFinished => {
                info!("TIMER | finished");
            }
        }
    }
}
