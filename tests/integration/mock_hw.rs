//! Mock hardware adapter for integration tests.
//!
//! Records every port call so tests can assert on the full output
//! history without touching real GPIO.

use std::cell::Cell;

use bartimer::app::events::AppEvent;
use bartimer::app::ports::{ButtonPort, ClockPort, EventSink, LedBarPort};
use bartimer::app::service::AppService;
use bartimer::config::{BAR_SEGMENTS, TimerConfig};
use bartimer::fsm::StateId;

// ── Port call record ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwCall {
    Level(u8),
    Leds([u8; BAR_SEGMENTS]),
    Indicator(bool),
}

// ── MockHardware ──────────────────────────────────────────────

#[derive(Default)]
pub struct MockHardware {
    /// Raw level returned by the next `read_raw_level`.
    pub level: bool,
    pub calls: Vec<HwCall>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_call(&self) -> Option<&HwCall> {
        self.calls.last()
    }

    pub fn indicator_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                HwCall::Indicator(on) => Some(*on),
                _ => None,
            })
            .unwrap_or(false)
    }

    /// Every `set_level` argument from call index `from` onward.
    pub fn levels_since(&self, from: usize) -> Vec<u8> {
        self.calls[from..]
            .iter()
            .filter_map(|c| match c {
                HwCall::Level(n) => Some(*n),
                _ => None,
            })
            .collect()
    }

    /// Every `set_leds` frame from call index `from` onward.
    pub fn frames_since(&self, from: usize) -> Vec<[u8; BAR_SEGMENTS]> {
        self.calls[from..]
            .iter()
            .filter_map(|c| match c {
                HwCall::Leds(f) => Some(*f),
                _ => None,
            })
            .collect()
    }
}

impl ButtonPort for MockHardware {
    fn read_raw_level(&mut self) -> bool {
        self.level
    }

    fn set_led_state(&mut self, on: bool) {
        self.calls.push(HwCall::Indicator(on));
    }
}

impl LedBarPort for MockHardware {
    fn set_level(&mut self, level: u8) {
        self.calls.push(HwCall::Level(level));
    }

    fn set_leds(&mut self, levels: &[u8; BAR_SEGMENTS]) {
        self.calls.push(HwCall::Leds(*levels));
    }
}

// ── ManualClock ───────────────────────────────────────────────

#[derive(Default)]
pub struct ManualClock {
    now: Cell<u32>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn at(now_ms: u32) -> Self {
        Self {
            now: Cell::new(now_ms),
        }
    }

    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }
}

impl ClockPort for ManualClock {
    fn now_ms(&self) -> u32 {
        self.now.get()
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn transitions(&self) -> Vec<(StateId, StateId)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::StateChanged { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(*event);
    }
}

// ── Rig: service + mocks driven at the control-loop rate ──────

pub const TICK_MS: u32 = 10;

pub struct Rig {
    pub app: AppService,
    pub hw: MockHardware,
    pub clock: ManualClock,
    pub sink: RecordingSink,
}

#[allow(dead_code)]
impl Rig {
    pub fn new(config: TimerConfig) -> Self {
        Self::starting_at(config, 0)
    }

    pub fn starting_at(config: TimerConfig, now_ms: u32) -> Self {
        let mut rig = Self {
            app: AppService::new(config),
            hw: MockHardware::new(),
            clock: ManualClock::at(now_ms),
            sink: RecordingSink::default(),
        };
        rig.app.start(&rig.clock, &mut rig.hw, &mut rig.sink);
        rig
    }

    pub fn tick(&mut self) {
        self.clock.advance(TICK_MS);
        self.app.tick(&self.clock, &mut self.hw, &mut self.sink);
    }

    /// Hold the raw button level for `ms`, ticking every [`TICK_MS`].
    pub fn hold(&mut self, pressed: bool, ms: u32) {
        self.hw.level = pressed;
        for _ in 0..ms / TICK_MS {
            self.tick();
        }
    }

    /// A clean press-and-release, each phase well past the debounce window.
    pub fn click(&mut self) {
        self.hold(true, 100);
        self.hold(false, 100);
    }

    /// Keep the current level until the machine reaches `target`.  Returns
    /// the number of milliseconds that took, or `None` after `limit_ms`.
    pub fn run_until(&mut self, target: StateId, limit_ms: u32) -> Option<u32> {
        let mut waited = 0;
        while self.app.state() != Some(target) {
            if waited >= limit_ms {
                return None;
            }
            self.tick();
            waited += TICK_MS;
        }
        Some(waited)
    }
}

/// Short timings so whole cycles run in a few thousand ticks.
pub fn fast_config() -> TimerConfig {
    TimerConfig {
        bar_time_secs: 1,
        ..TimerConfig::default()
    }
}
