//! Polled, debounced push-button classifier with long-press detection.
//!
//! ## Hardware
//!
//! A single illuminated momentary switch.  The control loop samples the
//! raw pin level once per tick and hands it to [`SwitchInput::poll`] along
//! with the current monotonic time.  No ISR is involved; the classifier is
//! pure logic and never blocks.
//!
//! ## Classification
//!
//! | Event       | Condition                                              |
//! |-------------|--------------------------------------------------------|
//! | `Pressed`   | raw level stable at "pressed" for > debounce window    |
//! | `Released`  | raw level stable at "released" for > debounce window   |
//! | `LongPress` | committed press held > long-press window (once/press)  |
//!
//! At most one event is produced per tick.  A level commit wins over a
//! long press; a fresh press restarts the long-press clock, so both can
//! never be due on the same tick.
//!
//! All durations use wrapping `u32` subtraction so the millisecond
//! counter may roll over freely.

use log::debug;

use crate::config::TimerConfig;

/// Classified button event.  Exactly one is produced per poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Event {
    /// Nothing was classified this tick.
    #[default]
    None,
    /// The switch was pressed.
    Pressed,
    /// The switch has been held long enough to count as a long press.
    LongPress,
    /// The switch was released.
    Released,
}

/// Debounce + long-press state for one switch.
#[derive(Debug, Clone)]
pub struct SwitchInput {
    debounce_ms: u32,
    longpress_ms: u32,

    /// Raw level seen on the previous poll.
    last_raw: bool,
    /// When the raw level last changed.
    last_change_ms: u32,
    /// Debounced level.
    pressed: bool,
    /// A long press has already been reported for the current press.
    in_longpress: bool,
    last_press_ms: u32,
    last_release_ms: u32,
}

impl SwitchInput {
    pub fn new(debounce_ms: u32, longpress_ms: u32) -> Self {
        Self {
            debounce_ms,
            longpress_ms,
            last_raw: false,
            last_change_ms: 0,
            pressed: false,
            in_longpress: false,
            last_press_ms: 0,
            last_release_ms: 0,
        }
    }

    pub fn from_config(config: &TimerConfig) -> Self {
        Self::new(config.debounce_ms, config.longpress_ms)
    }

    /// Feed one raw sample (`true` = pressed) taken at `now_ms`.
    pub fn poll(&mut self, raw_level: bool, now_ms: u32) -> Event {
        if raw_level != self.last_raw {
            self.last_change_ms = now_ms;
            self.last_raw = raw_level;
        }

        let stable = now_ms.wrapping_sub(self.last_change_ms) > self.debounce_ms;

        let event = if stable && raw_level != self.pressed {
            self.pressed = raw_level;
            // A commit in either direction ends any long press.
            self.in_longpress = false;
            if raw_level {
                self.last_press_ms = now_ms;
                Event::Pressed
            } else {
                self.last_release_ms = now_ms;
                Event::Released
            }
        } else if self.pressed
            && !self.in_longpress
            && now_ms.wrapping_sub(self.last_press_ms) > self.longpress_ms
        {
            self.in_longpress = true;
            Event::LongPress
        } else {
            Event::None
        };

        if event != Event::None {
            debug!("button: {:?} at {}ms", event, now_ms);
        }
        event
    }

    /// Debounced level: `true` while the switch is committed as pressed.
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Milliseconds since the last committed press, even if since released.
    pub fn time_since_pressed(&self, now_ms: u32) -> u32 {
        now_ms.wrapping_sub(self.last_press_ms)
    }

    /// Milliseconds since the last committed release, even if pressed again since.
    pub fn time_since_released(&self, now_ms: u32) -> u32 {
        now_ms.wrapping_sub(self.last_release_ms)
    }
}
