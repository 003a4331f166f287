//! System configuration parameters
//!
//! All tunable timings for the BarTimer.  Defaults match the shipped
//! appliance; a JSON override can be baked in at build time (see `main.rs`).
//! Nothing here is persisted.

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Number of segments on the LED bar.
pub const BAR_SEGMENTS: usize = 10;

/// Core timer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    // --- Button ---
    /// Raw level must be stable this long before it is committed (ms)
    pub debounce_ms: u32,
    /// Continuous press length that synthesises a long press (ms)
    pub longpress_ms: u32,
    /// `true` if the button pin reads HIGH while pressed
    pub button_active_high: bool,

    // --- Startup ---
    /// Self-test fill duration before programming starts (ms)
    pub startup_duration_ms: u32,

    // --- Program ---
    /// Idle time after the last release before the selection blinks (ms)
    pub program_hold_ms: u32,
    /// Idle time after the last release before the timer is armed (ms)
    pub program_timeout_ms: u32,
    /// Blink half-period while waiting for the timeout (ms)
    pub program_blink_ms: u32,
    /// Countdown time contributed by each selected segment (seconds)
    pub bar_time_secs: u32,

    // --- Timer / Wait ---
    /// Minimum interval between countdown bar refreshes (ms)
    pub timer_render_interval_ms: u32,
    /// Interval between sweep steps in the Wait animation (ms)
    pub sweep_step_ms: u32,

    // --- Hardware ---
    /// Reverse the physical segment order of the bar
    pub bar_green_to_red: bool,

    // --- Timing ---
    /// Control loop polling period (ms)
    pub control_loop_interval_ms: u32,
    /// Task watchdog timeout (ms)
    pub watchdog_timeout_ms: u32,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            // Button
            debounce_ms: 50,
            longpress_ms: 3000,
            button_active_high: true,

            // Startup
            startup_duration_ms: 1500,

            // Program
            program_hold_ms: 2000,
            program_timeout_ms: 4500,
            program_blink_ms: 250,
            bar_time_secs: 1800, // 30 min per segment

            // Timer / Wait
            timer_render_interval_ms: 500,
            sweep_step_ms: 100,

            // Hardware
            bar_green_to_red: false,

            // Timing
            control_loop_interval_ms: 10, // 100 Hz
            watchdog_timeout_ms: 5000,
        }
    }
}

/// Longest countdown we accept.  Elapsed times are computed with wrapping
/// `u32` subtraction, which is only unambiguous below half the range.
const MAX_BUDGET_MS: u64 = (u32::MAX / 2) as u64;

impl TimerConfig {
    /// Parse a JSON override.  Fields that are absent keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|_| Error::ConfigParse)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply an optional build-time override.  An override that fails to
    /// parse or validate is logged and the defaults are used instead.
    pub fn resolve(override_json: Option<&str>) -> Self {
        let Some(json) = override_json else {
            return Self::default();
        };
        match Self::from_json(json) {
            Ok(config) => {
                info!("Config: build-time override applied");
                config
            }
            Err(e) => {
                warn!("Config override rejected ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Duration one selected segment adds to the countdown, in milliseconds.
    pub fn bar_time_ms(&self) -> u32 {
        self.bar_time_secs.saturating_mul(1000)
    }

    /// Range-check every field.  Invalid values are rejected, never clamped.
    pub fn validate(&self) -> Result<()> {
        if self.debounce_ms == 0 {
            return Err(Error::Config("debounce_ms must be > 0"));
        }
        if self.debounce_ms >= self.longpress_ms {
            return Err(Error::Config("longpress_ms must exceed debounce_ms"));
        }
        if self.program_hold_ms >= self.program_timeout_ms {
            return Err(Error::Config("program_timeout_ms must exceed program_hold_ms"));
        }
        if self.program_blink_ms == 0 {
            return Err(Error::Config("program_blink_ms must be > 0"));
        }
        if self.bar_time_secs == 0 {
            return Err(Error::Config("bar_time_secs must be > 0"));
        }
        let full_budget_ms = u64::from(self.bar_time_secs) * 1000 * BAR_SEGMENTS as u64;
        if full_budget_ms > MAX_BUDGET_MS {
            return Err(Error::Config("bar_time_secs overflows the millisecond clock"));
        }
        if self.control_loop_interval_ms == 0 {
            return Err(Error::Config("control_loop_interval_ms must be > 0"));
        }
        if self.watchdog_timeout_ms <= self.control_loop_interval_ms {
            return Err(Error::Config(
                "watchdog_timeout_ms must exceed control_loop_interval_ms",
            ));
        }
        Ok(())
    }
}
