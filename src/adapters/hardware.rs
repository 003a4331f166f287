//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the button input, the button's indicator LED and the LED bar
//! driver, exposing them through [`ButtonPort`] and [`LedBarPort`].  This
//! is the only module in the system that touches actual pins.  It is
//! generic over `embedded-hal` 1.0 traits, so the firmware plugs in
//! ESP-IDF `PinDriver`s and host tests plug in mocks.
//!
//! Pin failures never reach the domain: they are logged and the port call
//! degrades (a failed read counts as "released").

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use log::warn;

use crate::app::ports::{ButtonPort, LedBarPort};
use crate::config::{BAR_SEGMENTS, TimerConfig};
use crate::drivers::indicator::IndicatorLed;
use crate::drivers::led_bar::LedBar;
use crate::error::GpioError;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<BTN, LED, CLK, DATA, D> {
    button: BTN,
    active_high: bool,
    indicator: IndicatorLed<LED>,
    bar: LedBar<CLK, DATA, D>,
}

impl<BTN, LED, CLK, DATA, D> HardwareAdapter<BTN, LED, CLK, DATA, D>
where
    BTN: InputPin,
    LED: OutputPin,
    CLK: OutputPin,
    DATA: OutputPin,
    D: DelayNs,
{
    /// Take ownership of the pins.  The indicator starts switched off.
    pub fn new(
        button: BTN,
        indicator: LED,
        bar_clock: CLK,
        bar_data: DATA,
        delay: D,
        config: &TimerConfig,
    ) -> Self {
        let mut indicator = IndicatorLed::new(indicator);
        if let Err(e) = indicator.off() {
            warn!("Button LED init failed: {}", e);
        }
        Self {
            button,
            active_high: config.button_active_high,
            indicator,
            bar: LedBar::new(bar_clock, bar_data, delay, config.bar_green_to_red),
        }
    }

    pub fn indicator(&self) -> &IndicatorLed<LED> {
        &self.indicator
    }

    pub fn bar(&self) -> &LedBar<CLK, DATA, D> {
        &self.bar
    }
}

// ── ButtonPort implementation ─────────────────────────────────

impl<BTN, LED, CLK, DATA, D> ButtonPort for HardwareAdapter<BTN, LED, CLK, DATA, D>
where
    BTN: InputPin,
    LED: OutputPin,
    CLK: OutputPin,
    DATA: OutputPin,
    D: DelayNs,
{
    fn read_raw_level(&mut self) -> bool {
        match self.button.is_high() {
            Ok(high) => high == self.active_high,
            Err(_) => {
                warn!("Button: {}, treating as released", GpioError::ReadFailed);
                false
            }
        }
    }

    fn set_led_state(&mut self, on: bool) {
        if let Err(e) = self.indicator.set(on) {
            warn!("Button LED write failed: {}", e);
        }
    }
}

// ── LedBarPort implementation ─────────────────────────────────

impl<BTN, LED, CLK, DATA, D> LedBarPort for HardwareAdapter<BTN, LED, CLK, DATA, D>
where
    BTN: InputPin,
    LED: OutputPin,
    CLK: OutputPin,
    DATA: OutputPin,
    D: DelayNs,
{
    fn set_level(&mut self, level: u8) {
        if let Err(e) = self.bar.set_level(level) {
            warn!("LED bar level {} failed: {}", level, e);
        }
    }

    fn set_leds(&mut self, levels: &[u8; BAR_SEGMENTS]) {
        if let Err(e) = self.bar.set_leds(levels) {
            warn!("LED bar frame failed: {}", e);
        }
    }
}
