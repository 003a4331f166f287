//! BarTimer Firmware — Main Entry Point
//!
//! Single polling loop around the hexagonal core.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                   Adapters (outer ring)                 │
//! │                                                         │
//! │  HardwareAdapter        LogEventSink     MonotonicClock │
//! │  (Button + LedBar)      (EventSink)      (ClockPort)    │
//! │                                                         │
//! │  ─────────────── Port Trait Boundary ───────────────    │
//! │                                                         │
//! │  ┌───────────────────────────────────────────────────┐  │
//! │  │           AppService (pure logic)                 │  │
//! │  │  SwitchInput · FSM (Off/Startup/Program/Timer/Wait)│ │
//! │  └───────────────────────────────────────────────────┘  │
//! │                                                         │
//! │  Watchdog (fed once per iteration)                      │
//! └─────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_svc::hal::delay::{Ets, FreeRtos};
use esp_idf_svc::hal::gpio::{PinDriver, Pull};
use esp_idf_svc::hal::prelude::Peripherals;
use log::info;

use bartimer::adapters::hardware::HardwareAdapter;
use bartimer::adapters::log_sink::LogEventSink;
use bartimer::adapters::time::MonotonicClock;
use bartimer::app::service::AppService;
use bartimer::config::TimerConfig;
use bartimer::drivers::watchdog::Watchdog;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  BarTimer v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration (defaults or build-time override) ────
    let config = TimerConfig::resolve(option_env!("BARTIMER_CONFIG_JSON"));

    // ── 3. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let pins = peripherals.pins;

    // Button on GPIO4 (pulled down, HIGH = pressed), its LED on GPIO5,
    // LED bar DCKI on GPIO6 and DI on GPIO7.
    let mut button = PinDriver::input(pins.gpio4)?;
    button.set_pull(if config.button_active_high { Pull::Down } else { Pull::Up })?;
    let indicator = PinDriver::output(pins.gpio5)?;
    let bar_clock = PinDriver::output(pins.gpio6)?;
    let bar_data = PinDriver::output(pins.gpio7)?;

    let mut hw = HardwareAdapter::new(button, indicator, bar_clock, bar_data, Ets, &config);
    let clock = MonotonicClock::new();
    let mut sink = LogEventSink::new();

    // ── 4. Watchdog ───────────────────────────────────────────
    let watchdog = Watchdog::new(config.watchdog_timeout_ms);

    // ── 5. Control loop ───────────────────────────────────────
    let period_ms = config.control_loop_interval_ms;
    let mut app = AppService::new(config);
    app.start(&clock, &mut hw, &mut sink);
    info!("System ready. Polling every {}ms.", period_ms);

    loop {
        app.tick(&clock, &mut hw, &mut sink);
        watchdog.feed();
        FreeRtos::delay_ms(period_ms);
    }
}
