//! Button indicator LED driver.
//!
//! The push-button carries its own LED on a dedicated digital output.
//! Generic over an `embedded-hal` output pin; on ESP-IDF this is a
//! `PinDriver`, on host a mock.

use embedded_hal::digital::OutputPin;

use crate::error::{GpioError, Result};

pub struct IndicatorLed<P> {
    pin: P,
    on: bool,
}

impl<P: OutputPin> IndicatorLed<P> {
    pub fn new(pin: P) -> Self {
        Self { pin, on: false }
    }

    pub fn set(&mut self, on: bool) -> Result<()> {
        let res = if on { self.pin.set_high() } else { self.pin.set_low() };
        res.map_err(|_| GpioError::WriteFailed)?;
        self.on = on;
        Ok(())
    }

    pub fn off(&mut self) -> Result<()> {
        self.set(false)
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}
