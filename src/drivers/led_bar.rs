//! 10-segment LED bar driver (MY9221 constant-current controller).
//!
//! ## Wire protocol
//!
//! Two push-pull outputs, DCKI (clock) and DI (data).  The MY9221 samples
//! DI on **both** clock edges, so the clock line simply toggles once per
//! bit and has no idle level.
//!
//! ```text
//!  frame = CMD(0x0000) · CH[0..10] · PAD · PAD · LATCH
//!  word  = 16 bits, MSB first, DI set before DCKI toggles
//!  LATCH = DI low ≥ 220 µs → 4 DI pulses → 1 µs → DCKI pulse
//! ```
//!
//! Each channel word carries the segment brightness in its low byte.
//! The two padding words fill the chip's 12 channels.
//!
//! Generic over `embedded-hal` 1.0 pins and delay, so the same driver runs
//! on ESP-IDF `PinDriver`s and on recording mocks in host tests.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::BAR_SEGMENTS;
use crate::drivers::led_patterns::{BarFrame, level_frame};
use crate::error::{GpioError, Result};

/// Command word: 8-bit grayscale, internal oscillator, default timings.
const CMD_WORD: u16 = 0x0000;
/// Unused channels after the 10 segments.
const PAD_WORDS: usize = 2;
/// DI must idle low this long before the latch pulses.
const LATCH_SETUP_US: u32 = 240;
const LATCH_PULSES: usize = 4;

pub struct LedBar<CLK, DATA, D> {
    clock: CLK,
    data: DATA,
    delay: D,
    /// Tracks the current DCKI level; every bit flips it.
    clock_high: bool,
    green_to_red: bool,
    current: BarFrame,
}

impl<CLK, DATA, D> LedBar<CLK, DATA, D>
where
    CLK: OutputPin,
    DATA: OutputPin,
    D: DelayNs,
{
    pub fn new(clock: CLK, data: DATA, delay: D, green_to_red: bool) -> Self {
        Self {
            clock,
            data,
            delay,
            clock_high: false,
            green_to_red,
            current: [0; BAR_SEGMENTS],
        }
    }

    /// Light the first `level` segments at full brightness.
    pub fn set_level(&mut self, level: u8) -> Result<()> {
        self.set_leds(&level_frame(level))
    }

    /// Set every segment's brightness in one latched update.
    pub fn set_leds(&mut self, levels: &BarFrame) -> Result<()> {
        self.send_word(CMD_WORD)?;
        for i in 0..BAR_SEGMENTS {
            // Channel 0 is the far end of the module unless reversed.
            let segment = if self.green_to_red { i } else { BAR_SEGMENTS - 1 - i };
            self.send_word(u16::from(levels[segment]))?;
        }
        for _ in 0..PAD_WORDS {
            self.send_word(0)?;
        }
        self.latch()?;
        self.current = *levels;
        Ok(())
    }

    /// Last frame successfully latched into the controller.
    pub fn current(&self) -> &BarFrame {
        &self.current
    }

    /// Release the pins and delay.
    pub fn release(self) -> (CLK, DATA, D) {
        (self.clock, self.data, self.delay)
    }

    fn send_word(&mut self, word: u16) -> Result<()> {
        for bit in (0..16).rev() {
            set(&mut self.data, word & (1 << bit) != 0)?;
            self.clock_high = !self.clock_high;
            set(&mut self.clock, self.clock_high)?;
        }
        Ok(())
    }

    fn latch(&mut self) -> Result<()> {
        set(&mut self.data, false)?;
        self.delay.delay_us(LATCH_SETUP_US);
        for _ in 0..LATCH_PULSES {
            set(&mut self.data, true)?;
            set(&mut self.data, false)?;
        }
        self.delay.delay_us(1);
        set(&mut self.clock, true)?;
        set(&mut self.clock, false)?;
        self.clock_high = false;
        Ok(())
    }
}

fn set<P: OutputPin>(pin: &mut P, high: bool) -> Result<()> {
    let res = if high { pin.set_high() } else { pin.set_low() };
    res.map_err(|_| GpioError::WriteFailed.into())
}
