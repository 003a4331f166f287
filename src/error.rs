//! Unified error types for the BarTimer firmware.
//!
//! The control core (debouncer, FSM, state behaviours) never fails: every
//! anomaly there is a silent no-op.  Errors only exist at the edges —
//! configuration overrides and GPIO access — and all of them funnel into
//! the single `Copy` enum below so the boot path can propagate them with `?`.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A configuration value failed range validation.
    Config(&'static str),
    /// A configuration override was not valid JSON for [`TimerConfig`](crate::config::TimerConfig).
    ConfigParse,
    /// A pin read or write failed.
    Gpio(GpioError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::ConfigParse => write!(f, "config: malformed JSON override"),
            Self::Gpio(e) => write!(f, "gpio: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// GPIO errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioError {
    /// Reading an input pin returned an error.
    ReadFailed,
    /// Driving an output pin returned an error.
    WriteFailed,
}

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed => write!(f, "pin read failed"),
            Self::WriteFailed => write!(f, "pin write failed"),
        }
    }
}

impl From<GpioError> for Error {
    fn from(e: GpioError) -> Self {
        Self::Gpio(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
