//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements   | Connects to                  |
//! |------------|--------------|------------------------------|
//! | `hardware` | ButtonPort   | Button input + LED (GPIO)    |
//! |            | LedBarPort   | MY9221 LED bar (GPIO)        |
//! | `log_sink` | EventSink    | Serial log output            |
//! | `time`     | ClockPort    | ESP32 system timer           |

pub mod hardware;
pub mod log_sink;
pub mod time;
