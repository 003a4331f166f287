//! Peripheral drivers and pure pattern renderers.

pub mod button;
pub mod indicator;
pub mod led_bar;
pub mod led_patterns;
pub mod watchdog;
