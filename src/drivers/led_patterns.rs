//! Pure LED-bar pattern generators.
//!
//! Every function here maps elapsed time (or a cursor) to a [`BarFrame`]
//! or a segment count.  Nothing touches hardware; the state handlers
//! write the results into the FSM context and the service pushes them to
//! the bar driver.
//!
//! ## Patterns
//!
//! | Pattern        | Used by  | Description                                  |
//! |----------------|----------|----------------------------------------------|
//! | Level          | all      | first `n` segments full, rest off            |
//! | Startup fill   | Startup  | one more segment every 100 ms                |
//! | Blink          | Program  | selection on/off at a fixed half-period      |
//! | Progress       | Timer    | elapsed share of the budget over 10 segments |
//! | Sweep + trail  | Wait     | bouncing head with a halving fade behind it  |

use crate::config::BAR_SEGMENTS;

/// Per-segment brightness, index 0 first.
pub type BarFrame = [u8; BAR_SEGMENTS];

/// Full brightness for one segment.
pub const SEGMENT_FULL: u8 = 0xFF;

/// Index of the last segment.
pub const LAST_SEGMENT: u8 = (BAR_SEGMENTS - 1) as u8;

/// Each trail step divides the previous brightness by this.
pub const TRAIL_DECAY_DIVISOR: u8 = 2;

/// All segments off.
pub const BAR_OFF: BarFrame = [0; BAR_SEGMENTS];

/// Light the first `level` segments at full brightness.  Clamps to the bar.
pub fn level_frame(level: u8) -> BarFrame {
    let lit = usize::from(level).min(BAR_SEGMENTS);
    let mut frame = BAR_OFF;
    frame[..lit].fill(SEGMENT_FULL);
    frame
}

/// Self-test fill: segment count after `elapsed_ms` in Startup.
pub fn startup_fill_level(elapsed_ms: u32) -> u8 {
    (elapsed_ms.saturating_add(10) / 100).min(BAR_SEGMENTS as u32) as u8
}

/// Segments lit after `elapsed_ms` of a `total_ms` countdown.
pub fn progress_level(elapsed_ms: u32, total_ms: u32) -> u8 {
    if total_ms == 0 {
        return BAR_SEGMENTS as u8;
    }
    let level = u64::from(elapsed_ms) * BAR_SEGMENTS as u64 / u64::from(total_ms);
    level.min(BAR_SEGMENTS as u64) as u8
}

/// Square-wave phase: `true` for the first half-period, `false` for the next.
pub fn blink_on(elapsed_ms: u32, half_period_ms: u32) -> bool {
    (elapsed_ms / half_period_ms.max(1)) % 2 == 0
}

// ── Sweep ─────────────────────────────────────────────────────

/// Bouncing head for the Wait animation.  The head never leaves
/// `0..=LAST_SEGMENT` and reverses exactly when it lands on either end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SweepCursor {
    head: u8,
    dir: i8,
}

impl Default for SweepCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl SweepCursor {
    pub const fn new() -> Self {
        Self { head: 0, dir: 1 }
    }

    pub fn head(&self) -> u8 {
        self.head
    }

    /// Direction of travel, `1` or `-1`.
    pub fn direction(&self) -> i8 {
        self.dir
    }

    /// Move one segment and bounce off the ends.
    pub fn advance(&mut self) {
        let next = (i16::from(self.head) + i16::from(self.dir)).clamp(0, i16::from(LAST_SEGMENT));
        self.head = next as u8;
        if self.head == LAST_SEGMENT {
            self.dir = -1;
        } else if self.head == 0 {
            self.dir = 1;
        }
    }

    /// Render the head with its fading trail.
    pub fn frame(&self) -> BarFrame {
        sweep_trail(self.head, self.dir)
    }
}

/// Full-brightness `head` with a trail walking away from the direction of
/// travel.  Brightness divides by [`TRAIL_DECAY_DIVISOR`] per step until it
/// reaches zero; the walk bounces off both ends like the head does, and a
/// segment that is already lit is never overwritten.
pub fn sweep_trail(head: u8, travel_dir: i8) -> BarFrame {
    let last = i16::from(LAST_SEGMENT);
    let mut frame = BAR_OFF;
    let mut pos = i16::from(head.min(LAST_SEGMENT));
    let mut dir: i16 = if travel_dir < 0 { 1 } else { -1 };
    let mut level = SEGMENT_FULL;

    while level > 0 {
        let slot = &mut frame[pos as usize];
        if *slot == 0 {
            *slot = level;
        }

        pos += dir;
        if pos <= 0 {
            pos = 0;
            dir = 1;
        } else if pos >= last {
            pos = last;
            dir = -1;
        }

        level /= TRAIL_DECAY_DIVISOR;
    }

    frame
}
