//! Integration tests for the button → debouncer → FSM → ports pipeline.
//!
//! These run on the host (x86_64) and drive the full [`AppService`] at the
//! control-loop rate against recording mocks, without any real hardware.

use bartimer::app::events::AppEvent;
use bartimer::config::TimerConfig;
use bartimer::drivers::button::Event;
use bartimer::fsm::StateId;

use crate::mock_hw::{HwCall, Rig, fast_config};

/// Click once from Off and wait for Program.
fn into_program(rig: &mut Rig) {
    rig.click();
    assert_eq!(rig.app.state(), Some(StateId::Startup));
    assert!(rig.run_until(StateId::Program, 2000).is_some());
}

/// Program `clicks + 1` segments and let the selection time out.
fn into_timer(rig: &mut Rig, clicks: usize) {
    into_program(rig);
    for _ in 0..clicks {
        rig.click();
    }
    assert!(rig.run_until(StateId::Timer, 6000).is_some());
}

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn start_enters_off_with_dark_outputs() {
    let rig = Rig::new(TimerConfig::default());
    assert_eq!(rig.app.state(), Some(StateId::Off));
    assert_eq!(rig.hw.calls, vec![HwCall::Level(0), HwCall::Indicator(false)]);
    assert_eq!(rig.sink.events, vec![AppEvent::Started(StateId::Off)]);
}

#[test]
fn button_noise_does_not_wake_the_timer() {
    let mut rig = Rig::new(TimerConfig::default());
    for _ in 0..20 {
        rig.hold(true, 30);
        rig.hold(false, 30);
    }
    assert_eq!(rig.app.state(), Some(StateId::Off));
    assert!(rig.sink.transitions().is_empty());
}

// ── Off → Startup → Program ───────────────────────────────────

#[test]
fn press_enters_startup_and_lights_indicator() {
    let mut rig = Rig::new(TimerConfig::default());
    rig.hold(true, 100);

    assert_eq!(rig.app.state(), Some(StateId::Startup));
    assert!(rig.hw.indicator_on());
    assert!(rig.sink.events.contains(&AppEvent::ButtonEvent(Event::Pressed)));
    assert_eq!(rig.sink.transitions(), vec![(StateId::Off, StateId::Startup)]);
}

#[test]
fn startup_fills_bar_then_enters_program() {
    let mut rig = Rig::new(TimerConfig::default());
    rig.click();
    let mark = rig.hw.calls.len();

    let waited = rig.run_until(StateId::Program, 2000).unwrap_or(u32::MAX);
    assert!(waited <= 1500, "startup took {}ms", waited);

    let levels = rig.hw.levels_since(mark);
    let (entry, fill) = levels.split_last().unwrap();
    assert!(fill.windows(2).all(|w| w[0] <= w[1]), "fill must not shrink");
    assert!(fill.iter().all(|&l| l <= 10));
    assert_eq!(fill.last(), Some(&10));
    // Program seeds the bar with one segment.
    assert_eq!(*entry, 1);
}

// ── Program → Timer ───────────────────────────────────────────

#[test]
fn presses_select_segments_and_timeout_arms_timer() {
    let mut rig = Rig::new(fast_config());
    into_program(&mut rig);
    let mark = rig.hw.calls.len();

    rig.click();
    rig.click();
    assert!(rig.run_until(StateId::Timer, 6000).is_some());

    let levels = rig.hw.levels_since(mark);
    assert_eq!(&levels[..2], &[2, 3]);
    // Idle selection blinks before the timer is armed.
    assert!(levels.contains(&0));

    assert_eq!(rig.app.budget().as_ms(), 3000);
    let changed = rig
        .sink
        .events
        .iter()
        .position(|e| *e == AppEvent::StateChanged { from: StateId::Program, to: StateId::Timer })
        .unwrap();
    assert_eq!(
        rig.sink.events[changed + 1],
        AppEvent::TimerArmed { segments: 3, budget_ms: 3000 }
    );
}

#[test]
fn selection_wraps_after_ten_segments() {
    let mut rig = Rig::new(fast_config());
    into_program(&mut rig);
    let mark = rig.hw.calls.len();

    for _ in 0..10 {
        rig.click();
    }

    assert_eq!(rig.hw.levels_since(mark), vec![2, 3, 4, 5, 6, 7, 8, 9, 10, 1]);
    assert_eq!(rig.app.state(), Some(StateId::Program));
}

#[test]
fn untouched_program_arms_single_segment() {
    let mut rig = Rig::new(TimerConfig::default());
    into_timer(&mut rig, 0);
    assert_eq!(rig.app.budget().as_ms(), rig.app.config().bar_time_ms());
}

// ── Timer → Wait ──────────────────────────────────────────────

#[test]
fn timer_counts_up_then_finishes() {
    let mut rig = Rig::new(fast_config());
    into_timer(&mut rig, 2);
    let mark = rig.hw.calls.len();

    let waited = rig.run_until(StateId::Wait, 4000).unwrap_or(u32::MAX);
    assert!(waited > 3000, "timer finished early after {}ms", waited);

    let levels = rig.hw.levels_since(mark);
    // Last entry is Wait clearing the bar.
    let (clear, progress) = levels.split_last().unwrap();
    assert_eq!(*clear, 0);
    assert!(progress.windows(2).all(|w| w[0] <= w[1]));
    assert!(progress.iter().all(|&l| l <= 10));
    assert!(progress.last().copied().unwrap_or(0) >= 8);
    // Redraws are throttled.
    assert!(progress.len() <= 8, "{} redraws", progress.len());

    assert_eq!(rig.sink.events.last(), Some(&AppEvent::TimerFinished));
}

// ── Wait ──────────────────────────────────────────────────────

#[test]
fn wait_sweeps_until_pressed() {
    let mut rig = Rig::new(fast_config());
    into_timer(&mut rig, 0);
    assert!(rig.run_until(StateId::Wait, 2000).is_some());
    let mark = rig.hw.calls.len();

    rig.hold(false, 3000);
    let frames = rig.hw.frames_since(mark);
    assert!(frames.len() >= 25);
    for frame in &frames {
        assert_eq!(frame.iter().filter(|&&b| b == 0xFF).count(), 1);
    }
    // Head reaches both ends over three seconds of sweeping.
    assert!(frames.iter().any(|f| f[9] == 0xFF));
    assert!(frames[1..].iter().any(|f| f[0] == 0xFF));
    assert_eq!(rig.app.state(), Some(StateId::Wait));

    rig.hold(true, 100);
    assert_eq!(rig.app.state(), Some(StateId::Startup));
}

// ── Long press ────────────────────────────────────────────────

#[test]
fn long_press_from_timer_switches_off() {
    let mut rig = Rig::new(TimerConfig::default());
    into_timer(&mut rig, 0);

    rig.hold(true, 3200);
    assert_eq!(rig.app.state(), Some(StateId::Off));
    assert!(!rig.hw.indicator_on());
    assert!(rig.sink.events.contains(&AppEvent::ButtonEvent(Event::LongPress)));

    // Releasing after the long press must not restart anything.
    rig.hold(false, 200);
    assert_eq!(rig.app.state(), Some(StateId::Off));

    rig.click();
    assert_eq!(rig.app.state(), Some(StateId::Startup));
}

#[test]
fn long_press_from_off_passes_through_startup() {
    let mut rig = Rig::new(TimerConfig::default());
    rig.hold(true, 3200);

    assert_eq!(
        rig.sink.transitions(),
        vec![
            (StateId::Off, StateId::Startup),
            (StateId::Startup, StateId::Program),
            (StateId::Program, StateId::Off),
        ]
    );
    let long_presses = rig
        .sink
        .events
        .iter()
        .filter(|e| **e == AppEvent::ButtonEvent(Event::LongPress))
        .count();
    assert_eq!(long_presses, 1);
}

// ── Whole cycle ───────────────────────────────────────────────

#[test]
fn full_cycle_survives_clock_wrap() {
    let mut rig = Rig::starting_at(fast_config(), u32::MAX - 2000);
    into_timer(&mut rig, 1);
    assert!(rig.run_until(StateId::Wait, 3000).is_some());
    rig.click();
    assert_eq!(rig.app.state(), Some(StateId::Startup));

    let journal: Vec<(StateId, StateId)> = rig
        .app
        .recent_transitions()
        .map(|t| (t.from, t.to))
        .collect();
    assert_eq!(
        journal,
        vec![
            (StateId::Off, StateId::Startup),
            (StateId::Startup, StateId::Program),
            (StateId::Program, StateId::Timer),
            (StateId::Timer, StateId::Wait),
            (StateId::Wait, StateId::Startup),
        ]
    );
    assert_eq!(rig.sink.transitions(), journal);
}
