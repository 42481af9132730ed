//! Integration tests for [`ControlLoop`] with mock diagnostics and strip.

use moorefsm::adapters::time::ManualClock;
use moorefsm::app::service::ControlLoop;
use moorefsm::config::{SystemConfig, ViewRange};
use moorefsm::drivers::led_patterns::{ORANGE, RED};
use moorefsm::fsm::Activity;
use moorefsm::scanner::Light;

use crate::mock_hw::{MockDiagnostics, MockStrip};

const CYCLE_SECS: f64 = 0.02;

fn no_demo() -> SystemConfig {
    SystemConfig {
        lifecycle_demo: false,
        ..SystemConfig::default()
    }
}

/// Run cycles every 20 ms until `until_secs`.
fn run_until(
    app: &mut ControlLoop,
    clock: &ManualClock,
    diag: &mut MockDiagnostics,
    strip: &mut MockStrip,
    until_secs: f64,
) {
    use moorefsm::app::ports::TimeSource;
    while clock.now_secs() < until_secs {
        app.cycle(clock, diag, strip);
        clock.advance(CYCLE_SECS);
    }
}

#[test]
fn one_frame_per_cycle() {
    let mut app = ControlLoop::new(&no_demo()).unwrap();
    let clock = ManualClock::new(0.0);
    let mut diag = MockDiagnostics::new();
    let mut strip = MockStrip::new();

    for _ in 0..10 {
        app.cycle(&clock, &mut diag, &mut strip);
        clock.advance(CYCLE_SECS);
    }
    assert_eq!(strip.frames.len(), 10);
    assert!(strip.frames.iter().all(|f| f.len() == 56));
    assert_eq!(app.cycle_count(), 10);
}

#[test]
fn scanners_only_touch_their_own_views() {
    let mut app = ControlLoop::new(&no_demo()).unwrap();
    let clock = ManualClock::new(0.0);
    let mut diag = MockDiagnostics::new();
    let mut strip = MockStrip::new();

    run_until(&mut app, &clock, &mut diag, &mut strip, 3.0);

    for frame in &strip.frames {
        assert!(frame[..40].iter().all(|p| *p == (0, 0, 0)));
        assert!(frame[40..48].contains(&RED));
        assert!(!frame[40..48].contains(&ORANGE));
        assert!(frame[48..56].contains(&ORANGE));
        assert!(!frame[48..56].contains(&RED));
    }
}

#[test]
fn lit_pixel_tracks_the_state() {
    let mut app = ControlLoop::new(&no_demo()).unwrap();
    let clock = ManualClock::new(0.0);
    let mut diag = MockDiagnostics::new();
    let mut strip = MockStrip::new();

    for _ in 0..200 {
        app.cycle(&clock, &mut diag, &mut strip);
        clock.advance(CYCLE_SECS);
        let kr = app.scanner("knight_rider").unwrap();
        let Activity::Active(light) = kr.current() else {
            panic!("scanner stopped");
        };
        assert_eq!(strip.lit_pixel(40..48), Some(40 + light as usize));
    }
}

#[test]
fn scanners_drift_apart_at_different_speeds() {
    let mut app = ControlLoop::new(&no_demo()).unwrap();
    let clock = ManualClock::new(0.0);
    let mut diag = MockDiagnostics::new();
    let mut strip = MockStrip::new();

    let mut diverged = false;
    for _ in 0..1000 {
        app.cycle(&clock, &mut diag, &mut strip);
        clock.advance(CYCLE_SECS);
        let a = app.scanner("knight_rider").unwrap().current();
        let b = app.scanner("imposter").unwrap().current();
        diverged |= a != b;
    }
    assert!(diverged);
}

#[test]
fn reversed_view_scans_from_the_high_end() {
    let mut config = no_demo();
    config.imposter = None;
    config.layout.knight_rider = ViewRange::new(47, 40);
    let mut app = ControlLoop::new(&config).unwrap();
    let clock = ManualClock::new(0.55); // bin 5: Light1 has no rule
    let mut diag = MockDiagnostics::new();
    let mut strip = MockStrip::new();

    app.cycle(&clock, &mut diag, &mut strip);
    assert_eq!(
        app.scanner("knight_rider").unwrap().current(),
        Activity::Active(Light::Light1)
    );
    assert_eq!(strip.lit_pixel(40..48), Some(47));
}

#[test]
fn diagnostics_are_keyed_per_scanner() {
    let mut app = ControlLoop::new(&no_demo()).unwrap();
    let clock = ManualClock::new(0.0);
    let mut diag = MockDiagnostics::new();
    let mut strip = MockStrip::new();

    run_until(&mut app, &clock, &mut diag, &mut strip, 1.39);

    let kr = diag.history("FSM entry action knight_rider");
    let imp = diag.history("FSM entry action imposter");
    assert_eq!(kr.first(), Some(&"Light1"));
    assert_eq!(imp.first(), Some(&"Light1"));
    // One full sweep: 14 transitions after the initial entry.
    assert_eq!(kr.len(), 15);
    assert_eq!(
        &kr[..9],
        &["Light1", "Light2", "Light3", "Light4", "Light5", "Light6", "Light7", "Light8", "Light7"]
    );
    assert!(diag.count_prefix("FSM steady-state action") > 0);
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let mut config = no_demo();
    config.layout.imposter = ViewRange::new(44, 51);
    assert!(ControlLoop::new(&config).is_err());

    let mut config = no_demo();
    config.scanner.speed_factor = f64::NAN;
    assert!(ControlLoop::new(&config).is_err());
}
