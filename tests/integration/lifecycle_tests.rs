//! Integration tests for the stop/restart lifecycle demo.

use moorefsm::adapters::time::ManualClock;
use moorefsm::app::ports::{LifecycleCommand, TimeSource};
use moorefsm::app::service::ControlLoop;
use moorefsm::config::SystemConfig;
use moorefsm::fsm::Activity;
use moorefsm::scanner::Light;

use crate::mock_hw::{MockDiagnostics, MockStrip};

const CYCLE_SECS: f64 = 0.02;

struct Rig {
    app: ControlLoop,
    clock: ManualClock,
    diag: MockDiagnostics,
    strip: MockStrip,
}

impl Rig {
    fn new(config: &SystemConfig) -> Self {
        Self {
            app: ControlLoop::new(config).unwrap(),
            clock: ManualClock::new(0.0),
            diag: MockDiagnostics::new(),
            strip: MockStrip::new(),
        }
    }

    fn run_until(&mut self, until_secs: f64) {
        while self.clock.now_secs() < until_secs {
            self.app.cycle(&self.clock, &mut self.diag, &mut self.strip);
            self.clock.advance(CYCLE_SECS);
        }
    }

    fn knight_rider(&self) -> Activity<Light> {
        self.app.scanner("knight_rider").unwrap().current()
    }
}

#[test]
fn demo_stops_after_ten_seconds() {
    let mut rig = Rig::new(&SystemConfig::default());
    rig.run_until(9.9);
    assert!(rig.knight_rider().is_active());

    rig.diag.clear();
    rig.run_until(10.1);
    assert!(rig.app.scanners().iter().all(|s| !s.is_active()));
    assert!(!rig.diag.history("FSM exit action knight_rider").is_empty());
    assert!(!rig.diag.history("FSM exit action imposter").is_empty());
}

#[test]
fn stopped_scanners_freeze_the_strip() {
    let mut rig = Rig::new(&SystemConfig::default());
    rig.run_until(10.5);
    let frozen = rig.strip.last_frame().unwrap().to_vec();
    rig.diag.clear();

    rig.run_until(13.9);
    assert!(rig.strip.frames.iter().rev().take(100).all(|f| *f == frozen));
    assert_eq!(rig.diag.count_prefix("FSM steady-state action"), 0);
    assert_eq!(rig.diag.count_prefix("FSM entry action"), 0);
}

#[test]
fn demo_restarts_four_seconds_after_stop_in_light1() {
    let mut rig = Rig::new(&SystemConfig::default());
    rig.run_until(13.9);
    assert_eq!(rig.knight_rider(), Activity::Inactive);

    rig.diag.clear();
    // One cycle past the restart.
    rig.run_until(14.03);
    assert!(rig.knight_rider().is_active());
    assert_eq!(
        rig.diag.history("FSM entry action knight_rider").first(),
        Some(&"Light1")
    );
    assert!(rig.app.script().unwrap().is_finished());
}

#[test]
fn scanners_keep_running_after_the_script_ends() {
    let mut rig = Rig::new(&SystemConfig::default());
    rig.run_until(20.0);
    assert!(rig.knight_rider().is_active());
    let before = rig.app.transition_count();
    rig.run_until(22.0);
    assert!(rig.app.transition_count() > before);
}

#[test]
fn manual_stop_and_start_without_script() {
    let config = SystemConfig {
        lifecycle_demo: false,
        ..SystemConfig::default()
    };
    let mut rig = Rig::new(&config);
    rig.run_until(0.35);
    // Bins 0..3 seen: Light1 → Light5.
    assert_eq!(rig.knight_rider(), Activity::Active(Light::Light5));

    rig.app.handle_command(LifecycleCommand::Stop, &mut rig.diag);
    assert_eq!(rig.knight_rider(), Activity::Inactive);
    rig.run_until(10.45);
    assert_eq!(rig.knight_rider(), Activity::Inactive);

    rig.app.handle_command(LifecycleCommand::Start, &mut rig.diag);
    assert_eq!(rig.knight_rider(), Activity::Active(Light::Light1));
    assert!(rig.app.script().is_none());
}
