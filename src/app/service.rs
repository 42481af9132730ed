//! Control loop: the hexagonal core.
//!
//! [`ControlLoop`] owns the LED buffer, every scanner, and the optional
//! lifecycle script.  All I/O flows through port traits injected at call
//! sites, making the whole loop testable with in-memory adapters.
//!
//! ```text
//!  TimeSource ──▶ ┌──────────────────────────────┐ ──▶ DiagnosticsSink
//!                 │         ControlLoop           │
//!                 │ before: script · first start  │
//!                 │ tick:   every scanner         │
//!                 │ after:  buffer → strip        │ ──▶ LedStripPort
//!                 └──────────────────────────────┘
//! ```

use log::{debug, info};

use crate::config::{LayoutConfig, SystemConfig};
use crate::drivers::led_strip::{LedBuffer, LedLayout, ViewHandle};
use crate::error::Result;
use crate::fsm::Transition;
use crate::scanner::{Light, Scanner};
use crate::scheduler::LifecycleScript;

use super::ports::{DiagnosticsSink, LedStripPort, LifecycleCommand, LifecycleDelegate, TimeSource};

// ───────────────────────────────────────────────────────────────
// ControlLoop
// ───────────────────────────────────────────────────────────────

/// The periodic loop: before-hooks, scanner ticks, after-hooks.
pub struct ControlLoop {
    scanners: Vec<Scanner>,
    buffer: LedBuffer,
    /// Views reserved in the layout but not driven by a scanner.
    spare_views: Vec<ViewHandle>,
    script: Option<LifecycleScript>,
    booted: bool,
    cycle_count: u64,
    transition_count: u64,
}

impl ControlLoop {
    /// Split the strip, build the scanners, and load the demo script.
    ///
    /// Does **not** start anything; the first [`run_before_cycle`]
    /// starts every scanner configured with `start_immediately` and arms
    /// the script at that cycle's time.
    ///
    /// [`run_before_cycle`]: Self::run_before_cycle
    pub fn new(config: &SystemConfig) -> Result<Self> {
        config.validate()?;
        let layout = &config.layout;
        let (buffer, handles) = LedLayout::split(layout.strip_len(), &layout.placements())?;

        let mut scanners = Vec::new();
        let mut spare_views = Vec::new();
        for handle in handles {
            let scanner_config = match handle.name() {
                LayoutConfig::KNIGHT_RIDER => Some(&config.scanner),
                LayoutConfig::IMPOSTER => config.imposter.as_ref(),
                _ => None,
            };
            match scanner_config {
                Some(c) => scanners.push(Scanner::new(c, handle)?),
                None => spare_views.push(handle),
            }
        }

        info!(
            "ControlLoop: {} scanner(s), {} pixel strip, cycle {} ms",
            scanners.len(),
            buffer.len(),
            config.cycle_period_ms
        );

        Ok(Self {
            scanners,
            buffer,
            spare_views,
            script: config.lifecycle_demo.then(LifecycleScript::demo),
            booted: false,
            cycle_count: 0,
            transition_count: 0,
        })
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one full cycle: before-hooks → scanners → after-hooks.
    pub fn cycle(
        &mut self,
        clock: &impl TimeSource,
        diagnostics: &mut impl DiagnosticsSink,
        strip: &mut impl LedStripPort,
    ) {
        let now = clock.now_secs();
        self.run_before_cycle(now, diagnostics);
        self.tick(now, diagnostics);
        self.run_after_cycle(strip);
    }

    /// First cycle: start `start_immediately` scanners and arm the script.
    /// Every cycle: fire due script entries.
    pub fn run_before_cycle(&mut self, now_secs: f64, diagnostics: &mut impl DiagnosticsSink) {
        if !self.booted {
            self.booted = true;
            for scanner in self.scanners.iter_mut().filter(|s| s.start_immediately()) {
                scanner.start(&mut self.buffer, diagnostics);
            }
            if let Some(script) = &mut self.script {
                script.arm(now_secs);
            }
        }

        if let Some(script) = &mut self.script {
            let mut delegate = ScannerCommands {
                scanners: &mut self.scanners,
                buffer: &mut self.buffer,
                diagnostics,
            };
            script.tick(now_secs, &mut delegate);
        }
    }

    /// Advance every scanner one cycle.  Returns the transitions fired.
    pub fn tick(
        &mut self,
        now_secs: f64,
        diagnostics: &mut impl DiagnosticsSink,
    ) -> Vec<Transition<Light>> {
        self.cycle_count += 1;
        let fired: Vec<_> = self
            .scanners
            .iter_mut()
            .filter_map(|s| s.tick(now_secs, &mut self.buffer, &mut *diagnostics))
            .collect();
        self.transition_count += fired.len() as u64;
        fired
    }

    /// Push the whole buffer to the physical strip.
    pub fn run_after_cycle(&mut self, strip: &mut impl LedStripPort) {
        strip.write(self.buffer.pixels());
    }

    // ── Command handling ──────────────────────────────────────

    /// Apply a lifecycle command to every scanner.
    pub fn handle_command(&mut self, cmd: LifecycleCommand, diagnostics: &mut impl DiagnosticsSink) {
        apply(cmd, &mut self.scanners, &mut self.buffer, diagnostics);
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn scanners(&self) -> &[Scanner] {
        &self.scanners
    }

    pub fn scanner(&self, name: &str) -> Option<&Scanner> {
        self.scanners.iter().find(|s| s.name() == name)
    }

    pub fn buffer(&self) -> &LedBuffer {
        &self.buffer
    }

    /// Hand out a reserved view for some other renderer.
    pub fn take_view(&mut self, name: &str) -> Option<ViewHandle> {
        let pos = self.spare_views.iter().position(|v| v.name() == name)?;
        Some(self.spare_views.swap_remove(pos))
    }

    pub fn script(&self) -> Option<&LifecycleScript> {
        self.script.as_ref()
    }

    /// Total cycles executed since construction.
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    /// Total rule transitions across all scanners.
    pub fn transition_count(&self) -> u64 {
        self.transition_count
    }
}

// ── Internal ──────────────────────────────────────────────────

fn apply(
    cmd: LifecycleCommand,
    scanners: &mut [Scanner],
    buffer: &mut LedBuffer,
    diagnostics: &mut impl DiagnosticsSink,
) {
    for scanner in scanners {
        let changed = match cmd {
            LifecycleCommand::Start => scanner.start(buffer, diagnostics),
            LifecycleCommand::Stop => scanner.stop(buffer, diagnostics),
        };
        debug!("scanner '{}': {:?} (changed={})", scanner.name(), cmd, changed);
    }
}

/// Routes script entries to the scanners.
struct ScannerCommands<'a, D> {
    scanners: &'a mut [Scanner],
    buffer: &'a mut LedBuffer,
    diagnostics: &'a mut D,
}

impl<D: DiagnosticsSink> LifecycleDelegate for ScannerCommands<'_, D> {
    fn on_lifecycle(&mut self, _label: &str, command: LifecycleCommand) {
        apply(command, &mut *self.scanners, &mut *self.buffer, &mut *self.diagnostics);
    }
}
