//! Knight Rider style LED scanner built on the Moore-like FSM engine.
//!
//! Eight light states, one per pixel of an 8-pixel view.  The clock is
//! quantized into 14 bins; the scanner sweeps up on bins 0..6 and back
//! down on bins 7..13:
//!
//! ```text
//!   bin:    0  1  2  3  4  5  6 │ 7  8  9 10 11 12 13
//!   from:  L1 L2 L3 L4 L5 L6 L7 │ L8 L7 L6 L5 L4 L3 L2
//!   to:    L2 L3 L4 L5 L6 L7 L8 │ L7 L6 L5 L4 L3 L2 L1
//! ```
//!
//! Every steady tick repaints the view with the current light smeared
//! over its neighbours and publishes a diagnostics entry.

use core::fmt::Write as _;

use log::info;

use crate::app::ports::DiagnosticsSink;
use crate::clock::Quantizer;
use crate::config::{ScannerConfig, ScannerName};
use crate::drivers::led_patterns::{Rgb, smeared_scanner};
use crate::drivers::led_strip::{LedBuffer, LedViewMut, ViewHandle};
use crate::error::{ConfigError, Result};
use crate::fsm::{Activity, FsmState, MooreFsm, Rule, StateActions, Transition, TransitionTable};

/// Bins in one full up-and-back sweep.
pub const SCANNER_PERIODS: u32 = 14;

// ---------------------------------------------------------------------------
// States
// ---------------------------------------------------------------------------

/// One lit pixel position.  The ordinal is the pixel index in the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Light {
    Light1,
    Light2,
    Light3,
    Light4,
    Light5,
    Light6,
    Light7,
    Light8,
}

impl Light {
    pub const COUNT: usize = 8;

    pub const ALL: [Light; Self::COUNT] = [
        Self::Light1,
        Self::Light2,
        Self::Light3,
        Self::Light4,
        Self::Light5,
        Self::Light6,
        Self::Light7,
        Self::Light8,
    ];
}

impl FsmState for Light {
    fn ordinal(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        match self {
            Self::Light1 => "Light1",
            Self::Light2 => "Light2",
            Self::Light3 => "Light3",
            Self::Light4 => "Light4",
            Self::Light5 => "Light5",
            Self::Light6 => "Light6",
            Self::Light7 => "Light7",
            Self::Light8 => "Light8",
        }
    }
}

// ---------------------------------------------------------------------------
// Transition table
// ---------------------------------------------------------------------------

/// The fourteen sweep rules, upward leg first.
pub fn scanner_rules() -> impl Iterator<Item = Rule<Light>> {
    let up = (0..Light::COUNT - 1).map(|k| {
        Rule::new(Light::ALL[k], k as u32, Light::ALL[k + 1])
    });
    let down = (1..Light::COUNT).rev().map(|j| {
        Rule::new(
            Light::ALL[j],
            SCANNER_PERIODS - j as u32,
            Light::ALL[j - 1],
        )
    });
    up.chain(down)
}

/// Validated sweep table for a clock with `periods` bins.
///
/// `periods` may exceed [`SCANNER_PERIODS`]; the extra bins carry no
/// rules, so the light rests at `Light1` for them.
pub fn build_scanner_table(periods: u32) -> Result<TransitionTable<Light>> {
    TransitionTable::builder()
        .states(&Light::ALL)
        .rules(scanner_rules())
        .build(periods)
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

type DiagKey = heapless::String<64>;

fn diag_key(prefix: &str, name: &str) -> DiagKey {
    let mut key = DiagKey::new();
    // Longest prefix (23) + space + a 32-byte `ScannerName` fits in 64,
    // so this write never overflows.
    let _ = write!(key, "{prefix} {name}");
    key
}

/// Renders the scanner onto its view and reports to diagnostics.
pub struct ScannerActions<'a, D: DiagnosticsSink + ?Sized> {
    pub view: LedViewMut<'a>,
    pub diagnostics: &'a mut D,
    pub name: &'a str,
    pub colour: Rgb,
    pub background: Rgb,
}

impl<D: DiagnosticsSink + ?Sized> StateActions<Light> for ScannerActions<'_, D> {
    fn on_entry(&mut self, state: Light) {
        let key = diag_key("FSM entry action", self.name);
        self.diagnostics.publish(&key, state.name());
    }

    fn on_steady(&mut self, state: Light) {
        smeared_scanner(&mut self.view, state.ordinal(), self.colour, self.background);
        let key = diag_key("FSM steady-state action", self.name);
        self.diagnostics.publish(&key, state.name());
    }

    fn on_exit(&mut self, state: Light, _interrupted: bool) {
        let key = diag_key("FSM exit action", self.name);
        self.diagnostics.publish(&key, state.name());
    }
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

/// One scanner instance: engine, view, and colours.
///
/// Instances share nothing, so several can run side by side on disjoint
/// views of the same strip.
#[derive(Debug)]
pub struct Scanner {
    fsm: MooreFsm<Light>,
    view: ViewHandle,
    name: ScannerName,
    colour: Rgb,
    background: Rgb,
    start_immediately: bool,
}

impl Scanner {
    /// Build a stopped scanner owning `view`.
    pub fn new(config: &ScannerConfig, view: ViewHandle) -> Result<Self> {
        config.validate()?;
        if view.len() < Light::COUNT {
            return Err(ConfigError::ViewTooShort {
                len: view.len(),
                needed: Light::COUNT,
            }
            .into());
        }

        let quantizer = Quantizer::new(config.speed_factor, config.periods)?;
        let table = build_scanner_table(config.periods)?;
        let fsm = MooreFsm::new(table, quantizer, Light::Light1)?;

        info!(
            "scanner '{}' on view '{}': f={} N={} colour={:?}",
            config.name,
            view.name(),
            config.speed_factor,
            config.periods,
            config.colour
        );

        Ok(Self {
            fsm,
            view,
            name: config.name.clone(),
            colour: config.colour,
            background: config.background,
            start_immediately: config.start_immediately,
        })
    }

    fn actions<'a, D: DiagnosticsSink + ?Sized>(
        view: &ViewHandle,
        name: &'a str,
        colour: Rgb,
        background: Rgb,
        buffer: &'a mut LedBuffer,
        diagnostics: &'a mut D,
    ) -> ScannerActions<'a, D> {
        ScannerActions {
            view: buffer.view_mut(view),
            diagnostics,
            name,
            colour,
            background,
        }
    }

    pub fn start(&mut self, buffer: &mut LedBuffer, diagnostics: &mut impl DiagnosticsSink) -> bool {
        let mut actions = Self::actions(
            &self.view,
            &self.name,
            self.colour,
            self.background,
            buffer,
            diagnostics,
        );
        self.fsm.start(&mut actions)
    }

    pub fn stop(&mut self, buffer: &mut LedBuffer, diagnostics: &mut impl DiagnosticsSink) -> bool {
        let mut actions = Self::actions(
            &self.view,
            &self.name,
            self.colour,
            self.background,
            buffer,
            diagnostics,
        );
        self.fsm.stop(&mut actions)
    }

    /// Run one control cycle at `now_secs`.
    pub fn tick(
        &mut self,
        now_secs: f64,
        buffer: &mut LedBuffer,
        diagnostics: &mut impl DiagnosticsSink,
    ) -> Option<Transition<Light>> {
        let mut actions = Self::actions(
            &self.view,
            &self.name,
            self.colour,
            self.background,
            buffer,
            diagnostics,
        );
        self.fsm.tick(now_secs, &mut actions)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn view(&self) -> &ViewHandle {
        &self.view
    }

    pub fn current(&self) -> Activity<Light> {
        self.fsm.current()
    }

    pub fn is_active(&self) -> bool {
        self.fsm.is_active()
    }

    /// Whether the control loop should start this scanner on its first cycle.
    pub fn start_immediately(&self) -> bool {
        self.start_immediately
    }

    pub fn fsm(&self) -> &MooreFsm<Light> {
        &self.fsm
    }
}
