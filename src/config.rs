//! System configuration parameters
//!
//! All tunable parameters for the scanner demo: clock quantization, colours,
//! LED strip layout, and control loop timing.  Serializable as JSON for
//! humans and as postcard bytes for compact storage.

use serde::{Deserialize, Serialize};

use crate::drivers::led_patterns::{BLACK, ORANGE, RED, Rgb};
use crate::drivers::led_strip::{LedLayout, ViewPlacement};
use crate::error::{ConfigError, Result};

/// Scanner identifier used in logs and diagnostics keys.
pub type ScannerName = heapless::String<32>;

fn scanner_name(s: &str) -> ScannerName {
    ScannerName::try_from(s).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

/// One scanner instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Identifier in diagnostics keys, e.g. "FSM entry action <name>"
    pub name: ScannerName,
    /// Quanta per second (`f`)
    pub speed_factor: f64,
    /// Bins per clock cycle (`N`)
    pub periods: u32,
    /// Lit pixel colour
    pub colour: Rgb,
    /// Unlit pixel colour
    pub background: Rgb,
    /// Start on the first control cycle
    pub start_immediately: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            name: scanner_name("knight_rider"),
            speed_factor: 10.0,
            periods: 14,
            colour: RED,
            background: BLACK,
            start_immediately: true,
        }
    }
}

impl ScannerConfig {
    /// The second, slightly slower orange scanner.
    pub fn imposter() -> Self {
        Self {
            name: scanner_name("imposter"),
            speed_factor: 9.9,
            colour: ORANGE,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.speed_factor.is_finite() || self.speed_factor <= 0.0 {
            return Err(ConfigError::InvalidSpeedFactor.into());
        }
        if self.periods == 0 {
            return Err(ConfigError::ZeroPeriods.into());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// LED layout
// ---------------------------------------------------------------------------

/// Inclusive pixel range; `first > last` reverses the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRange {
    pub first: u16,
    pub last: u16,
}

impl ViewRange {
    pub const fn new(first: u16, last: u16) -> Self {
        Self { first, last }
    }
}

/// Reserved locations on the one physical strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub top: ViewRange,
    pub main: ViewRange,
    pub enable_disable: ViewRange,
    pub history_demo: ViewRange,
    pub achieve_hue_goal: ViewRange,
    pub knight_rider: ViewRange,
    pub imposter: ViewRange,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            top: ViewRange::new(0, 7),
            main: ViewRange::new(8, 15),
            enable_disable: ViewRange::new(16, 23),
            history_demo: ViewRange::new(24, 31),
            achieve_hue_goal: ViewRange::new(32, 39),
            knight_rider: ViewRange::new(40, 47),
            imposter: ViewRange::new(48, 55),
        }
    }
}

impl LayoutConfig {
    pub const TOP: &'static str = "top";
    pub const MAIN: &'static str = "main";
    pub const ENABLE_DISABLE: &'static str = "enable_disable";
    pub const HISTORY_DEMO: &'static str = "history_demo";
    pub const ACHIEVE_HUE_GOAL: &'static str = "achieve_hue_goal";
    pub const KNIGHT_RIDER: &'static str = "knight_rider";
    pub const IMPOSTER: &'static str = "imposter";

    /// Every view, in declaration order.
    pub fn placements(&self) -> [ViewPlacement; 7] {
        let p = |name, r: ViewRange| ViewPlacement::new(name, usize::from(r.first), usize::from(r.last));
        [
            p(Self::TOP, self.top),
            p(Self::MAIN, self.main),
            p(Self::ENABLE_DISABLE, self.enable_disable),
            p(Self::HISTORY_DEMO, self.history_demo),
            p(Self::ACHIEVE_HUE_GOAL, self.achieve_hue_goal),
            p(Self::KNIGHT_RIDER, self.knight_rider),
            p(Self::IMPOSTER, self.imposter),
        ]
    }

    /// Pixels needed: highest used index + 1.
    pub fn strip_len(&self) -> usize {
        self.placements()
            .iter()
            .map(|p| p.first.max(p.last) + 1)
            .max()
            .unwrap_or(0)
    }

    /// Views must not overlap.
    pub fn validate(&self) -> Result<()> {
        LedLayout::split(self.strip_len(), &self.placements()).map(|_| ())
    }
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Primary scanner, on the `knight_rider` view
    pub scanner: ScannerConfig,
    /// Second scanner on the `imposter` view, if any
    pub imposter: Option<ScannerConfig>,
    pub layout: LayoutConfig,
    /// Control loop interval (milliseconds)
    pub cycle_period_ms: u32,
    /// Run the stop-after-10 s / restart-4 s-later script
    pub lifecycle_demo: bool,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            scanner: ScannerConfig::default(),
            imposter: Some(ScannerConfig::imposter()),
            layout: LayoutConfig::default(),
            cycle_period_ms: 20, // 50 Hz
            lifecycle_demo: true,
        }
    }
}

impl SystemConfig {
    pub fn validate(&self) -> Result<()> {
        self.scanner.validate()?;
        if let Some(imposter) = &self.imposter {
            imposter.validate()?;
        }
        self.layout.validate()?;
        if self.cycle_period_ms == 0 {
            return Err(ConfigError::ZeroCyclePeriod.into());
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_bytes(&self) -> anyhow::Result<Vec<u8>> {
        Ok(postcard::to_allocvec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let config: Self = postcard::from_bytes(bytes)?;
        config.validate()?;
        Ok(config)
    }
}
