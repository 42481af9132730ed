//! Clock quantizer: wall-clock seconds → cyclic bin index.
//!
//! ```text
//!   t (s) ──▶ floor(t · f) ──▶ mod N ──▶ bin ∈ [0, N)
//!
//!   f = 10, N = 14:
//!   t   0.00 0.10 0.20 … 1.30 1.40 1.50
//!   bin  0    1    2   …  13   0    1
//! ```
//!
//! The bin is the only event that drives FSM transitions.  Truncation
//! (not rounding) keeps the value constant for the whole quantum, so two
//! evaluations inside the same 1/f seconds see the same bin and a
//! transition guard can never fire twice for one quantum.

use crate::error::{ConfigError, Result};

/// Pure quantization: `floor(t * speed_factor) mod periods`.
///
/// Uses Euclidean remainder so the result stays in `[0, periods)` even for
/// a negative `t`.  A non-finite product maps to bin 0.  `periods` must be
/// non-zero; [`Quantizer`] guarantees that for the engine.
pub fn quantize(t: f64, speed_factor: f64, periods: u32) -> u32 {
    let ticks = (t * speed_factor).floor();
    if !ticks.is_finite() {
        return 0;
    }
    // i64 covers ~292 years at 1 GHz, far beyond any process lifetime.
    (ticks as i64).rem_euclid(i64::from(periods)) as u32
}

/// Validated quantizer parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantizer {
    speed_factor: f64,
    periods: u32,
}

impl Quantizer {
    /// Fails fast on a non-positive / non-finite speed factor or zero periods.
    pub fn new(speed_factor: f64, periods: u32) -> Result<Self> {
        if !speed_factor.is_finite() || speed_factor <= 0.0 {
            return Err(ConfigError::InvalidSpeedFactor.into());
        }
        if periods == 0 {
            return Err(ConfigError::ZeroPeriods.into());
        }
        Ok(Self {
            speed_factor,
            periods,
        })
    }

    /// Bin index for wall-clock time `t` (seconds).
    pub fn bin(&self, t: f64) -> u32 {
        quantize(t, self.speed_factor, self.periods)
    }

    pub fn speed_factor(&self) -> f64 {
        self.speed_factor
    }

    pub fn periods(&self) -> u32 {
        self.periods
    }

    /// Length of one quantum in seconds (`1/f`).
    pub fn quantum_secs(&self) -> f64 {
        1.0 / self.speed_factor
    }

    /// Length of one full bin cycle in seconds (`N/f`).
    pub fn cycle_secs(&self) -> f64 {
        f64::from(self.periods) / self.speed_factor
    }
}
