//! Port traits: the hexagonal boundary between the scanner core and the
//! outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlLoop (domain)
//! ```
//!
//! Driven adapters (clocks, diagnostics displays, LED hardware) implement
//! these traits.  The [`ControlLoop`](super::service::ControlLoop) consumes
//! them via generics, so the FSM engine never touches a real clock or strip.

use crate::drivers::led_patterns::Rgb;

// ───────────────────────────────────────────────────────────────
// Time port (driven adapter: clock → domain)
// ───────────────────────────────────────────────────────────────

/// Monotonic wall-clock seconds.  The only input that drives transitions.
pub trait TimeSource {
    fn now_secs(&self) -> f64;
}

// ───────────────────────────────────────────────────────────────
// Diagnostics port (driven adapter: domain → dashboard / log)
// ───────────────────────────────────────────────────────────────

/// Best-effort key/value publishing.
///
/// There is no error path: an adapter that cannot deliver drops the entry.
pub trait DiagnosticsSink {
    fn publish(&mut self, key: &str, value: &str);
}

// ───────────────────────────────────────────────────────────────
// LED strip port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Physical strip output.  Receives the whole buffer once per cycle.
pub trait LedStripPort {
    fn write(&mut self, pixels: &[Rgb]);
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now_secs(&self) -> f64 {
        (**self).now_secs()
    }
}

impl<D: DiagnosticsSink + ?Sized> DiagnosticsSink for &mut D {
    fn publish(&mut self, key: &str, value: &str) {
        (**self).publish(key, value);
    }
}

// ───────────────────────────────────────────────────────────────
// Lifecycle delegate (decouples the script from the scanners)
// ───────────────────────────────────────────────────────────────

/// What a lifecycle script entry asks for when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleCommand {
    Start,
    Stop,
}

/// Callback the [`LifecycleScript`](crate::scheduler::LifecycleScript)
/// invokes when an entry fires.
///
/// The control loop implements this by starting or stopping its scanners;
/// the script itself knows nothing about FSMs.
pub trait LifecycleDelegate {
    fn on_lifecycle(&mut self, label: &str, command: LifecycleCommand);
}
