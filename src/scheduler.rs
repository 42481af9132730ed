//! One-shot lifecycle script.
//!
//! Drives start/stop of the scanners from wall-clock offsets, the way an
//! operator would toggle them.  The script notifies a
//! [`LifecycleDelegate`] when an entry fires; the control loop implements
//! the delegate.
//!
//! ```text
//!   armed at t0
//!     │
//!     ├── t0 + 10 s ──▶ "demo-stop"  ──▶ LifecycleCommand::Stop
//!     │
//!     └── t0 + 14 s ──▶ "demo-start" ──▶ LifecycleCommand::Start
//! ```
//!
//! Entries fire once, in order of their offsets, on the first tick at or
//! after their due time.

use crate::app::ports::{LifecycleCommand, LifecycleDelegate};
use log::info;

// ═══════════════════════════════════════════════════════════════
//  Script entries
// ═══════════════════════════════════════════════════════════════

/// A single scripted command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptEntry {
    /// Human-readable label (e.g., "demo-stop").
    pub label: &'static str,
    /// Seconds after the script is armed.
    pub after_secs: f64,
    pub command: LifecycleCommand,
}

/// Maximum number of entries in one script (stack-allocated).
const MAX_ENTRIES: usize = 4;

/// Seconds from arming until the demo stops the scanners.
pub const DEMO_STOP_AFTER_SECS: f64 = 10.0;

/// Seconds from the demo stop until the scanners are restarted.
pub const DEMO_RESTART_DELAY_SECS: f64 = 4.0;

// ═══════════════════════════════════════════════════════════════
//  Script engine
// ═══════════════════════════════════════════════════════════════

/// Internal bookkeeping for a live entry.
#[derive(Debug, Clone, Copy)]
struct Slot {
    entry: ScriptEntry,
    fired: bool,
}

/// The lifecycle script.
pub struct LifecycleScript {
    slots: [Option<Slot>; MAX_ENTRIES],
    /// Time the script was armed; set on the first tick if not given.
    armed_at: Option<f64>,
}

impl Default for LifecycleScript {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleScript {
    pub fn new() -> Self {
        Self {
            slots: [None; MAX_ENTRIES],
            armed_at: None,
        }
    }

    /// Stop after 10 s, start again 4 s later.
    pub fn demo() -> Self {
        let mut script = Self::new();
        script.add(ScriptEntry {
            label: "demo-stop",
            after_secs: DEMO_STOP_AFTER_SECS,
            command: LifecycleCommand::Stop,
        });
        script.add(ScriptEntry {
            label: "demo-start",
            after_secs: DEMO_STOP_AFTER_SECS + DEMO_RESTART_DELAY_SECS,
            command: LifecycleCommand::Start,
        });
        script
    }

    /// Add an entry.  Returns the slot index, or `None` if full.
    pub fn add(&mut self, entry: ScriptEntry) -> Option<usize> {
        let (i, slot) = self
            .slots
            .iter_mut()
            .enumerate()
            .find(|(_, s)| s.is_none())?;
        info!(
            "LifecycleScript: added '{}' at +{}s (slot {})",
            entry.label, entry.after_secs, i
        );
        *slot = Some(Slot {
            entry,
            fired: false,
        });
        Some(i)
    }

    /// Fix the origin all offsets are measured from.
    pub fn arm(&mut self, now_secs: f64) {
        self.armed_at = Some(now_secs);
    }

    pub fn armed_at(&self) -> Option<f64> {
        self.armed_at
    }

    /// Fire every due entry.  Call once per control cycle.
    ///
    /// Several entries falling due on the same tick fire in order of
    /// their offsets.
    pub fn tick(&mut self, now_secs: f64, delegate: &mut dyn LifecycleDelegate) {
        let origin = *self.armed_at.get_or_insert(now_secs);
        let elapsed = now_secs - origin;

        loop {
            let next = self
                .slots
                .iter_mut()
                .flatten()
                .filter(|s| !s.fired && elapsed >= s.entry.after_secs)
                .min_by(|a, b| a.entry.after_secs.total_cmp(&b.entry.after_secs));
            let Some(slot) = next else {
                break;
            };
            slot.fired = true;
            info!(
                "LifecycleScript: '{}' fired (+{}s): {:?}",
                slot.entry.label, slot.entry.after_secs, slot.entry.command
            );
            delegate.on_lifecycle(slot.entry.label, slot.entry.command);
        }
    }

    /// Entries not yet fired.
    pub fn pending_count(&self) -> usize {
        self.slots.iter().flatten().filter(|s| !s.fired).count()
    }

    pub fn is_finished(&self) -> bool {
        self.pending_count() == 0
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    /// Test delegate that records fired commands.
    struct RecordingDelegate {
        fires: Vec<(String, LifecycleCommand)>,
    }

    impl RecordingDelegate {
        fn new() -> Self {
            Self { fires: Vec::new() }
        }
    }

    impl LifecycleDelegate for RecordingDelegate {
        fn on_lifecycle(&mut self, label: &str, command: LifecycleCommand) {
            self.fires.push((label.to_string(), command));
        }
    }

    #[test]
    fn demo_stops_then_restarts() {
        let mut script = LifecycleScript::demo();
        let mut delegate = RecordingDelegate::new();

        script.tick(100.0, &mut delegate);
        script.tick(109.9, &mut delegate);
        assert!(delegate.fires.is_empty());

        script.tick(110.0, &mut delegate);
        assert_eq!(delegate.fires.len(), 1);
        assert_eq!(delegate.fires[0], ("demo-stop".to_string(), LifecycleCommand::Stop));

        script.tick(113.9, &mut delegate);
        assert_eq!(delegate.fires.len(), 1);

        script.tick(114.0, &mut delegate);
        assert_eq!(delegate.fires.len(), 2);
        assert_eq!(delegate.fires[1].1, LifecycleCommand::Start);
        assert!(script.is_finished());
    }

    #[test]
    fn entries_fire_once() {
        let mut script = LifecycleScript::demo();
        let mut delegate = RecordingDelegate::new();
        script.arm(0.0);
        for k in 0..100 {
            script.tick(f64::from(k), &mut delegate);
        }
        assert_eq!(delegate.fires.len(), 2);
    }

    #[test]
    fn late_tick_fires_overdue_entries_in_order() {
        let mut script = LifecycleScript::demo();
        let mut delegate = RecordingDelegate::new();
        script.arm(0.0);
        script.tick(60.0, &mut delegate);
        assert_eq!(
            delegate.fires.iter().map(|f| f.1).collect::<Vec<_>>(),
            vec![LifecycleCommand::Stop, LifecycleCommand::Start]
        );
    }

    #[test]
    fn first_tick_arms_the_script() {
        let mut script = LifecycleScript::new();
        let mut delegate = RecordingDelegate::new();
        assert_eq!(script.armed_at(), None);
        script.tick(5.0, &mut delegate);
        assert_eq!(script.armed_at(), Some(5.0));
    }

    #[test]
    fn add_fails_when_full() {
        let mut script = LifecycleScript::new();
        let entry = ScriptEntry {
            label: "x",
            after_secs: 1.0,
            command: LifecycleCommand::Start,
        };
        for i in 0..MAX_ENTRIES {
            assert_eq!(script.add(entry), Some(i));
        }
        assert_eq!(script.add(entry), None);
        assert_eq!(script.pending_count(), MAX_ENTRIES);
    }
}
