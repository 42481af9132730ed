//! Time-quantized Moore-like finite state machine engine.
//!
//! Transitions are data, not code:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  MooreFsm                                                │
//! │                                                          │
//! │   now ──▶ Quantizer ──▶ bin                              │
//! │                          │                               │
//! │   current ───────────────┼──▶ TransitionTable            │
//! │      ▲                   ▼      (state, bin) → target    │
//! │      │            Some(target ≠ current)?                │
//! │      │                   │                               │
//! │      └── on_exit ◀───────┘──▶ on_entry ──▶ on_steady     │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine quantizes the clock, looks up the rule for the
//! **current** state and that bin, and if one exists runs `on_exit` for the
//! current state, moves the pointer, and runs `on_entry` for the target.
//! `on_steady` then runs once for whatever state is current.  At most one
//! transition fires per tick.  A missing rule means "remain in state"; it
//! is the common case, not an error.
//!
//! The machine starts [`Activity::Inactive`].  [`MooreFsm::start`] enters
//! the initial state, [`MooreFsm::stop`] interrupts whatever state is
//! current.  The table survives any number of stop/start cycles.

pub mod actions;
pub mod table;

use core::fmt::Debug;
use core::hash::Hash;

use log::{debug, info};

use crate::clock::Quantizer;
use crate::error::{ConfigError, Result};

pub use actions::{NoActions, StateActions};
pub use table::{Rule, RuleKey, TransitionTable, TransitionTableBuilder};

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// A member of a fixed, ordered state set.
///
/// Usually a fieldless enum.  `ordinal` is the state's position in the
/// set (0..K-1); `name` is used for logging and diagnostics.
pub trait FsmState: Copy + Eq + Hash + Debug {
    fn ordinal(self) -> usize;
    fn name(self) -> &'static str;
}

/// The engine's current position, including the "not running" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Activity<S> {
    /// The machine is stopped.  No rules are evaluated.
    Inactive,
    /// The machine is running in `S`.
    Active(S),
}

impl<S: Copy> Activity<S> {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    pub fn state(&self) -> Option<S> {
        match self {
            Self::Active(s) => Some(*s),
            Self::Inactive => None,
        }
    }
}

/// A committed rule transition, returned by [`MooreFsm::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition<S> {
    pub from: S,
    pub to: S,
    /// The bin that fired the rule.
    pub bin: u32,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
///
/// Owns the transition table, the quantizer, and the current state.  The
/// state-specific behaviour lives in a [`StateActions`] implementation
/// passed into every lifecycle call, so one engine type serves any output.
#[derive(Debug, Clone)]
pub struct MooreFsm<S: FsmState> {
    table: TransitionTable<S>,
    quantizer: Quantizer,
    initial: S,
    current: Activity<S>,
    /// Ticks processed while active (wraps at u64::MAX).
    cycles: u64,
    /// Value of `cycles` when the current state was entered.
    state_entry_cycle: u64,
    /// Rule transitions committed since construction.
    transitions: u64,
}

impl<S: FsmState> MooreFsm<S> {
    /// Construct an inactive engine.
    ///
    /// Fails if `initial` is not in the table's state set or the
    /// quantizer's period count differs from the one the table was
    /// validated against.
    pub fn new(table: TransitionTable<S>, quantizer: Quantizer, initial: S) -> Result<Self> {
        if !table.contains_state(initial) {
            return Err(ConfigError::InitialStateUnknown(initial.name()).into());
        }
        if quantizer.periods() != table.periods() {
            return Err(ConfigError::PeriodMismatch {
                quantizer: quantizer.periods(),
                table: table.periods(),
            }
            .into());
        }
        Ok(Self {
            table,
            quantizer,
            initial,
            current: Activity::Inactive,
            cycles: 0,
            state_entry_cycle: 0,
            transitions: 0,
        })
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Enter the initial state if the machine is inactive.
    ///
    /// Returns `true` if the machine was activated, `false` if it was
    /// already running (no-op).
    pub fn start(&mut self, actions: &mut impl StateActions<S>) -> bool {
        if self.current.is_active() {
            return false;
        }
        info!("FSM starting in state: {}", self.initial.name());
        self.current = Activity::Active(self.initial);
        self.state_entry_cycle = self.cycles;
        actions.on_entry(self.initial);
        true
    }

    /// Interrupt the current state and go inactive.
    ///
    /// Runs `on_exit(current, interrupted = true)`.  Returns `false` if the
    /// machine was already inactive (no-op).
    pub fn stop(&mut self, actions: &mut impl StateActions<S>) -> bool {
        let Activity::Active(state) = self.current else {
            return false;
        };
        info!("FSM stopping from state: {}", state.name());
        actions.on_exit(state, true);
        self.current = Activity::Inactive;
        true
    }

    /// `stop` followed by `start`: always lands in the initial state.
    pub fn restart(&mut self, actions: &mut impl StateActions<S>) {
        self.stop(actions);
        self.start(actions);
    }

    // -----------------------------------------------------------------------
    // Per-cycle evaluation
    // -----------------------------------------------------------------------

    /// Advance the FSM by one control cycle at wall-clock time `now_secs`.
    ///
    /// 1. Inactive → nothing happens.
    /// 2. Quantize `now_secs` and look up `(current, bin)`.
    /// 3. On a match with a different target:
    ///    `on_exit(current)` → update pointer → `on_entry(target)`.
    /// 4. `on_steady` for the (possibly new) current state.
    ///
    /// Returns the committed transition, if any.
    pub fn tick(
        &mut self,
        now_secs: f64,
        actions: &mut impl StateActions<S>,
    ) -> Option<Transition<S>> {
        let Activity::Active(state) = self.current else {
            return None;
        };
        self.cycles = self.cycles.wrapping_add(1);

        let bin = self.quantizer.bin(now_secs);
        let fired = match self.table.lookup(state, bin) {
            Some(target) if target != state => {
                self.transition(state, target, bin, actions);
                Some(Transition {
                    from: state,
                    to: target,
                    bin,
                })
            }
            _ => None,
        };

        if let Activity::Active(current) = self.current {
            actions.on_steady(current);
        }
        fired
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn current(&self) -> Activity<S> {
        self.current
    }

    /// The running state, or `None` while inactive.
    pub fn current_state(&self) -> Option<S> {
        self.current.state()
    }

    pub fn is_active(&self) -> bool {
        self.current.is_active()
    }

    pub fn initial_state(&self) -> S {
        self.initial
    }

    pub fn table(&self) -> &TransitionTable<S> {
        &self.table
    }

    pub fn quantizer(&self) -> &Quantizer {
        &self.quantizer
    }

    /// Total ticks processed while active.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Ticks since the current state was entered.
    pub fn cycles_in_state(&self) -> u64 {
        self.cycles.wrapping_sub(self.state_entry_cycle)
    }

    /// Rule transitions committed since construction (start/stop excluded).
    pub fn transition_count(&self) -> u64 {
        self.transitions
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, from: S, to: S, bin: u32, actions: &mut impl StateActions<S>) {
        debug!("FSM bin {} fired rule", bin);
        info!("FSM transition: {} -> {}", from.name(), to.name());

        actions.on_exit(from, false);

        self.current = Activity::Active(to);
        self.state_entry_cycle = self.cycles;
        self.transitions = self.transitions.wrapping_add(1);

        actions.on_entry(to);
    }
}

// ---------------------------------------------------------------------------
// Shared test fixtures
// ---------------------------------------------------------------------------
