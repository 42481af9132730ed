//! Declarative transition table: `(source, bin) → target`.
//!
//! Built once through [`TransitionTableBuilder`] and never modified
//! afterwards.  Lookups go through a fixed-capacity hash map keyed by the
//! `(state, bin)` pair, so the per-tick guard check is O(1) and never
//! allocates.
//!
//! ```text
//!   ┌───────────────┬──────┬───────────┐
//!   │ source        │ bin  │ target    │
//!   ├───────────────┼──────┼───────────┤
//!   │ Light1        │  0   │ Light2    │
//!   │ Light2        │  1   │ Light3    │
//!   │ …             │  …   │ …         │
//!   │ Light2        │ 13   │ Light1    │
//!   └───────────────┴──────┴───────────┘
//! ```
//!
//! A bin value may be reused across different source states; only the full
//! `(source, bin)` key must be unique.

use heapless::FnvIndexMap;
use log::{debug, warn};

use super::FsmState;
use crate::error::{ConfigError, Error, Result};

/// Maximum number of rules in one table (must be a power of two).
pub const MAX_RULES: usize = 64;

/// Maximum number of states in one state set.
pub const MAX_STATES: usize = 32;

/// Lookup key: the current state plus the quantized clock bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RuleKey<S> {
    pub state: S,
    pub bin: u32,
}

/// One row of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule<S> {
    pub from: S,
    pub bin: u32,
    pub to: S,
}

impl<S> Rule<S> {
    pub const fn new(from: S, bin: u32, to: S) -> Self {
        Self { from, bin, to }
    }
}

/// Immutable, validated transition table.
#[derive(Debug, Clone)]
pub struct TransitionTable<S: FsmState> {
    states: heapless::Vec<S, MAX_STATES>,
    rules: FnvIndexMap<RuleKey<S>, S, MAX_RULES>,
    periods: u32,
}

impl<S: FsmState> TransitionTable<S> {
    pub fn builder() -> TransitionTableBuilder<S> {
        TransitionTableBuilder::new()
    }

    /// Target for `(state, bin)`, or `None` to remain in `state`.
    pub fn lookup(&self, state: S, bin: u32) -> Option<S> {
        self.rules.get(&RuleKey { state, bin }).copied()
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The state set, in the order it was declared.
    pub fn states(&self) -> &[S] {
        &self.states
    }

    pub fn contains_state(&self, state: S) -> bool {
        self.states.contains(&state)
    }

    /// Period count the bins were validated against.
    pub fn periods(&self) -> u32 {
        self.periods
    }

    /// All rules, in insertion order.
    pub fn rules(&self) -> impl Iterator<Item = Rule<S>> + '_ {
        self.rules.iter().map(|(key, to)| Rule {
            from: key.state,
            bin: key.bin,
            to: *to,
        })
    }

    /// States with no outgoing rule.  Once entered, such a state is never
    /// left until `stop`.
    pub fn stalled_states(&self) -> heapless::Vec<S, MAX_STATES> {
        self.states
            .iter()
            .copied()
            .filter(|s| !self.rules.keys().any(|k| k.state == *s))
            .collect()
    }
}

/// Collects states and rules, then validates everything in [`build`](Self::build).
pub struct TransitionTableBuilder<S> {
    states: Vec<S>,
    rules: Vec<Rule<S>>,
    allow_self_loops: bool,
}

impl<S: FsmState> TransitionTableBuilder<S> {
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            rules: Vec::new(),
            allow_self_loops: false,
        }
    }

    /// Declare the state set.  Replaces any earlier declaration.
    pub fn states(mut self, states: &[S]) -> Self {
        self.states = states.to_vec();
        self
    }

    /// Add one rule: in `from`, when the clock is in `bin`, go to `to`.
    pub fn rule(mut self, from: S, bin: u32, to: S) -> Self {
        self.rules.push(Rule { from, bin, to });
        self
    }

    /// Add several rules at once.
    pub fn rules(mut self, rules: impl IntoIterator<Item = Rule<S>>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Accept rules whose target equals their source.  Off by default; the
    /// engine treats such a rule as "remain in state" either way.
    pub fn allow_self_loops(mut self, allow: bool) -> Self {
        self.allow_self_loops = allow;
        self
    }

    /// Validate and freeze the table for a clock with `periods` bins.
    pub fn build(self, periods: u32) -> Result<TransitionTable<S>> {
        if periods == 0 {
            return Err(ConfigError::ZeroPeriods.into());
        }
        if self.states.is_empty() {
            return Err(ConfigError::EmptyStateSet.into());
        }

        let mut states: heapless::Vec<S, MAX_STATES> = heapless::Vec::new();
        for state in &self.states {
            if states.contains(state) {
                return Err(ConfigError::DuplicateState(state.name()).into());
            }
            states
                .push(*state)
                .map_err(|_| ConfigError::TooManyStates { max: MAX_STATES })?;
        }

        let mut map: FnvIndexMap<RuleKey<S>, S, MAX_RULES> = FnvIndexMap::new();
        for rule in &self.rules {
            for s in [rule.from, rule.to] {
                if !states.contains(&s) {
                    return Err(ConfigError::UnknownState(s.name()).into());
                }
            }
            if rule.bin >= periods {
                return Err(ConfigError::BinOutOfRange {
                    bin: rule.bin,
                    periods,
                }
                .into());
            }
            if rule.from == rule.to && !self.allow_self_loops {
                return Err(ConfigError::SelfLoop(rule.from.name()).into());
            }

            let key = RuleKey {
                state: rule.from,
                bin: rule.bin,
            };
            if map.contains_key(&key) {
                return Err(Error::AmbiguousTransition {
                    state: rule.from.name(),
                    bin: rule.bin,
                });
            }
            map.insert(key, rule.to)
                .map_err(|_| ConfigError::TooManyRules { max: MAX_RULES })?;
            debug!(
                "table: {} @ bin {} -> {}",
                rule.from.name(),
                rule.bin,
                rule.to.name()
            );
        }

        let table = TransitionTable {
            states,
            rules: map,
            periods,
        };
        for s in table.stalled_states() {
            warn!("table: state '{}' has no outgoing rule", s.name());
        }
        Ok(table)
    }
}

impl<S: FsmState> Default for TransitionTableBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}
