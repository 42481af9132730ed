//! Per-state actions driven by the engine.
//!
//! The engine owns *when* an action runs; the implementor owns *what* it
//! does (render a pattern, publish a diagnostic, record a call).
//!
//! ```text
//!   start ─▶ on_entry(S0) ─▶ on_steady(S0) … on_steady(S0)
//!        ─▶ on_exit(S0, false) ─▶ on_entry(S1) ─▶ on_steady(S1) …
//!   stop  ─▶ on_exit(Sk, true)
//! ```

/// Entry / steady-state / exit hooks for a state machine over `S`.
///
/// Ordering guaranteed by [`MooreFsm`](super::MooreFsm):
///
/// - `on_entry` runs once per activation, before any `on_steady` for it.
/// - `on_steady` runs once per tick while the state is current, including
///   the tick on which it was entered.
/// - `on_exit` runs once per activation, after its last `on_steady` and
///   before the next state's `on_entry`.  `interrupted` is `true` only when
///   the exit was forced by `stop`.
pub trait StateActions<S> {
    fn on_entry(&mut self, state: S);
    fn on_steady(&mut self, state: S);
    fn on_exit(&mut self, state: S, interrupted: bool);
}

impl<S, A: StateActions<S> + ?Sized> StateActions<S> for &mut A {
    fn on_entry(&mut self, state: S) {
        (**self).on_entry(state);
    }

    fn on_steady(&mut self, state: S) {
        (**self).on_steady(state);
    }

    fn on_exit(&mut self, state: S, interrupted: bool) {
        (**self).on_exit(state, interrupted);
    }
}

/// Does nothing.  For callers that only care about the state sequence.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoActions;

impl<S> StateActions<S> for NoActions {
    fn on_entry(&mut self, _state: S) {}
    fn on_steady(&mut self, _state: S) {}
    fn on_exit(&mut self, _state: S, _interrupted: bool) {}
}
