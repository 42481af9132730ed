//! MooreFSM library.
//!
//! A time-quantized Moore-like finite state machine engine and the
//! Knight Rider LED scanner built on it.  Transitions are a declarative
//! table of `(state, clock bin) → next state`, checked once per control
//! cycle.
//!
//! Exposes the pure-logic modules for integration testing and for the
//! host demo binary.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod clock;
pub mod config;
pub mod drivers;
pub mod error;
pub mod fsm;
pub mod scanner;
pub mod scheduler;

pub use error::{ConfigError, Error, LayoutError, Result};
