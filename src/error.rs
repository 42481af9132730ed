//! Unified error types for the FSM engine and its LED surroundings.
//!
//! Every failure in this crate happens at construction time: an invalid
//! quantizer, an ambiguous or malformed transition table, or an LED
//! layout whose views overlap.  Once an engine exists, `tick`, `start`
//! and `stop` cannot fail.  All variants are `Copy` so they can be
//! passed around without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level error
// ---------------------------------------------------------------------------

/// Every fallible constructor in the crate funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Construction parameters are invalid.
    Config(ConfigError),
    /// Two rules share the same `(state, bin)` key.
    ///
    /// `state` is the source state's name, `bin` the shared bin index.
    AmbiguousTransition { state: &'static str, bin: u32 },
    /// The LED buffer could not be split into the requested views.
    Layout(LayoutError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::AmbiguousTransition { state, bin } => {
                write!(f, "ambiguous transition: more than one rule for ({state}, bin {bin})")
            }
            Self::Layout(e) => write!(f, "layout: {e}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Speed factor is zero, negative, or not finite.
    InvalidSpeedFactor,
    /// Period count is zero.
    ZeroPeriods,
    /// The state set passed to the table builder is empty.
    EmptyStateSet,
    /// The same state appears twice in the state set.
    DuplicateState(&'static str),
    /// A rule names a state that is not part of the state set.
    UnknownState(&'static str),
    /// A rule's bin index is not below the period count.
    BinOutOfRange { bin: u32, periods: u32 },
    /// A rule maps a state to itself and self-loops are not allowed.
    SelfLoop(&'static str),
    /// More rules than the fixed-capacity table can hold.
    TooManyRules { max: usize },
    /// More states than the fixed-capacity state set can hold.
    TooManyStates { max: usize },
    /// The initial state is not part of the table's state set.
    InitialStateUnknown(&'static str),
    /// Quantizer and table disagree on the number of periods.
    PeriodMismatch { quantizer: u32, table: u32 },
    /// An LED view is too short to show every state.
    ViewTooShort { len: usize, needed: usize },
    /// Control loop period is zero.
    ZeroCyclePeriod,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSpeedFactor => write!(f, "speed factor must be finite and > 0"),
            Self::ZeroPeriods => write!(f, "period count must be > 0"),
            Self::EmptyStateSet => write!(f, "state set is empty"),
            Self::DuplicateState(s) => write!(f, "state '{s}' listed twice"),
            Self::UnknownState(s) => write!(f, "state '{s}' is not in the state set"),
            Self::BinOutOfRange { bin, periods } => {
                write!(f, "bin {bin} out of range for {periods} periods")
            }
            Self::SelfLoop(s) => write!(f, "self-loop on '{s}' not allowed"),
            Self::TooManyRules { max } => write!(f, "more than {max} rules"),
            Self::TooManyStates { max } => write!(f, "more than {max} states"),
            Self::InitialStateUnknown(s) => {
                write!(f, "initial state '{s}' is not in the state set")
            }
            Self::PeriodMismatch { quantizer, table } => write!(
                f,
                "quantizer has {quantizer} periods but table was built for {table}"
            ),
            Self::ViewTooShort { len, needed } => {
                write!(f, "LED view has {len} pixels, needs {needed}")
            }
            Self::ZeroCyclePeriod => write!(f, "control loop period must be > 0 ms"),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Layout errors
// ---------------------------------------------------------------------------

/// Errors from splitting the LED arena into views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    /// No placements were given.
    EmptyLayout,
    /// Two placements share at least one pixel.
    Overlap { first: &'static str, second: &'static str },
    /// A placement reaches past the end of the buffer.
    OutOfBounds { view: &'static str, len: usize },
    /// The same view name was requested twice.
    DuplicateView(&'static str),
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLayout => write!(f, "no views defined"),
            Self::Overlap { first, second } => {
                write!(f, "views '{first}' and '{second}' overlap")
            }
            Self::OutOfBounds { view, len } => {
                write!(f, "view '{view}' exceeds buffer of {len} pixels")
            }
            Self::DuplicateView(v) => write!(f, "view '{v}' defined twice"),
        }
    }
}

impl From<LayoutError> for Error {
    fn from(e: LayoutError) -> Self {
        Self::Layout(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Crate-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
