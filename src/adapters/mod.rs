//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements        | Connects to                |
//! |----------------|-------------------|----------------------------|
//! | `time`         | TimeSource        | `Instant` / manual clock   |
//! | `diagnostics`  | DiagnosticsSink   | Log output / in-memory map |
//! | `strip`        | LedStripPort      | In-memory / logged frames  |

pub mod diagnostics;
pub mod strip;
pub mod time;
