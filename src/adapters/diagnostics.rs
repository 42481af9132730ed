//! Diagnostics sink adapters.
//!
//! Implements [`DiagnosticsSink`] two ways:
//!
//! - [`LogDiagnostics`] writes each entry to the logger.  Steady-state
//!   entries repeat every cycle, so only value changes are logged.
//! - [`MemoryDiagnostics`] keeps the latest value per key, like a
//!   dashboard would, for tests and the demo's final report.

use std::collections::HashMap;

use log::info;

use crate::app::ports::DiagnosticsSink;

/// Adapter that logs every changed diagnostics entry.
#[derive(Debug, Default)]
pub struct LogDiagnostics {
    last: HashMap<String, String>,
}

impl LogDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DiagnosticsSink for LogDiagnostics {
    fn publish(&mut self, key: &str, value: &str) {
        if self.last.get(key).is_some_and(|v| v == value) {
            return;
        }
        info!("DIAG | {} = {}", key, value);
        self.last.insert(key.to_owned(), value.to_owned());
    }
}

/// Latest value per key.
#[derive(Debug, Default, Clone)]
pub struct MemoryDiagnostics {
    entries: HashMap<String, String>,
    publishes: u64,
}

impl MemoryDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Total `publish` calls, including repeats.
    pub fn publish_count(&self) -> u64 {
        self.publishes
    }

    /// All entries, sorted by key.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let mut all: Vec<_> = self
            .entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        all.sort_unstable();
        all
    }
}

impl DiagnosticsSink for MemoryDiagnostics {
    fn publish(&mut self, key: &str, value: &str) {
        self.publishes += 1;
        match self.entries.get_mut(key) {
            Some(v) => value.clone_into(v),
            None => {
                self.entries.insert(key.to_owned(), value.to_owned());
            }
        }
    }
}
