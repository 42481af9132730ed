//! Mock adapters for integration tests.
//!
//! Record every diagnostics entry and every strip frame so tests can
//! assert on the full history without a real dashboard or LED strip.

use moorefsm::app::ports::{DiagnosticsSink, LedStripPort};
use moorefsm::drivers::led_patterns::Rgb;

// ── Diagnostics record ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Published {
    pub key: String,
    pub value: String,
}

pub struct MockDiagnostics {
    pub published: Vec<Published>,
}

#[allow(dead_code)]
impl MockDiagnostics {
    pub fn new() -> Self {
        Self {
            published: Vec::new(),
        }
    }

    /// Values published under `key`, oldest first.
    pub fn history(&self, key: &str) -> Vec<&str> {
        self.published
            .iter()
            .filter(|p| p.key == key)
            .map(|p| p.value.as_str())
            .collect()
    }

    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.published
            .iter()
            .filter(|p| p.key.starts_with(prefix))
            .count()
    }

    pub fn clear(&mut self) {
        self.published.clear();
    }
}

impl DiagnosticsSink for MockDiagnostics {
    fn publish(&mut self, key: &str, value: &str) {
        self.published.push(Published {
            key: key.to_owned(),
            value: value.to_owned(),
        });
    }
}

// ── MockStrip ─────────────────────────────────────────────────

pub struct MockStrip {
    pub frames: Vec<Vec<Rgb>>,
}

#[allow(dead_code)]
impl MockStrip {
    pub fn new() -> Self {
        Self { frames: Vec::new() }
    }

    pub fn last_frame(&self) -> Option<&[Rgb]> {
        self.frames.last().map(Vec::as_slice)
    }

    /// Index of the brightest pixel in `range` of the last frame, if any is lit.
    pub fn lit_pixel(&self, range: core::ops::Range<usize>) -> Option<usize> {
        let frame = self.last_frame()?;
        let slice = frame.get(range.clone())?;
        slice
            .iter()
            .enumerate()
            .filter(|(_, p)| **p != (0, 0, 0))
            .max_by_key(|(_, p)| u16::from(p.0) + u16::from(p.1) + u16::from(p.2))
            .map(|(i, _)| range.start + i)
    }
}

impl LedStripPort for MockStrip {
    fn write(&mut self, pixels: &[Rgb]) {
        self.frames.push(pixels.to_vec());
    }
}
