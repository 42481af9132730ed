//! LED strip output adapters.
//!
//! There is no hardware on the host.  [`MemoryStrip`] keeps the last frame
//! it was sent; [`LogStrip`] renders each changed frame as a line of
//! characters at `debug` level.

use log::debug;

use crate::app::ports::LedStripPort;
use crate::drivers::led_patterns::Rgb;

/// Holds the most recent frame.
#[derive(Debug, Default, Clone)]
pub struct MemoryStrip {
    frame: Vec<Rgb>,
    writes: u64,
}

impl MemoryStrip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame(&self) -> &[Rgb] {
        &self.frame
    }

    pub fn write_count(&self) -> u64 {
        self.writes
    }
}

impl LedStripPort for MemoryStrip {
    fn write(&mut self, pixels: &[Rgb]) {
        self.frame.clear();
        self.frame.extend_from_slice(pixels);
        self.writes += 1;
    }
}

/// Logs each distinct frame as text, one character per pixel.
#[derive(Debug, Default)]
pub struct LogStrip {
    last: Vec<Rgb>,
}

impl LogStrip {
    pub fn new() -> Self {
        Self::default()
    }
}

/// `#` lit, `+` slightly dim, `.` dim, space off.
pub fn render_frame(pixels: &[Rgb]) -> String {
    pixels
        .iter()
        .map(|&(r, g, b)| match r.max(g).max(b) {
            0 => ' ',
            1..=120 => '.',
            121..=200 => '+',
            _ => '#',
        })
        .collect()
}

impl LedStripPort for LogStrip {
    fn write(&mut self, pixels: &[Rgb]) {
        if self.last == pixels {
            return;
        }
        debug!("STRIP |{}|", render_frame(pixels));
        self.last.clear();
        self.last.extend_from_slice(pixels);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::led_patterns::{BLACK, RED};

    #[test]
    fn memory_strip_keeps_last_frame() {
        let mut strip = MemoryStrip::new();
        strip.write(&[RED, BLACK]);
        strip.write(&[BLACK, RED, RED]);
        assert_eq!(strip.frame(), &[BLACK, RED, RED]);
        assert_eq!(strip.write_count(), 2);
    }

    #[test]
    fn frame_rendering() {
        let frame = [BLACK, (120, 0, 0), (180, 0, 0), RED, (180, 0, 0), (120, 0, 0), BLACK];
        assert_eq!(render_frame(&frame), " .+#+. ");
    }

    #[test]
    fn log_strip_remembers_the_last_distinct_frame() {
        let mut strip = LogStrip::new();
        strip.write(&[RED, BLACK]);
        strip.write(&[RED, BLACK]);
        assert_eq!(strip.last, vec![RED, BLACK]);
        strip.write(&[BLACK]);
        assert_eq!(strip.last, vec![BLACK]);
    }
}
