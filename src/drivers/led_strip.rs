//! Addressable LED strip buffer, split into exclusive views.
//!
//! One [`LedBuffer`] holds every pixel of the physical strip.  At startup
//! [`LedLayout::split`] carves it into named, non-overlapping
//! [`ViewHandle`]s.  A handle is not `Clone`, so each slice of the strip
//! has exactly one owner and one writer.
//!
//! ```text
//!   pixel  0 ─────── 7   8 ────── 15  …  40 ────── 47  48 ───── 55
//!          │   top   │   │  main   │     │ scanner  │  │ imposter │
//!          └─────────┘   └─────────┘     └──────────┘  └──────────┘
//!                  ▲ each range owned by exactly one ViewHandle
//! ```
//!
//! A placement whose `first` is greater than its `last` is reversed:
//! view index 0 maps to the higher physical pixel.

use log::debug;

use super::led_patterns::{BLACK, Rgb};
use crate::error::{LayoutError, Result};

// ---------------------------------------------------------------------------
// Pixel writer
// ---------------------------------------------------------------------------

/// Something a pattern can paint into, indexed from 0.
pub trait PixelWriter {
    fn len(&self) -> usize;

    /// Set one pixel.  Out-of-range indices are ignored.
    fn set(&mut self, index: usize, colour: Rgb);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// Placements and handles
// ---------------------------------------------------------------------------

/// Requested pixel range for a view, both ends inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewPlacement {
    pub name: &'static str,
    pub first: usize,
    pub last: usize,
}

impl ViewPlacement {
    pub const fn new(name: &'static str, first: usize, last: usize) -> Self {
        Self { name, first, last }
    }

    pub fn len(&self) -> usize {
        self.first.abs_diff(self.last) + 1
    }

    pub fn is_reversed(&self) -> bool {
        self.first > self.last
    }

    fn low(&self) -> usize {
        self.first.min(self.last)
    }

    fn high(&self) -> usize {
        self.first.max(self.last)
    }

    fn overlaps(&self, other: &Self) -> bool {
        self.low() <= other.high() && other.low() <= self.high()
    }
}

/// Exclusive right to write one slice of an [`LedBuffer`].
///
/// Only [`LedLayout::split`] creates handles.
#[derive(Debug, PartialEq, Eq)]
pub struct ViewHandle {
    name: &'static str,
    start: usize,
    len: usize,
    reversed: bool,
}

impl ViewHandle {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Lowest physical pixel covered by this view.
    pub fn start(&self) -> usize {
        self.start
    }
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

/// Validates placements and issues view handles.
pub struct LedLayout;

impl LedLayout {
    /// Allocate a blank buffer of `strip_len` pixels and one handle per
    /// placement, in the order given.
    ///
    /// Fails on an empty placement list, a duplicate view name, a
    /// placement reaching past `strip_len`, or two overlapping placements.
    pub fn split(
        strip_len: usize,
        placements: &[ViewPlacement],
    ) -> Result<(LedBuffer, Vec<ViewHandle>)> {
        if placements.is_empty() {
            return Err(LayoutError::EmptyLayout.into());
        }

        for (i, p) in placements.iter().enumerate() {
            if p.high() >= strip_len {
                return Err(LayoutError::OutOfBounds {
                    view: p.name,
                    len: strip_len,
                }
                .into());
            }
            for q in &placements[..i] {
                if q.name == p.name {
                    return Err(LayoutError::DuplicateView(p.name).into());
                }
                if q.overlaps(p) {
                    return Err(LayoutError::Overlap {
                        first: q.name,
                        second: p.name,
                    }
                    .into());
                }
            }
        }

        let handles = placements
            .iter()
            .map(|p| {
                debug!(
                    "led view '{}': pixels {}..={}{}",
                    p.name,
                    p.low(),
                    p.high(),
                    if p.is_reversed() { " (reversed)" } else { "" }
                );
                ViewHandle {
                    name: p.name,
                    start: p.low(),
                    len: p.len(),
                    reversed: p.is_reversed(),
                }
            })
            .collect();

        Ok((LedBuffer::new(strip_len), handles))
    }
}

// ---------------------------------------------------------------------------
// Buffer
// ---------------------------------------------------------------------------

/// The full strip's pixel data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedBuffer {
    pixels: Vec<Rgb>,
}

impl LedBuffer {
    pub fn new(len: usize) -> Self {
        Self {
            pixels: vec![BLACK; len],
        }
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Every pixel in physical order.
    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Borrow the slice owned by `handle` for writing.
    ///
    /// A handle issued for a longer strip yields an empty view rather than
    /// touching pixels outside this buffer.
    pub fn view_mut(&mut self, handle: &ViewHandle) -> LedViewMut<'_> {
        let pixels = self
            .pixels
            .get_mut(handle.start..handle.start + handle.len)
            .unwrap_or_default();
        LedViewMut {
            pixels,
            reversed: handle.reversed,
        }
    }

    /// Read the slice owned by `handle`, in view order.
    pub fn view(&self, handle: &ViewHandle) -> Vec<Rgb> {
        let slice = self
            .pixels
            .get(handle.start..handle.start + handle.len)
            .unwrap_or_default();
        if handle.reversed {
            slice.iter().rev().copied().collect()
        } else {
            slice.to_vec()
        }
    }
}

/// Mutable window onto one view's pixels.
pub struct LedViewMut<'a> {
    pixels: &'a mut [Rgb],
    reversed: bool,
}

impl LedViewMut<'_> {
    fn physical(&self, index: usize) -> usize {
        if self.reversed {
            self.pixels.len() - 1 - index
        } else {
            index
        }
    }
}

impl PixelWriter for LedViewMut<'_> {
    fn len(&self) -> usize {
        self.pixels.len()
    }

    fn set(&mut self, index: usize, colour: Rgb) {
        if index < self.pixels.len() {
            let at = self.physical(index);
            self.pixels[at] = colour;
        }
    }
}
