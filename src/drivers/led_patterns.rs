//! LED pattern rendering onto a pixel view.
//!
//! Patterns are stateless: each call repaints the whole view it is given,
//! so a view never shows stale pixels from an earlier state.
//!
//! ## Patterns
//!
//! | Pattern          | Description                                   |
//! |------------------|-----------------------------------------------|
//! | `smeared_scanner`| One bright pixel, neighbours faded by distance|
//!
//! Smear profile around the lit index `i`:
//!
//! ```text
//!   i-2    i-1    i     i+1    i+2
//!   120    180   255    180    120     (brightness out of 255)
//! ```

use super::led_strip::PixelWriter;

/// Colour as (R, G, B) tuple, each 0–255.
pub type Rgb = (u8, u8, u8);

/// Brightness of the pixels directly beside the lit one.
pub const SLIGHTLY_DIM: u8 = 180;

/// Brightness of the pixels two away from the lit one.
pub const DIM: u8 = 120;

/// Scale every channel of `colour` by `brightness / 255`.
pub fn scale(colour: Rgb, brightness: u8) -> Rgb {
    let br = u16::from(brightness);
    let (r, g, b) = colour;
    (
        ((u16::from(r) * br) / 255) as u8,
        ((u16::from(g) * br) / 255) as u8,
        ((u16::from(b) * br) / 255) as u8,
    )
}

/// Light pixel `index` in `foreground`, smear its neighbours, and paint
/// every other pixel `background`.
///
/// Neighbours falling outside the view are skipped, so the smear is
/// clipped at both ends.  An `index` past the end leaves only background.
pub fn smeared_scanner(out: &mut impl PixelWriter, index: usize, foreground: Rgb, background: Rgb) {
    for led in 0..out.len() {
        let colour = match led.abs_diff(index) {
            0 => foreground,
            1 => scale(foreground, SLIGHTLY_DIM),
            2 => scale(foreground, DIM),
            _ => background,
        };
        out.set(led, colour);
    }
}

// ── Well-known colour constants ───────────────────────────────

pub const BLACK: Rgb = (0, 0, 0);
pub const RED: Rgb = (255, 0, 0);
pub const ORANGE: Rgb = (255, 165, 0);
pub const GREEN: Rgb = (0, 255, 0);
pub const BLUE: Rgb = (0, 0, 255);

#[cfg(test)]
mod tests {
    use super::*;

    /// Plain 8-pixel array standing in for a strip view.
    struct Pixels([Rgb; 8]);

    impl PixelWriter for Pixels {
        fn len(&self) -> usize {
            self.0.len()
        }

        fn set(&mut self, index: usize, colour: Rgb) {
            if let Some(p) = self.0.get_mut(index) {
                *p = colour;
            }
        }
    }

    #[test]
    fn scale_endpoints() {
        assert_eq!(scale(RED, 255), RED);
        assert_eq!(scale(RED, 0), BLACK);
        assert_eq!(scale((255, 255, 255), SLIGHTLY_DIM), (180, 180, 180));
        assert_eq!(scale(ORANGE, DIM), (120, 77, 0));
    }

    #[test]
    fn smear_in_the_middle() {
        let mut px = Pixels([(9, 9, 9); 8]);
        smeared_scanner(&mut px, 3, RED, BLACK);
        assert_eq!(
            px.0,
            [
                BLACK,
                (120, 0, 0),
                (180, 0, 0),
                RED,
                (180, 0, 0),
                (120, 0, 0),
                BLACK,
                BLACK,
            ]
        );
    }

    #[test]
    fn smear_is_clipped_at_the_start() {
        let mut px = Pixels([(9, 9, 9); 8]);
        smeared_scanner(&mut px, 0, RED, BLACK);
        assert_eq!(px.0[0], RED);
        assert_eq!(px.0[1], (180, 0, 0));
        assert_eq!(px.0[2], (120, 0, 0));
        assert!(px.0[3..].iter().all(|p| *p == BLACK));
    }

    #[test]
    fn smear_is_clipped_at_the_end() {
        let mut px = Pixels([(9, 9, 9); 8]);
        smeared_scanner(&mut px, 7, RED, BLACK);
        assert_eq!(px.0[7], RED);
        assert_eq!(px.0[6], (180, 0, 0));
        assert_eq!(px.0[5], (120, 0, 0));
        assert!(px.0[..5].iter().all(|p| *p == BLACK));
    }

    #[test]
    fn background_is_used_for_unlit_pixels() {
        let mut px = Pixels([BLACK; 8]);
        smeared_scanner(&mut px, 4, RED, BLUE);
        assert_eq!(px.0[0], BLUE);
        assert_eq!(px.0[7], BLUE);
    }

    #[test]
    fn index_past_end_leaves_background() {
        let mut px = Pixels([RED; 8]);
        smeared_scanner(&mut px, 20, RED, GREEN);
        assert!(px.0.iter().all(|p| *p == GREEN));
    }
}
