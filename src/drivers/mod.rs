//! LED strip buffer, view slicing, and pattern rendering.

pub mod led_patterns;
pub mod led_strip;
