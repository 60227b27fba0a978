//! Color utility functions for background animations.

use ratatui::style::Color;

/// An sRGB color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 1.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Composite this color over an opaque terminal color.
    ///
    /// Named and indexed colors have no known RGB value and are treated as black.
    pub fn over(self, base: Color) -> Color {
        let (br, bg, bb) = match base {
            Color::Rgb(r, g, b) => (r, g, b),
            _ => (0, 0, 0),
        };
        let a = self.a.clamp(0.0, 1.0);

        Color::Rgb(
            mix(self.r, br, a),
            mix(self.g, bg, a),
            mix(self.b, bb, a),
        )
    }
}

fn mix(top: u8, bottom: u8, alpha: f32) -> u8 {
    (f32::from(top) * alpha + f32::from(bottom) * (1.0 - alpha)).round() as u8
}
