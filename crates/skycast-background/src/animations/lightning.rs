//! Lightning bolts for the thunder theme.

use skycast_core::Viewport;

use crate::color::Rgba;
use crate::rng::RandomSource;
use crate::surface::{Stroke, Surface};

/// Probability that a thunder frame strikes lightning.
pub const LIGHTNING_CHANCE: f64 = 0.02;

const BOLT_STROKE: Stroke = Stroke::new(Rgba::new(255, 255, 255, 0.9), 2.0);
const FLASH_COLOR: Rgba = Rgba::new(255, 255, 255, 0.3);

/// Jagged path from the top edge to the bottom edge.
pub fn bolt_path(viewport: Viewport, rng: &mut impl RandomSource) -> Vec<(f64, f64)> {
    let mut x = rng.next_f64() * viewport.width;
    let mut y = 0.0;
    let mut points = vec![(x, y)];

    while y < viewport.height {
        x += (rng.next_f64() - 0.5) * 40.0;
        y += 20.0 + rng.next_f64() * 30.0;
        points.push((x, y));
    }

    points
}

/// Roll for a strike; on success draw a bolt and flash the whole surface.
pub fn maybe_strike(
    viewport: Viewport,
    rng: &mut impl RandomSource,
    surface: &mut impl Surface,
) -> bool {
    if !rng.chance(LIGHTNING_CHANCE) {
        return false;
    }

    let path = bolt_path(viewport, rng);
    surface.stroke_polyline(&path, BOLT_STROKE);
    surface.fill_rect(0.0, 0.0, viewport.width, viewport.height, FLASH_COLOR);
    true
}
