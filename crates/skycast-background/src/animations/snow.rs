//! Snowfall animation (stateful).

use skycast_core::Viewport;

use crate::color::Rgba;
use crate::rng::RandomSource;
use crate::surface::Surface;

/// Number of snowflakes in one activation.
pub const SNOW_COUNT: usize = 80;

/// Height a snowflake respawns at after leaving the bottom edge.
pub const SNOW_RESPAWN_Y: f64 = -10.0;

/// Sway frequency applied to the fall height.
const SWAY_FREQUENCY: f64 = 0.01;

/// State for a single snowflake.
#[derive(Debug, Clone, PartialEq)]
pub struct Snowflake {
    pub x: f64,
    pub y: f64,
    /// Radius in pixels.
    pub r: f64,
    /// Fall distance per frame.
    pub speed_y: f64,
    /// Amplitude of the lateral sway.
    pub drift: f64,
}

impl Snowflake {
    fn spawn(viewport: Viewport, rng: &mut impl RandomSource) -> Self {
        Self {
            x: rng.next_f64() * viewport.width,
            y: rng.next_f64() * viewport.height,
            r: rng.range(2.0, 6.0),
            speed_y: rng.range(0.5, 1.5),
            drift: rng.range(0.0, 0.5),
        }
    }

    fn step(&mut self, viewport: Viewport, rng: &mut impl RandomSource) {
        self.y += self.speed_y;
        self.x += (self.y * SWAY_FREQUENCY).sin() * self.drift;

        if self.y >= viewport.height {
            self.y = SNOW_RESPAWN_Y;
            self.x = rng.next_f64() * viewport.width;
        }
    }
}

/// Spawn a full set of snowflakes scattered over the viewport.
pub fn spawn(viewport: Viewport, rng: &mut impl RandomSource) -> Vec<Snowflake> {
    (0..SNOW_COUNT)
        .map(|_| Snowflake::spawn(viewport, rng))
        .collect()
}

/// Draw every snowflake at its current position.
pub fn render(flakes: &[Snowflake], surface: &mut impl Surface) {
    for flake in flakes {
        surface.fill_circle(flake.x, flake.y, flake.r, Rgba::WHITE);
    }
}

/// Advance every snowflake by one frame.
pub fn update(flakes: &mut [Snowflake], viewport: Viewport, rng: &mut impl RandomSource) {
    for flake in flakes {
        flake.step(viewport, rng);
    }
}
