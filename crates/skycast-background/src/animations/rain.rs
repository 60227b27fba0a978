//! Rain animation (stateful), shared by the rain and thunder themes.

use skycast_core::Viewport;

use crate::color::Rgba;
use crate::rng::RandomSource;
use crate::surface::{Stroke, Surface};

/// Number of rain streaks in one activation.
pub const RAIN_COUNT: usize = 200;

/// Height a streak respawns at after leaving the bottom edge.
pub const RAIN_RESPAWN_Y: f64 = -20.0;

const RAIN_STROKE: Stroke = Stroke::new(Rgba::new(255, 255, 255, 0.6), 1.5);

/// State for a single rain streak.
#[derive(Debug, Clone, PartialEq)]
pub struct RainStreak {
    pub x: f64,
    pub y: f64,
    /// Streak length in pixels.
    pub len: f64,
    /// Fall distance per frame.
    pub speed_y: f64,
}

impl RainStreak {
    fn spawn(viewport: Viewport, rng: &mut impl RandomSource) -> Self {
        Self {
            x: rng.next_f64() * viewport.width,
            y: rng.next_f64() * viewport.height,
            len: rng.range(10.0, 30.0),
            speed_y: rng.range(4.0, 8.0),
        }
    }

    fn step(&mut self, viewport: Viewport, rng: &mut impl RandomSource) {
        self.y += self.speed_y;

        if self.y >= viewport.height {
            self.y = RAIN_RESPAWN_Y;
            self.x = rng.next_f64() * viewport.width;
        }
    }
}

/// Spawn a full set of rain streaks scattered over the viewport.
pub fn spawn(viewport: Viewport, rng: &mut impl RandomSource) -> Vec<RainStreak> {
    (0..RAIN_COUNT)
        .map(|_| RainStreak::spawn(viewport, rng))
        .collect()
}

/// Draw every streak as a vertical segment hanging below its head.
pub fn render(streaks: &[RainStreak], surface: &mut impl Surface) {
    for streak in streaks {
        surface.stroke_line(
            (streak.x, streak.y),
            (streak.x, streak.y + streak.len),
            RAIN_STROKE,
        );
    }
}

/// Advance every streak by one frame.
pub fn update(streaks: &mut [RainStreak], viewport: Viewport, rng: &mut impl RandomSource) {
    for streak in streaks {
        streak.step(viewport, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, DrawList};

    const VIEWPORT: Viewport = Viewport::new(400.0, 300.0);

    #[test]
    fn test_spawn_within_bounds() {
        let mut rng = fastrand::Rng::with_seed(11);
        let streaks = spawn(VIEWPORT, &mut rng);

        assert_eq!(streaks.len(), RAIN_COUNT);
        for streak in &streaks {
            assert!((0.0..VIEWPORT.width).contains(&streak.x));
            assert!((0.0..VIEWPORT.height).contains(&streak.y));
            assert!((10.0..30.0).contains(&streak.len));
            assert!((4.0..8.0).contains(&streak.speed_y));
        }
    }

    #[test]
    fn test_falls_straight_down() {
        let mut rng = fastrand::Rng::with_seed(12);
        let mut streak = RainStreak {
            x: 42.0,
            y: 10.0,
            len: 20.0,
            speed_y: 5.0,
        };
        streak.step(VIEWPORT, &mut rng);

        assert_eq!(streak.x, 42.0);
        assert_eq!(streak.y, 15.0);
    }

    #[test]
    fn test_wrap_respawns_above_top() {
        let mut rng = fastrand::Rng::with_seed(13);
        let mut streak = RainStreak {
            x: 42.0,
            y: 298.0,
            len: 20.0,
            speed_y: 5.0,
        };
        streak.step(VIEWPORT, &mut rng);

        assert_eq!(streak.y, RAIN_RESPAWN_Y);
        assert!((0.0..VIEWPORT.width).contains(&streak.x));
    }

    #[test]
    fn test_render_draws_streak_segments() {
        let streaks = vec![RainStreak {
            x: 5.0,
            y: 7.0,
            len: 12.0,
            speed_y: 4.0,
        }];
        let mut list = DrawList::new();
        render(&streaks, &mut list);

        assert_eq!(
            list.commands(),
            &[DrawCommand::Line {
                from: (5.0, 7.0),
                to: (5.0, 19.0),
                stroke: RAIN_STROKE,
            }]
        );
    }
}
