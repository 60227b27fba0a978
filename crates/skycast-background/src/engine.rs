//! The particle animation engine.

use skycast_core::{Theme, Viewport};
use tracing::debug;

use crate::animations::{RainStreak, Snowflake, lightning, rain, snow};
use crate::frame::{CancelHandle, FrameLoop, FrameRequest};
use crate::rng::RandomSource;
use crate::surface::Surface;

/// Particle set for one activation.
#[derive(Debug, Clone, PartialEq)]
pub enum Particles {
    /// Themes without an animation.
    Idle,
    Snow(Vec<Snowflake>),
    /// Rain streaks, also used by the thunder theme.
    Rain(Vec<RainStreak>),
}

impl Particles {
    fn spawn(theme: Theme, viewport: Viewport, rng: &mut impl RandomSource) -> Self {
        match theme {
            Theme::Snow => Self::Snow(snow::spawn(viewport, rng)),
            Theme::Rain | Theme::Thunder => Self::Rain(rain::spawn(viewport, rng)),
            Theme::Clear | Theme::Cloud | Theme::Cloudy => Self::Idle,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Idle => 0,
            Self::Snow(flakes) => flakes.len(),
            Self::Rain(streaks) => streaks.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// State that lives for exactly one activation.
#[derive(Debug)]
struct Session {
    theme: Theme,
    viewport: Viewport,
    particles: Particles,
    /// Loop this session belongs to.
    request: FrameRequest,
    /// Continuation to run on the next refresh, if the theme animates.
    pending: Option<FrameRequest>,
}

/// Renders a theme's ambient animation onto a surface, one frame per refresh.
///
/// The engine is either inactive, or active for one theme with a fixed
/// viewport. Re-activating cancels the previous loop before the new particle
/// set is built, and dropping the engine deactivates it.
#[derive(Debug)]
pub struct ParticleEngine<S: Surface, R: RandomSource> {
    /// Drawing surface. `None` leaves the engine permanently degraded.
    surface: Option<S>,
    rng: R,
    frames: FrameLoop,
    session: Option<Session>,
}

impl<S: Surface, R: RandomSource> ParticleEngine<S, R> {
    /// Create an inactive engine.
    pub fn new(surface: Option<S>, rng: R) -> Self {
        Self {
            surface,
            rng,
            frames: FrameLoop::new(),
            session: None,
        }
    }

    /// Build the particle set for `theme` and start the frame loop.
    ///
    /// Any previous loop is cancelled first. Without a surface or with an
    /// empty viewport this does nothing and the engine stays inactive.
    pub fn activate(&mut self, theme: Theme, viewport: Viewport) {
        self.deactivate();

        let Some(surface) = self.surface.as_mut() else {
            debug!(%theme, "no drawing surface, background animation disabled");
            return;
        };
        if viewport.is_empty() {
            debug!(%theme, ?viewport, "empty viewport, background animation disabled");
            return;
        }

        let particles = Particles::spawn(theme, viewport, &mut self.rng);
        surface.clear();

        let request = self.frames.start();
        debug!(
            %theme,
            particles = particles.len(),
            width = viewport.width,
            height = viewport.height,
            "background engine activated"
        );
        self.session = Some(Session {
            theme,
            viewport,
            particles,
            request,
            pending: theme.animates().then_some(request),
        });
    }

    /// Advance every particle by one step and redraw the surface.
    ///
    /// Returns `false` without touching the surface when the engine is
    /// inactive or the theme has nothing to animate.
    pub fn advance_frame(&mut self) -> bool {
        if !self.is_active() {
            self.session = None;
            return false;
        }
        let (Some(session), Some(surface)) = (self.session.as_mut(), self.surface.as_mut()) else {
            return false;
        };

        let viewport = session.viewport;
        match &mut session.particles {
            Particles::Idle => return false,
            Particles::Snow(flakes) => {
                surface.clear();
                snow::render(flakes, surface);
                snow::update(flakes, viewport, &mut self.rng);
            }
            Particles::Rain(streaks) => {
                surface.clear();
                rain::render(streaks, surface);
                rain::update(streaks, viewport, &mut self.rng);
                if session.theme == Theme::Thunder {
                    lightning::maybe_strike(viewport, &mut self.rng, surface);
                }
            }
        }
        true
    }

    /// Display refresh callback: runs the pending frame, then re-arms it.
    ///
    /// Returns whether a frame was drawn. A continuation that was cancelled
    /// since it was scheduled is dropped without drawing.
    pub fn on_vsync(&mut self) -> bool {
        let Some(request) = self.session.as_mut().and_then(|s| s.pending.take()) else {
            return false;
        };
        if !self.frames.is_live(request) {
            self.session = None;
            return false;
        }

        let drawn = self.advance_frame();
        if let Some(session) = self.session.as_mut() {
            session.pending = Some(request);
        }
        drawn
    }

    /// Stop the frame loop and drop the particle set.
    pub fn deactivate(&mut self) {
        self.frames.cancel();
        if let Some(session) = self.session.take() {
            debug!(theme = %session.theme, "background engine deactivated");
        }
    }

    /// Whether a loop is running and has not been cancelled.
    pub fn is_active(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| self.frames.is_live(s.request))
    }

    /// Theme of the running loop.
    pub fn theme(&self) -> Option<Theme> {
        self.session
            .as_ref()
            .filter(|s| self.frames.is_live(s.request))
            .map(|s| s.theme)
    }

    /// Viewport captured at activation.
    pub fn viewport(&self) -> Option<Viewport> {
        self.session.as_ref().map(|s| s.viewport)
    }

    pub fn particles(&self) -> Option<&Particles> {
        self.session.as_ref().map(|s| &s.particles)
    }

    pub fn particle_count(&self) -> usize {
        self.particles().map_or(0, Particles::len)
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    /// Handle that cancels the running loop from outside the engine.
    pub fn cancel_handle(&self) -> CancelHandle {
        self.frames.cancel_handle()
    }
}

impl<S: Surface, R: RandomSource> Drop for ParticleEngine<S, R> {
    fn drop(&mut self) {
        self.deactivate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animations::{LIGHTNING_CHANCE, RAIN_COUNT, RAIN_RESPAWN_Y, SNOW_COUNT};
    use crate::color::Rgba;
    use crate::surface::{DrawCommand, DrawList, Stroke};

    const VIEWPORT: Viewport = Viewport::new(800.0, 600.0);

    /// Surface that counts every mutating call.
    #[derive(Debug, Default)]
    struct CountingSurface {
        clears: usize,
        draws: usize,
    }

    impl CountingSurface {
        fn calls(&self) -> usize {
            self.clears + self.draws
        }
    }

    impl Surface for CountingSurface {
        fn clear(&mut self) {
            self.clears += 1;
        }

        fn fill_circle(&mut self, _x: f64, _y: f64, _radius: f64, _color: Rgba) {
            self.draws += 1;
        }

        fn stroke_line(&mut self, _from: (f64, f64), _to: (f64, f64), _stroke: Stroke) {
            self.draws += 1;
        }

        fn stroke_polyline(&mut self, _points: &[(f64, f64)], _stroke: Stroke) {
            self.draws += 1;
        }

        fn fill_rect(&mut self, _x: f64, _y: f64, _w: f64, _h: f64, _color: Rgba) {
            self.draws += 1;
        }
    }

    fn new_engine<S: Surface>(surface: S, seed: u64) -> ParticleEngine<S, fastrand::Rng> {
        ParticleEngine::new(Some(surface), fastrand::Rng::with_seed(seed))
    }

    fn counting_calls(engine: &ParticleEngine<CountingSurface, fastrand::Rng>) -> usize {
        engine.surface().map_or(0, CountingSurface::calls)
    }

    #[test]
    fn test_idle_themes_only_clear_once() {
        for theme in [Theme::Clear, Theme::Cloud, Theme::Cloudy] {
            let mut engine = new_engine(CountingSurface::default(), 1);
            engine.activate(theme, VIEWPORT);

            assert!(engine.is_active());
            assert_eq!(engine.particle_count(), 0);
            for _ in 0..10 {
                assert!(!engine.on_vsync());
                assert!(!engine.advance_frame());
            }

            let surface = engine.surface().unwrap();
            assert_eq!(surface.clears, 1);
            assert_eq!(surface.draws, 0);
        }
    }

    #[test]
    fn test_snow_population_and_bounds() {
        let mut engine = new_engine(DrawList::new(), 2);
        engine.activate(Theme::Snow, VIEWPORT);
        assert_eq!(engine.particle_count(), SNOW_COUNT);

        for _ in 0..2000 {
            assert!(engine.on_vsync());
            let Some(Particles::Snow(flakes)) = engine.particles() else {
                panic!("expected snow particles");
            };
            assert_eq!(flakes.len(), SNOW_COUNT);
            for flake in flakes {
                assert!(flake.y >= snow::SNOW_RESPAWN_Y && flake.y < VIEWPORT.height);
            }
        }
    }

    #[test]
    fn test_snow_wrap_reassigns_x_inside_width() {
        let mut engine = new_engine(DrawList::new(), 3);
        engine.activate(Theme::Snow, VIEWPORT);

        let mut wraps = 0;
        for _ in 0..1500 {
            engine.advance_frame();
            let Some(Particles::Snow(flakes)) = engine.particles() else {
                panic!("expected snow particles");
            };
            for flake in flakes.iter().filter(|f| f.y == snow::SNOW_RESPAWN_Y) {
                wraps += 1;
                assert!((0.0..VIEWPORT.width).contains(&flake.x));
            }
        }
        assert!(wraps > 0);
    }

    #[test]
    fn test_rain_falls_then_wraps() {
        let mut engine = new_engine(DrawList::new(), 4);
        engine.activate(Theme::Rain, VIEWPORT);
        assert_eq!(engine.particle_count(), RAIN_COUNT);

        let snapshot = |engine: &ParticleEngine<DrawList, fastrand::Rng>| match engine.particles()
        {
            Some(Particles::Rain(streaks)) => streaks.clone(),
            _ => panic!("expected rain particles"),
        };

        let mut previous = snapshot(&engine);
        for _ in 0..500 {
            engine.on_vsync();
            let current = snapshot(&engine);
            for (before, after) in previous.iter().zip(&current) {
                if before.y + before.speed_y >= VIEWPORT.height {
                    assert_eq!(after.y, RAIN_RESPAWN_Y);
                } else {
                    assert!(after.y > before.y);
                    assert_eq!(after.x, before.x);
                }
            }
            previous = current;
        }
    }

    #[test]
    fn test_rain_frame_draws_every_streak() {
        let mut engine = new_engine(DrawList::new(), 5);
        engine.activate(Theme::Rain, VIEWPORT);
        engine.on_vsync();

        let list = engine.surface().unwrap();
        assert_eq!(list.len(), RAIN_COUNT);
        assert!(
            list.commands()
                .iter()
                .all(|c| matches!(c, DrawCommand::Line { .. }))
        );
    }

    #[test]
    fn test_thunder_strike_frequency() {
        let mut engine = new_engine(DrawList::new(), 6);
        engine.activate(Theme::Thunder, VIEWPORT);

        let frames: u32 = 10_000;
        let mut strikes: u32 = 0;
        for _ in 0..frames {
            engine.on_vsync();
            let list = engine.surface().unwrap();
            if list
                .commands()
                .iter()
                .any(|c| matches!(c, DrawCommand::Polyline { .. }))
            {
                strikes += 1;
            }
        }

        let rate = f64::from(strikes) / f64::from(frames);
        assert!((rate - LIGHTNING_CHANCE).abs() <= 0.005, "rate {rate}");
    }

    #[test]
    fn test_flash_is_erased_next_frame() {
        let mut engine = new_engine(DrawList::new(), 7);
        engine.activate(Theme::Thunder, VIEWPORT);

        let has_flash = |list: &DrawList| {
            list.commands()
                .iter()
                .any(|c| matches!(c, DrawCommand::Rect { .. }))
        };

        let mut checked = false;
        for _ in 0..5000 {
            engine.on_vsync();
            if has_flash(engine.surface().unwrap()) {
                engine.on_vsync();
                let list = engine.surface().unwrap();
                let lines = list
                    .commands()
                    .iter()
                    .filter(|c| matches!(c, DrawCommand::Line { .. }))
                    .count();
                assert_eq!(lines, RAIN_COUNT);
                checked = true;
                break;
            }
        }
        assert!(checked);
    }

    #[test]
    fn test_no_surface_mutation_after_deactivate() {
        let mut engine = new_engine(CountingSurface::default(), 8);
        engine.activate(Theme::Thunder, VIEWPORT);
        for _ in 0..25 {
            engine.on_vsync();
        }

        engine.deactivate();
        let calls = counting_calls(&engine);
        for _ in 0..100 {
            assert!(!engine.on_vsync());
            assert!(!engine.advance_frame());
        }

        assert_eq!(counting_calls(&engine), calls);
        assert!(!engine.is_active());
        assert_eq!(engine.particle_count(), 0);
    }

    #[test]
    fn test_cancel_handle_stops_loop() {
        let mut engine = new_engine(CountingSurface::default(), 9);
        engine.activate(Theme::Snow, VIEWPORT);
        engine.on_vsync();

        engine.cancel_handle().cancel();
        let calls = counting_calls(&engine);

        assert!(!engine.on_vsync());
        assert!(!engine.advance_frame());
        assert_eq!(counting_calls(&engine), calls);
        assert_eq!(engine.theme(), None);
    }

    #[test]
    fn test_reactivation_rebuilds_particles() {
        let mut engine = new_engine(DrawList::new(), 10);
        engine.activate(Theme::Snow, VIEWPORT);
        for _ in 0..10 {
            engine.on_vsync();
        }

        engine.activate(Theme::Rain, VIEWPORT);
        assert_eq!(engine.theme(), Some(Theme::Rain));
        assert_eq!(engine.particle_count(), RAIN_COUNT);
        assert!(engine.surface().unwrap().is_empty());

        engine.on_vsync();
        let list = engine.surface().unwrap();
        assert!(
            list.commands()
                .iter()
                .all(|c| matches!(c, DrawCommand::Line { .. }))
        );
    }

    #[test]
    fn test_missing_surface_degrades_to_noop() {
        let mut engine: ParticleEngine<DrawList, _> =
            ParticleEngine::new(None, fastrand::Rng::with_seed(11));
        engine.activate(Theme::Snow, VIEWPORT);

        assert!(!engine.is_active());
        assert!(!engine.on_vsync());
        assert_eq!(engine.particle_count(), 0);
    }

    #[test]
    fn test_empty_viewport_degrades_to_noop() {
        let mut engine = new_engine(CountingSurface::default(), 12);
        engine.activate(Theme::Rain, Viewport::new(0.0, 600.0));

        assert!(!engine.is_active());
        assert_eq!(counting_calls(&engine), 0);
    }

    #[test]
    fn test_seeded_engines_are_deterministic() {
        let mut a = new_engine(DrawList::new(), 13);
        let mut b = new_engine(DrawList::new(), 13);
        a.activate(Theme::Thunder, VIEWPORT);
        b.activate(Theme::Thunder, VIEWPORT);

        for _ in 0..200 {
            a.on_vsync();
            b.on_vsync();
        }
        assert_eq!(a.particles(), b.particles());
        assert_eq!(a.surface().unwrap().commands(), b.surface().unwrap().commands());
    }
}
