//! Weather background animations for the skycast weather display.
//!
//! The [`ParticleEngine`] owns the particles for one weather theme, advances
//! them once per display refresh and records each frame onto a [`Surface`].
//! [`BackgroundCanvas`] paints the recorded [`DrawList`] into a ratatui buffer.

mod animations;
mod canvas;
mod color;
mod engine;
mod frame;
mod rng;
mod surface;

pub use animations::{
    LIGHTNING_CHANCE, RAIN_COUNT, RAIN_RESPAWN_Y, RainStreak, SNOW_COUNT, SNOW_RESPAWN_Y,
    Snowflake,
};
pub use canvas::BackgroundCanvas;
pub use color::Rgba;
pub use engine::{ParticleEngine, Particles};
pub use frame::{CancelHandle, FrameLoop, FrameRequest};
pub use rng::RandomSource;
pub use surface::{DrawCommand, DrawList, Stroke, Surface};
