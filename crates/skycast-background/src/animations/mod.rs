//! Per-theme particle animations.

pub mod lightning;
pub mod rain;
pub mod snow;

pub use lightning::LIGHTNING_CHANCE;
pub use rain::{RAIN_COUNT, RAIN_RESPAWN_Y, RainStreak};
pub use snow::{SNOW_COUNT, SNOW_RESPAWN_Y, Snowflake};
