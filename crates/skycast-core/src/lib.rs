//! Core types for the skycast weather display.

mod geometry;
mod theme;

pub use geometry::{CELL_HEIGHT_PX, CELL_WIDTH_PX, Coordinates, Viewport};
pub use theme::{Theme, ThemeParseError, weather_icon};
