//! Locations and drawing-surface dimensions.

use serde::{Deserialize, Serialize};

/// Device pixels covered by one terminal cell, horizontally.
pub const CELL_WIDTH_PX: f64 = 8.0;

/// Device pixels covered by one terminal cell, vertically.
pub const CELL_HEIGHT_PX: f64 = 16.0;

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Fallback location used when no position is available (Seoul).
    pub const SEOUL: Coordinates = Coordinates {
        latitude: 37.57,
        longitude: 126.98,
    };

    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check that latitude and longitude are within their valid ranges.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl Default for Coordinates {
    fn default() -> Self {
        Self::SEOUL
    }
}

/// Size of the drawing surface in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Viewport covering a terminal area of `cols` x `rows` cells.
    pub fn from_cells(cols: u16, rows: u16) -> Self {
        Self {
            width: f64::from(cols) * CELL_WIDTH_PX,
            height: f64::from(rows) * CELL_HEIGHT_PX,
        }
    }

    /// A viewport with no drawable area.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}
