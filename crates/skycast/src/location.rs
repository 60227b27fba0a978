//! Location resolution.
//!
//! Coordinates may come from the command line or the config file. When
//! neither provides a usable pair the fixed fallback location is used.

use skycast_core::Coordinates;
use tracing::{info, warn};

/// Label shown when falling back to the default location.
pub const FALLBACK_LABEL: &str = "Seoul";

/// Label shown for explicitly configured coordinates without a name.
pub const CUSTOM_LABEL: &str = "Current location";

/// A resolved location and how to describe it.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub coordinates: Coordinates,
    pub label: String,
}

/// Pick the first valid candidate, falling back to [`Coordinates::SEOUL`].
///
/// `candidates` are in priority order, each with the label to show for it.
pub fn resolve(candidates: &[(Option<Coordinates>, Option<&str>)]) -> Location {
    for (coordinates, label) in candidates {
        let Some(coordinates) = coordinates else {
            continue;
        };
        if !coordinates.is_valid() {
            warn!(
                latitude = coordinates.latitude,
                longitude = coordinates.longitude,
                "ignoring out-of-range coordinates"
            );
            continue;
        }

        info!(
            latitude = coordinates.latitude,
            longitude = coordinates.longitude,
            "using configured location"
        );
        return Location {
            coordinates: *coordinates,
            label: label.unwrap_or(CUSTOM_LABEL).to_string(),
        };
    }

    warn!("no location available, falling back to {FALLBACK_LABEL}");
    Location {
        coordinates: Coordinates::SEOUL,
        label: FALLBACK_LABEL.to_string(),
    }
}
