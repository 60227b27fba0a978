//! Weather themes and the WMO weather-code table.

use std::fmt;
use std::str::FromStr;

use ratatui::style::Color;
use thiserror::Error;

/// Visual style classifying the current weather.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    #[default]
    Clear,
    Cloud,
    Cloudy,
    Rain,
    Snow,
    Thunder,
}

/// Returned when a string is not one of the theme tags.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown theme `{0}` (expected clear, cloud, cloudy, rain, snow or thunder)")]
pub struct ThemeParseError(pub String);

impl Theme {
    /// Every theme, in tag order.
    pub const ALL: [Theme; 6] = [
        Theme::Clear,
        Theme::Cloud,
        Theme::Cloudy,
        Theme::Rain,
        Theme::Snow,
        Theme::Thunder,
    ];

    /// Classify a WMO weather code, or `None` when the code is outside the table.
    pub const fn classify(code: i32) -> Option<Self> {
        match code {
            0 | 1 => Some(Self::Clear),
            2 => Some(Self::Cloud),
            3 => Some(Self::Cloudy),
            51..=67 => Some(Self::Rain),
            71..=77 => Some(Self::Snow),
            95..=99 => Some(Self::Thunder),
            _ => None,
        }
    }

    /// Map a WMO weather code to a theme, defaulting to [`Theme::Clear`].
    pub const fn from_weather_code(code: i32) -> Self {
        match Self::classify(code) {
            Some(theme) => theme,
            None => Self::Clear,
        }
    }

    /// The string tag for this theme.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clear => "clear",
            Self::Cloud => "cloud",
            Self::Cloudy => "cloudy",
            Self::Rain => "rain",
            Self::Snow => "snow",
            Self::Thunder => "thunder",
        }
    }

    /// Whether the background engine has particles to animate for this theme.
    pub const fn animates(self) -> bool {
        matches!(self, Self::Rain | Self::Snow | Self::Thunder)
    }

    /// Icon shown next to a reading classified as this theme.
    pub const fn icon(self) -> &'static str {
        match self {
            Self::Clear => "☀️",
            Self::Cloud => "⛅",
            Self::Cloudy => "☁️",
            Self::Rain => "🌧️",
            Self::Snow => "❄️",
            Self::Thunder => "⛈️",
        }
    }

    /// Background color painted behind the animation.
    pub const fn backdrop(self) -> Color {
        match self {
            Self::Clear => Color::Rgb(30, 80, 150),
            Self::Cloud => Color::Rgb(60, 90, 130),
            Self::Cloudy => Color::Rgb(70, 75, 85),
            Self::Rain => Color::Rgb(35, 45, 60),
            Self::Snow => Color::Rgb(55, 65, 85),
            Self::Thunder => Color::Rgb(25, 25, 40),
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = ThemeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|theme| theme.as_str() == s.trim())
            .ok_or_else(|| ThemeParseError(s.to_string()))
    }
}

/// Forecast icon for a weather code. Codes outside the table get a thermometer.
pub fn weather_icon(code: i32) -> &'static str {
    Theme::classify(code).map_or("🌡️", Theme::icon)
}
