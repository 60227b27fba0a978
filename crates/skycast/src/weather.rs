//! Weather data fetching.
//!
//! Fetches current conditions and a 7-day forecast from the Open-Meteo API.
//! The two requests run on their own threads and publish into independent
//! [`FetchState`] slots; neither waits for the other and neither is retried.

use std::sync::{Arc, RwLock};
use std::thread;
use std::time::Duration;

use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use skycast_core::{Coordinates, Theme};
use thiserror::Error;
use tracing::{info, warn};

/// Days in the weekly forecast, today included.
pub const FORECAST_DAYS: u64 = 7;

/// Weather fetch errors.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),

    #[error("parse error: {0}")]
    Parse(String),
}

/// Current conditions at the requested location.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentWeather {
    /// Temperature in Celsius.
    pub temperature: f64,
    /// Wind speed in km/h.
    pub windspeed: f64,
    /// Observation time, local to the location.
    pub time: NaiveDateTime,
    /// WMO weather code.
    pub weathercode: i32,
}

impl CurrentWeather {
    pub fn theme(&self) -> Theme {
        Theme::from_weather_code(self.weathercode)
    }
}

/// One day of the forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub max: f64,
    pub min: f64,
    pub code: i32,
}

/// Progress of one fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self::Loading
    }
}

/// Shared slot a fetch thread publishes into.
pub type Shared<T> = Arc<RwLock<FetchState<T>>>;

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    current_weather: RawCurrent,
}

#[derive(Debug, Deserialize)]
struct RawCurrent {
    temperature: f64,
    windspeed: f64,
    time: String,
    weathercode: i32,
}

#[derive(Debug, Deserialize)]
struct DailyResponse {
    daily: RawDaily,
}

#[derive(Debug, Deserialize)]
struct RawDaily {
    time: Vec<String>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
    weathercode: Vec<i32>,
}

/// Open-Meteo HTTP client.
#[derive(Clone)]
pub struct WeatherApi {
    agent: ureq::Agent,
    base_url: String,
}

impl WeatherApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .new_agent();

        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn current_url(&self, at: Coordinates) -> String {
        format!(
            "{}/forecast?latitude={}&longitude={}&current_weather=true&timezone=auto",
            self.base_url, at.latitude, at.longitude
        )
    }

    fn forecast_url(&self, at: Coordinates, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{}/forecast?latitude={}&longitude={}\
             &daily=temperature_2m_max,temperature_2m_min,weathercode\
             &timezone=auto&start_date={}&end_date={}",
            self.base_url,
            at.latitude,
            at.longitude,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d"),
        )
    }

    /// Fetch current conditions.
    pub fn fetch_current(&self, at: Coordinates) -> Result<CurrentWeather, WeatherError> {
        let response: CurrentResponse = self
            .agent
            .get(&self.current_url(at))
            .call()?
            .body_mut()
            .read_json()?;
        parse_current(response)
    }

    /// Fetch the forecast for `FORECAST_DAYS` days starting at `today`.
    pub fn fetch_forecast(
        &self,
        at: Coordinates,
        today: NaiveDate,
    ) -> Result<Vec<DailyForecast>, WeatherError> {
        let end = today
            .checked_add_days(Days::new(FORECAST_DAYS - 1))
            .ok_or_else(|| WeatherError::Parse(format!("date out of range: {today}")))?;

        let response: DailyResponse = self
            .agent
            .get(&self.forecast_url(at, today, end))
            .call()?
            .body_mut()
            .read_json()?;
        parse_daily(response.daily)
    }
}

fn parse_current(response: CurrentResponse) -> Result<CurrentWeather, WeatherError> {
    let raw = response.current_weather;
    let time = parse_time(&raw.time)?;

    Ok(CurrentWeather {
        temperature: raw.temperature,
        windspeed: raw.windspeed,
        time,
        weathercode: raw.weathercode,
    })
}

/// Parse an API timestamp like `2024-01-15T14:30`.
fn parse_time(s: &str) -> Result<NaiveDateTime, WeatherError> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|e| WeatherError::Parse(format!("invalid time `{s}`: {e}")))
}

fn parse_daily(daily: RawDaily) -> Result<Vec<DailyForecast>, WeatherError> {
    let days = daily.time.len();
    if daily.temperature_2m_max.len() != days
        || daily.temperature_2m_min.len() != days
        || daily.weathercode.len() != days
    {
        return Err(WeatherError::Parse(format!(
            "daily arrays differ in length (time {days}, max {}, min {}, code {})",
            daily.temperature_2m_max.len(),
            daily.temperature_2m_min.len(),
            daily.weathercode.len()
        )));
    }

    daily
        .time
        .iter()
        .zip(daily.temperature_2m_max)
        .zip(daily.temperature_2m_min)
        .zip(daily.weathercode)
        .map(|(((date, max), min), code)| {
            let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map_err(|e| WeatherError::Parse(format!("invalid date `{date}`: {e}")))?;
            Ok(DailyForecast {
                date,
                max,
                min,
                code,
            })
        })
        .collect()
}

/// Display state fed by the two fetch threads.
#[derive(Debug, Clone, Default)]
pub struct WeatherFeeds {
    pub current: Shared<CurrentWeather>,
    pub forecast: Shared<Vec<DailyForecast>>,
}

impl WeatherFeeds {
    /// Start both fetches for `at`. Returns immediately.
    pub fn spawn(api: WeatherApi, at: Coordinates, today: NaiveDate) -> Self {
        let feeds = Self::default();

        let current = Arc::clone(&feeds.current);
        let current_api = api.clone();
        thread::spawn(move || {
            let result = current_api.fetch_current(at);
            if let Ok(ref weather) = result {
                info!(
                    temperature = weather.temperature,
                    code = weather.weathercode,
                    "current weather received"
                );
            }
            publish(&current, "current weather", result);
        });

        let forecast = Arc::clone(&feeds.forecast);
        thread::spawn(move || {
            let result = api.fetch_forecast(at, today);
            if let Ok(ref days) = result {
                info!(days = days.len(), "forecast received");
            }
            publish(&forecast, "forecast", result);
        });

        feeds
    }

    pub fn current(&self) -> FetchState<CurrentWeather> {
        snapshot(&self.current)
    }

    pub fn forecast(&self) -> FetchState<Vec<DailyForecast>> {
        snapshot(&self.forecast)
    }
}

fn publish<T>(slot: &Shared<T>, what: &str, result: Result<T, WeatherError>) {
    let state = match result {
        Ok(value) => FetchState::Ready(value),
        Err(e) => {
            warn!(error = %e, "failed to fetch {what}");
            FetchState::Failed(e.to_string())
        }
    };
    if let Ok(mut slot) = slot.write() {
        *slot = state;
    }
}

fn snapshot<T: Clone>(slot: &Shared<T>) -> FetchState<T> {
    slot.read()
        .map(|state| state.clone())
        .unwrap_or_else(|_| FetchState::Failed("weather state poisoned".to_string()))
}
