use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::severity::Severity;

/// Resolved geographic point. Every call after the initial current-weather
/// lookup is made with coordinates, never the free-text name, so current
/// conditions, forecasts and alerts all describe the same place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// What the user asked for: a free-text place name or an exact point.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    City(String),
    Coords(Coordinates),
}

/// Snapshot of current conditions, replaced wholesale on each successful
/// query. Temperatures are Celsius; conversion happens at display time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location: String,
    pub temperature_c: f64,
    pub description: String,
    pub humidity_pct: u8,
    pub wind_speed_mps: f64,
    pub icon: String,
    pub feels_like_c: f64,
    pub pressure_hpa: u32,
    pub visibility_m: Option<u32>,
    /// Epoch seconds, when the provider reports them.
    pub sunrise: Option<i64>,
    pub sunset: Option<i64>,
    pub coords: Coordinates,
}

/// One daily forecast entry.
///
/// Everything past the first four fields is optional: the legacy 3-hourly
/// source cannot supply min/max aggregates, UV index or a reliable
/// precipitation probability for a whole day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecast {
    pub date: DateTime<Utc>,
    pub temperature_c: f64,
    pub description: String,
    pub icon: String,
    pub min_temp_c: Option<f64>,
    pub max_temp_c: Option<f64>,
    pub humidity_pct: Option<u8>,
    pub wind_speed_mps: Option<f64>,
    /// Probability of precipitation, 0-100.
    pub precipitation_pct: Option<f64>,
    pub uvi: Option<f64>,
}

/// One hourly forecast entry. On the fallback path these arrive at 3-hour
/// resolution, not one per hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyForecast {
    pub time: DateTime<Utc>,
    pub temperature_c: f64,
    pub icon: String,
    pub description: String,
    pub precipitation_pct: Option<f64>,
    pub wind_speed_mps: Option<f64>,
}

/// A severe-weather alert with its severity tier derived from the
/// free-text description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub sender: String,
    pub event: String,
    /// Epoch seconds.
    pub start: i64,
    pub end: i64,
    pub description: String,
    pub severity: Severity,
}

/// A geocoding suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    /// Administrative subdivision, e.g. a state or province.
    pub state: Option<String>,
    pub country: String,
    pub coords: Coordinates,
}

impl Place {
    /// Display label, e.g. "Springfield, Illinois, US".
    pub fn label(&self) -> String {
        match &self.state {
            Some(state) => format!("{}, {}, {}", self.name, state, self.country),
            None => format!("{}, {}", self.name, self.country),
        }
    }
}

/// The orchestrator's result: one consistent view of a location, assembled
/// atomically. `daily5` is always the prefix of `daily10`; entries past the
/// fifth may be synthesized when the unified source was unavailable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub current: CurrentConditions,
    pub daily5: Vec<DailyForecast>,
    pub daily10: Vec<DailyForecast>,
    pub hourly: Vec<HourlyForecast>,
    pub alerts: Vec<Alert>,
}
