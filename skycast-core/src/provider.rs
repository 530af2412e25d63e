use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::WeatherError,
    model::{
        Alert, Coordinates, CurrentConditions, DailyForecast, HourlyForecast, LocationQuery, Place,
    },
};

pub mod openweather;

/// Daily, hourly and alert series from the unified forecast endpoint,
/// already normalized to canonical records. Up to 10 daily and 24 hourly
/// entries, all real data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnifiedForecast {
    pub daily: Vec<DailyForecast>,
    pub hourly: Vec<HourlyForecast>,
    pub alerts: Vec<Alert>,
}

/// Series derived from the legacy 3-hour-resolution endpoint: one sampled
/// entry per day (up to 5) and the next 24 hours at 3-hour spacing. This
/// source carries no alert data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyForecast {
    pub daily: Vec<DailyForecast>,
    pub hourly: Vec<HourlyForecast>,
}

/// The upstream operations the forecast pipeline and the geocoding
/// suggester consume. Implemented by [`openweather::OpenWeatherClient`];
/// tests substitute scripted implementations.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions for a place name or coordinate pair.
    async fn current(&self, query: &LocationQuery) -> Result<CurrentConditions, WeatherError>;

    /// The unified forecast+alerts endpoint at resolved coordinates.
    async fn one_call(&self, coords: Coordinates) -> Result<UnifiedForecast, WeatherError>;

    /// The legacy 3-hourly forecast at resolved coordinates.
    async fn legacy_forecast(&self, coords: Coordinates) -> Result<LegacyForecast, WeatherError>;

    /// Place-name suggestions for a partial query.
    async fn geocode(&self, query: &str, limit: u8) -> Result<Vec<Place>, WeatherError>;

    /// Lightweight credential validity check, used before geocoding.
    async fn probe_key(&self) -> Result<(), WeatherError>;
}
