use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::{
    config,
    error::{Lookup, WeatherError},
    model::{
        Alert, Coordinates, CurrentConditions, DailyForecast, HourlyForecast, LocationQuery, Place,
    },
    provider::{LegacyForecast, UnifiedForecast, WeatherProvider},
    severity::Severity,
};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

/// Per-call timeout; a hung upstream must not hang the whole pipeline.
const HTTP_TIMEOUT_SECS: u64 = 10;

/// Real entries the unified endpoint contributes to the 10-day view.
const UNIFIED_DAILY_CAP: usize = 10;
/// Hourly entries the unified endpoint contributes (next 24 hours).
const UNIFIED_HOURLY_CAP: usize = 24;
/// 3-hour entries per sampled day on the legacy endpoint (8 x 3h = 24h).
const LEGACY_DAY_STRIDE: usize = 8;
/// Sampled days the legacy endpoint can supply.
const LEGACY_DAILY_CAP: usize = 5;

/// Client for the OpenWeather REST API: current conditions, the unified
/// forecast+alerts endpoint, the legacy 3-hourly forecast and geocoding.
///
/// A placeholder credential short-circuits every call with
/// [`WeatherError::Authentication`] before any network I/O.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, WeatherError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Client against a custom base URL; tests point this at a local mock.
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, WeatherError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(WeatherError::Network)?;

        Ok(Self { api_key: api_key.into(), base_url: base_url.into(), http })
    }

    fn ensure_key(&self) -> Result<(), WeatherError> {
        if config::is_placeholder(&self.api_key) {
            return Err(WeatherError::Authentication);
        }
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        lookup: Lookup,
    ) -> Result<T, WeatherError> {
        self.ensure_key()?;

        tracing::debug!(path, "requesting OpenWeather endpoint");

        let res = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .query(params)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(WeatherError::from_transport)?;

        let status = res.status();
        let body = res.text().await.map_err(WeatherError::from_transport)?;

        if !status.is_success() {
            return Err(WeatherError::from_status(status, lookup, &body));
        }

        serde_json::from_str(&body).map_err(|err| WeatherError::Parse(err.to_string()))
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current(&self, query: &LocationQuery) -> Result<CurrentConditions, WeatherError> {
        let (params, lookup) = match query {
            LocationQuery::City(name) => {
                (vec![("q", name.clone()), ("units", "metric".to_string())], Lookup::ByName)
            }
            LocationQuery::Coords(coords) => (
                vec![
                    ("lat", coords.lat.to_string()),
                    ("lon", coords.lon.to_string()),
                    ("units", "metric".to_string()),
                ],
                Lookup::ByCoords,
            ),
        };

        let parsed: OwCurrentResponse =
            self.get_json("/data/2.5/weather", &params, lookup).await?;

        Ok(current_from_response(parsed))
    }

    async fn one_call(&self, coords: Coordinates) -> Result<UnifiedForecast, WeatherError> {
        let params = vec![
            ("lat", coords.lat.to_string()),
            ("lon", coords.lon.to_string()),
            ("exclude", "current,minutely".to_string()),
            ("units", "metric".to_string()),
        ];

        let parsed: OwOneCallResponse =
            self.get_json("/data/2.5/onecall", &params, Lookup::ByCoords).await?;

        Ok(unified_from_response(parsed))
    }

    async fn legacy_forecast(&self, coords: Coordinates) -> Result<LegacyForecast, WeatherError> {
        let params = vec![
            ("lat", coords.lat.to_string()),
            ("lon", coords.lon.to_string()),
            ("units", "metric".to_string()),
        ];

        let parsed: OwForecastResponse =
            self.get_json("/data/2.5/forecast", &params, Lookup::ByCoords).await?;

        Ok(legacy_from_response(parsed))
    }

    async fn geocode(&self, query: &str, limit: u8) -> Result<Vec<Place>, WeatherError> {
        let params = vec![("q", query.to_string()), ("limit", limit.to_string())];

        let parsed: Vec<OwGeocodeEntry> =
            self.get_json("/geo/1.0/direct", &params, Lookup::Geocode).await?;

        Ok(parsed.into_iter().map(place_from_entry).collect())
    }

    async fn probe_key(&self) -> Result<(), WeatherError> {
        self.ensure_key()?;

        // Cheap fixed-city request; only the status matters.
        let res = self
            .http
            .get(format!("{}/data/2.5/weather", self.base_url))
            .query(&[("q", "London"), ("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(WeatherError::from_transport)?;

        if res.status() == StatusCode::UNAUTHORIZED {
            return Err(WeatherError::Authentication);
        }

        Ok(())
    }
}

// --- wire schemas -----------------------------------------------------------

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    sunrise: Option<i64>,
    sunset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    coord: OwCoord,
    main: OwCurrentMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
    visibility: Option<u32>,
    #[serde(default)]
    sys: OwSys,
}

#[derive(Debug, Deserialize)]
struct OwDailyTemp {
    day: f64,
    min: Option<f64>,
    max: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwDaily {
    dt: i64,
    temp: OwDailyTemp,
    humidity: Option<u8>,
    wind_speed: Option<f64>,
    pop: Option<f64>,
    uvi: Option<f64>,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwHourly {
    dt: i64,
    temp: f64,
    pop: Option<f64>,
    wind_speed: Option<f64>,
    #[serde(default)]
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwAlert {
    #[serde(default)]
    sender_name: String,
    event: String,
    start: i64,
    end: i64,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwOneCallResponse {
    #[serde(default)]
    daily: Vec<OwDaily>,
    #[serde(default)]
    hourly: Vec<OwHourly>,
    alerts: Option<Vec<OwAlert>>,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp: f64,
    temp_min: Option<f64>,
    temp_max: Option<f64>,
    humidity: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwForecastMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
    pop: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwGeocodeEntry {
    name: String,
    state: Option<String>,
    #[serde(default)]
    country: String,
    lat: f64,
    lon: f64,
}

// --- adapters ---------------------------------------------------------------
//
// One total mapping per source schema. Absent optional fields stay absent;
// precipitation probability is rescaled from the wire's [0,1] fraction to
// a [0,100] percentage; instants become `DateTime<Utc>` on both paths.

fn current_from_response(raw: OwCurrentResponse) -> CurrentConditions {
    let (description, icon) = first_condition(&raw.weather);

    CurrentConditions {
        location: raw.name,
        temperature_c: raw.main.temp,
        description,
        humidity_pct: raw.main.humidity,
        wind_speed_mps: raw.wind.speed,
        icon,
        feels_like_c: raw.main.feels_like,
        pressure_hpa: raw.main.pressure,
        visibility_m: raw.visibility,
        sunrise: raw.sys.sunrise,
        sunset: raw.sys.sunset,
        coords: Coordinates { lat: raw.coord.lat, lon: raw.coord.lon },
    }
}

fn unified_from_response(raw: OwOneCallResponse) -> UnifiedForecast {
    UnifiedForecast {
        daily: raw.daily.into_iter().take(UNIFIED_DAILY_CAP).map(daily_from_entry).collect(),
        hourly: raw.hourly.into_iter().take(UNIFIED_HOURLY_CAP).map(hourly_from_entry).collect(),
        alerts: raw.alerts.unwrap_or_default().into_iter().map(alert_from_entry).collect(),
    }
}

fn legacy_from_response(raw: OwForecastResponse) -> LegacyForecast {
    // One sample every 24h, not a daily aggregate: min/max here are a
    // single 3-hour slot's temp_min/temp_max.
    let daily = raw
        .list
        .iter()
        .step_by(LEGACY_DAY_STRIDE)
        .take(LEGACY_DAILY_CAP)
        .map(daily_from_legacy_entry)
        .collect();

    // The next 24 hours at 3-hour resolution, not 24 true hourly points.
    let hourly = raw.list.iter().take(LEGACY_DAY_STRIDE).map(hourly_from_legacy_entry).collect();

    LegacyForecast { daily, hourly }
}

fn daily_from_entry(day: OwDaily) -> DailyForecast {
    let (description, icon) = first_condition(&day.weather);

    DailyForecast {
        date: unix_to_utc(day.dt).unwrap_or_else(Utc::now),
        temperature_c: day.temp.day,
        description,
        icon,
        min_temp_c: day.temp.min,
        max_temp_c: day.temp.max,
        humidity_pct: day.humidity,
        wind_speed_mps: day.wind_speed,
        precipitation_pct: day.pop.map(|p| p * 100.0),
        uvi: day.uvi,
    }
}

fn hourly_from_entry(hour: OwHourly) -> HourlyForecast {
    let (description, icon) = first_condition(&hour.weather);

    HourlyForecast {
        time: unix_to_utc(hour.dt).unwrap_or_else(Utc::now),
        temperature_c: hour.temp,
        icon,
        description,
        precipitation_pct: hour.pop.map(|p| p * 100.0),
        wind_speed_mps: hour.wind_speed,
    }
}

fn daily_from_legacy_entry(entry: &OwForecastEntry) -> DailyForecast {
    let (description, icon) = first_condition(&entry.weather);

    DailyForecast {
        date: unix_to_utc(entry.dt).unwrap_or_else(Utc::now),
        temperature_c: entry.main.temp,
        description,
        icon,
        min_temp_c: entry.main.temp_min,
        max_temp_c: entry.main.temp_max,
        humidity_pct: entry.main.humidity,
        wind_speed_mps: Some(entry.wind.speed),
        precipitation_pct: entry.pop.map(|p| p * 100.0),
        uvi: None,
    }
}

fn hourly_from_legacy_entry(entry: &OwForecastEntry) -> HourlyForecast {
    let (description, icon) = first_condition(&entry.weather);

    HourlyForecast {
        time: unix_to_utc(entry.dt).unwrap_or_else(Utc::now),
        temperature_c: entry.main.temp,
        icon,
        description,
        precipitation_pct: entry.pop.map(|p| p * 100.0),
        wind_speed_mps: Some(entry.wind.speed),
    }
}

fn alert_from_entry(alert: OwAlert) -> Alert {
    let severity = Severity::classify(&alert.description);

    Alert {
        sender: alert.sender_name,
        event: alert.event,
        start: alert.start,
        end: alert.end,
        description: alert.description,
        severity,
    }
}

fn place_from_entry(entry: OwGeocodeEntry) -> Place {
    Place {
        name: entry.name,
        state: entry.state,
        country: entry.country,
        coords: Coordinates { lat: entry.lat, lon: entry.lon },
    }
}

fn first_condition(weather: &[OwWeather]) -> (String, String) {
    weather
        .first()
        .map(|w| (w.description.clone(), w.icon.clone()))
        .unwrap_or_else(|| ("Unknown".to_string(), String::new()))
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}
