//! Core library for the `skycast` weather dashboard.
//!
//! This crate defines:
//! - Canonical weather, forecast and alert records
//! - The OpenWeather client and per-schema adapters
//! - The forecast orchestrator (primary fetch, legacy fallback, synthesis)
//! - Geocoding suggestions, unit conversion and preference handling
//!
//! It is used by `skycast-cli`, but can also be reused by other frontends.

pub mod config;
pub mod error;
pub mod geocode;
pub mod model;
pub mod orchestrator;
pub mod provider;
pub mod severity;
pub mod state;
pub mod synth;
pub mod units;

pub use config::Preferences;
pub use error::WeatherError;
pub use model::{
    Alert, Coordinates, CurrentConditions, DailyForecast, HourlyForecast, LocationQuery, Place,
    WeatherReport,
};
pub use orchestrator::resolve_weather;
pub use provider::{WeatherProvider, openweather::OpenWeatherClient};
pub use severity::Severity;
pub use state::{DashboardState, RequestToken};
pub use units::TemperatureUnit;
