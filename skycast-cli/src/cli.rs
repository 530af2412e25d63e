use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use inquire::{Confirm, Select};
use std::sync::Arc;

use skycast_core::{
    Coordinates, LocationQuery, OpenWeatherClient, Preferences, TemperatureUnit, config,
    geocode::{Suggester, Suggestion},
    resolve_weather,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "Terminal weather dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the dashboard for a place name or a coordinate pair.
    Show {
        /// Place name, e.g. "Lisbon" or "Springfield,US".
        #[arg(conflicts_with_all = ["lat", "lon"])]
        place: Option<String>,

        /// Latitude, used together with --lon instead of a place name.
        #[arg(long, requires = "lon")]
        lat: Option<f64>,

        /// Longitude, used together with --lat instead of a place name.
        #[arg(long, requires = "lat")]
        lon: Option<f64>,

        /// Show the 10-day view; days beyond the fifth may be synthesized.
        #[arg(long)]
        extended: bool,
    },

    /// Look up place-name suggestions for a partial query.
    Search {
        /// At least two characters of a place name.
        query: String,
    },

    /// Interactively edit display preferences (unit, color scheme).
    Configure,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Show { place, lat, lon, extended } => show(place, lat, lon, extended).await,
            Command::Search { query } => search(&query).await,
            Command::Configure => configure(),
        }
    }
}

fn client() -> Result<OpenWeatherClient> {
    let key = config::api_key_from_env().with_context(|| {
        format!(
            "No OpenWeather API key configured.\n\
             Hint: set {} to your key (see https://openweathermap.org/api).",
            config::API_KEY_VAR
        )
    })?;

    OpenWeatherClient::new(key).context("Failed to build the HTTP client")
}

async fn show(
    place: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    extended: bool,
) -> Result<()> {
    let query = match (place, lat, lon) {
        (Some(city), None, None) => LocationQuery::City(city),
        (None, Some(lat), Some(lon)) => LocationQuery::Coords(Coordinates { lat, lon }),
        _ => bail!("Pass a place name, or both --lat and --lon."),
    };

    let prefs = Preferences::load();
    let provider = client()?;

    tracing::debug!(?query, "resolving weather");
    let report = resolve_weather(&provider, &query).await?;

    print!("{}", render::dashboard(&report, prefs.unit, extended));
    Ok(())
}

async fn search(query: &str) -> Result<()> {
    let suggester = Suggester::new(Arc::new(client()?));

    match suggester.suggest(query).await? {
        Suggestion::Superseded => {}
        Suggestion::Places(places) => {
            for place in places {
                println!("{:<40} ({:.4}, {:.4})", place.label(), place.coords.lat, place.coords.lon);
            }
        }
    }

    Ok(())
}

fn configure() -> Result<()> {
    let current = Preferences::load();

    let units = vec![TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit];
    let cursor = units.iter().position(|u| *u == current.unit).unwrap_or(0);
    let unit = Select::new("Temperature unit:", units)
        .with_starting_cursor(cursor)
        .prompt()
        .context("Unit selection aborted")?;

    let dark_mode = Confirm::new("Use the dark color scheme?")
        .with_default(current.dark_mode)
        .prompt()
        .context("Color scheme selection aborted")?;

    let prefs = Preferences { unit, dark_mode };
    prefs.save()?;

    println!("Preferences saved to {}", Preferences::file_path()?.display());
    Ok(())
}
