use reqwest::StatusCode;
use thiserror::Error;

/// What a failed lookup means for the caller.
///
/// The mandatory current-conditions call surfaces these verbatim. The
/// unified-forecast call swallows its own failures and the pipeline falls
/// back to the legacy endpoint instead; only a failed fallback surfaces.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("invalid or missing OpenWeather API key")]
    Authentication,

    #[error("location not found")]
    LocationNotFound,

    #[error("no places matched the search")]
    NoResults,

    #[error("too many requests, the provider is rate limiting this key")]
    RateLimited,

    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(reqwest::Error),

    #[error("provider error {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("unexpected provider response: {0}")]
    Parse(String),
}

/// Which kind of lookup produced a non-success status. A 404 means
/// different things for a name lookup, a geocoding query and a
/// coordinate fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    ByName,
    ByCoords,
    Geocode,
}

impl WeatherError {
    /// Map a non-success HTTP status to the error taxonomy.
    pub fn from_status(status: StatusCode, lookup: Lookup, body: &str) -> Self {
        match status.as_u16() {
            401 => WeatherError::Authentication,
            404 if lookup == Lookup::ByName => WeatherError::LocationNotFound,
            404 if lookup == Lookup::Geocode => WeatherError::NoResults,
            429 => WeatherError::RateLimited,
            code => WeatherError::Provider { status: code, message: truncate_body(body) },
        }
    }

    /// Map a transport-level failure, keeping timeouts distinct.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() { WeatherError::Timeout } else { WeatherError::Network(err) }
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX { format!("{}...", &body[..MAX]) } else { body.to_string() }
}
