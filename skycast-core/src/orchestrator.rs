//! The forecast pipeline: one parameterized flow for both entry points
//! (place name or coordinates) producing a single consistent
//! [`WeatherReport`].
//!
//! The unified forecast endpoint is the primary source; when it is
//! unavailable the pipeline silently falls back to the legacy 3-hourly
//! endpoint and synthesizes the missing extended-forecast days.

use rand::thread_rng;

use crate::{
    error::WeatherError,
    model::{LocationQuery, WeatherReport},
    provider::WeatherProvider,
    synth,
};

/// Days the extended tab always shows.
const EXTENDED_DAYS: usize = 10;
/// Days the primary tab shows; also the real-data cap on the legacy path.
const PRIMARY_DAYS: usize = 5;

/// Resolve a location into current conditions, hourly and daily forecasts
/// and active alerts.
///
/// Only the mandatory current-conditions call aborts the whole operation.
/// A unified-forecast failure is logged and recovered via the legacy
/// endpoint; a legacy failure is classified and surfaced like a step-1
/// error. Nothing is returned until the full report is assembled, so the
/// caller can replace its snapshot atomically.
pub async fn resolve_weather<P>(
    provider: &P,
    query: &LocationQuery,
) -> Result<WeatherReport, WeatherError>
where
    P: WeatherProvider + ?Sized,
{
    let current = provider.current(query).await?;

    // All further calls use the resolved point, never the free-text name,
    // so forecasts and alerts describe the same place as the conditions.
    let coords = current.coords;

    match provider.one_call(coords).await {
        Ok(unified) => {
            let daily10: Vec<_> = unified.daily.into_iter().take(EXTENDED_DAYS).collect();
            let daily5 = daily10.iter().take(PRIMARY_DAYS).cloned().collect();

            return Ok(WeatherReport {
                current,
                daily5,
                daily10,
                hourly: unified.hourly,
                alerts: unified.alerts,
            });
        }
        Err(err) => {
            // The unified endpoint may be disabled for this API tier; the
            // caller only ever sees the fallback result.
            tracing::warn!("unified forecast unavailable, falling back to legacy endpoint: {err}");
        }
    }

    let legacy = provider.legacy_forecast(coords).await?;

    let daily5: Vec<_> = legacy.daily.into_iter().take(PRIMARY_DAYS).collect();
    let base = daily5.last().ok_or_else(|| {
        WeatherError::Parse("legacy forecast response contained no data".to_string())
    })?;

    let mut daily10 = daily5.clone();
    daily10.extend(synth::extend_forecast(&mut thread_rng(), base, EXTENDED_DAYS - daily5.len()));

    Ok(WeatherReport {
        current,
        daily5,
        daily10,
        hourly: legacy.hourly,
        // The legacy source carries no alert data; never carry alerts over
        // from a previous location.
        alerts: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use std::sync::Mutex;

    use crate::model::{
        Alert, Coordinates, CurrentConditions, DailyForecast, HourlyForecast, Place,
    };
    use crate::provider::{LegacyForecast, UnifiedForecast};
    use crate::severity::Severity;

    #[derive(Debug, Default)]
    struct ScriptedProvider {
        deny_current: bool,
        unified: Option<UnifiedForecast>,
        legacy: Option<LegacyForecast>,
        calls: Mutex<Vec<&'static str>>,
    }

    impl ScriptedProvider {
        fn record(&self, call: &'static str) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<&'static str> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WeatherProvider for ScriptedProvider {
        async fn current(
            &self,
            _query: &LocationQuery,
        ) -> Result<CurrentConditions, WeatherError> {
            self.record("current");
            if self.deny_current {
                return Err(WeatherError::Authentication);
            }
            Ok(sample_current())
        }

        async fn one_call(&self, _coords: Coordinates) -> Result<UnifiedForecast, WeatherError> {
            self.record("one_call");
            self.unified.clone().ok_or(WeatherError::Provider {
                status: 500,
                message: "unified endpoint disabled".to_string(),
            })
        }

        async fn legacy_forecast(
            &self,
            _coords: Coordinates,
        ) -> Result<LegacyForecast, WeatherError> {
            self.record("legacy_forecast");
            self.legacy.clone().ok_or(WeatherError::Provider {
                status: 502,
                message: "legacy endpoint down".to_string(),
            })
        }

        async fn geocode(&self, _query: &str, _limit: u8) -> Result<Vec<Place>, WeatherError> {
            unreachable!("geocoding is not part of the pipeline")
        }

        async fn probe_key(&self) -> Result<(), WeatherError> {
            unreachable!("key probing is not part of the pipeline")
        }
    }

    fn sample_current() -> CurrentConditions {
        CurrentConditions {
            location: "Lisbon".to_string(),
            temperature_c: 21.4,
            description: "few clouds".to_string(),
            humidity_pct: 56,
            wind_speed_mps: 4.1,
            icon: "02d".to_string(),
            feels_like_c: 21.0,
            pressure_hpa: 1018,
            visibility_m: Some(10000),
            sunrise: Some(1714536000),
            sunset: Some(1714586000),
            coords: Coordinates { lat: 38.72, lon: -9.14 },
        }
    }

    fn sample_days(count: usize) -> Vec<DailyForecast> {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        (0..count)
            .map(|i| DailyForecast {
                date: start + Duration::days(i as i64),
                temperature_c: 15.0 + i as f64,
                description: "scattered clouds".to_string(),
                icon: "03d".to_string(),
                min_temp_c: Some(12.0),
                max_temp_c: Some(19.0),
                humidity_pct: Some(60),
                wind_speed_mps: Some(3.0),
                precipitation_pct: Some(10.0),
                uvi: None,
            })
            .collect()
    }

    fn sample_hours(count: usize) -> Vec<HourlyForecast> {
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        (0..count)
            .map(|i| HourlyForecast {
                time: start + Duration::hours(i as i64),
                temperature_c: 18.0,
                icon: "01d".to_string(),
                description: "clear sky".to_string(),
                precipitation_pct: Some(0.0),
                wind_speed_mps: Some(2.5),
            })
            .collect()
    }

    fn city() -> LocationQuery {
        LocationQuery::City("Lisbon".to_string())
    }

    #[tokio::test]
    async fn unified_path_yields_ten_real_days_and_alerts() {
        let provider = ScriptedProvider {
            unified: Some(UnifiedForecast {
                daily: sample_days(10),
                hourly: sample_hours(24),
                alerts: vec![Alert {
                    sender: "NWS".to_string(),
                    event: "Thunderstorm".to_string(),
                    start: 1714540000,
                    end: 1714560000,
                    description: "Severe Thunderstorm Warning".to_string(),
                    severity: Severity::Severe,
                }],
            }),
            ..Default::default()
        };

        let report = resolve_weather(&provider, &city()).await.expect("report");

        assert_eq!(report.daily10.len(), 10);
        assert_eq!(report.daily5, report.daily10[..5]);
        assert_eq!(report.hourly.len(), 24);
        assert_eq!(report.alerts.len(), 1);
        assert_eq!(provider.calls(), vec!["current", "one_call"]);
    }

    #[tokio::test]
    async fn current_failure_aborts_before_any_forecast_call() {
        let provider = ScriptedProvider { deny_current: true, ..Default::default() };

        let err = resolve_weather(&provider, &city()).await.unwrap_err();

        assert!(matches!(err, WeatherError::Authentication));
        assert_eq!(provider.calls(), vec!["current"]);
    }

    #[tokio::test]
    async fn fallback_synthesizes_the_extended_days() {
        let provider = ScriptedProvider {
            legacy: Some(LegacyForecast { daily: sample_days(5), hourly: sample_hours(8) }),
            ..Default::default()
        };

        let report = resolve_weather(&provider, &city()).await.expect("report");

        assert!(report.alerts.is_empty());
        assert_eq!(report.daily10.len(), 10);
        assert_eq!(report.daily5, report.daily10[..5]);
        assert_eq!(report.daily5, sample_days(5));
        // 8 entries at 3-hour spacing, not 24 true hourly points.
        assert_eq!(report.hourly.len(), 8);

        let base = &report.daily5[4];
        for (i, day) in report.daily10[5..].iter().enumerate() {
            assert!((day.temperature_c - base.temperature_c).abs() <= 2.0);
            assert_eq!(day.date, base.date + Duration::days(i as i64 + 1));
        }

        assert_eq!(provider.calls(), vec!["current", "one_call", "legacy_forecast"]);
    }

    #[tokio::test]
    async fn fallback_failure_is_surfaced() {
        let provider = ScriptedProvider::default();

        let err = resolve_weather(&provider, &city()).await.unwrap_err();

        assert!(matches!(err, WeatherError::Provider { status: 502, .. }));
    }

    #[tokio::test]
    async fn empty_legacy_series_is_a_parse_error() {
        let provider =
            ScriptedProvider { legacy: Some(LegacyForecast::default()), ..Default::default() };

        let err = resolve_weather(&provider, &city()).await.unwrap_err();

        assert!(matches!(err, WeatherError::Parse(_)));
    }

    #[tokio::test]
    async fn real_fields_survive_the_unified_path_unchanged() {
        let provider = ScriptedProvider {
            unified: Some(UnifiedForecast {
                daily: sample_days(10),
                hourly: sample_hours(24),
                alerts: Vec::new(),
            }),
            ..Default::default()
        };

        let first = resolve_weather(&provider, &city()).await.expect("first");
        let second = resolve_weather(&provider, &city()).await.expect("second");

        // Stable upstream, stable real data: no randomness on this path.
        assert_eq!(first.current, second.current);
        assert_eq!(first.daily5, second.daily5);
        assert_eq!(first.hourly, second.hourly);
        assert_eq!(first.daily10, second.daily10);
    }
}
