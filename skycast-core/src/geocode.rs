//! Incremental place-name lookup backing the search box.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::{error::WeatherError, model::Place, provider::WeatherProvider};

/// Shortest query worth sending upstream.
const MIN_QUERY_CHARS: usize = 2;
/// Quiescent period before a query actually goes out.
const DEBOUNCE: Duration = Duration::from_millis(300);
/// Suggestions requested from the geocoding endpoint.
const SUGGESTION_LIMIT: u8 = 5;

/// Outcome of one suggestion lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Suggestion {
    /// A newer query arrived while this one waited out the debounce; its
    /// result must not overwrite the newer one's.
    Superseded,
    Places(Vec<Place>),
}

/// Debounced, last-query-wins geocoding lookup.
///
/// Every call stamps a monotonic generation. A call that is no longer the
/// newest when its debounce expires returns [`Suggestion::Superseded`]
/// without touching the network, so rapid edits cost at most one request
/// per quiescent period and stale results cannot race current ones.
///
/// Errors here are the suggester's own channel; a failed lookup never
/// affects a weather query in flight.
#[derive(Debug, Clone)]
pub struct Suggester<P> {
    provider: Arc<P>,
    generation: Arc<AtomicU64>,
    debounce: Duration,
}

impl<P: WeatherProvider> Suggester<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider, generation: Arc::new(AtomicU64::new(0)), debounce: DEBOUNCE }
    }

    /// Override the debounce interval; tests use a short one.
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Look up place suggestions for a partial query.
    pub async fn suggest(&self, query: &str) -> Result<Suggestion, WeatherError> {
        if query.chars().count() < MIN_QUERY_CHARS {
            return Ok(Suggestion::Places(Vec::new()));
        }

        let token = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.debounce).await;
        if self.generation.load(Ordering::SeqCst) != token {
            tracing::debug!(query, "suggestion query superseded during debounce");
            return Ok(Suggestion::Superseded);
        }

        // Validate the credential first so a bad key fails fast instead of
        // burning the geocoding call.
        self.provider.probe_key().await?;

        let places = self.provider.geocode(query, SUGGESTION_LIMIT).await?;
        if places.is_empty() {
            return Err(WeatherError::NoResults);
        }

        Ok(Suggestion::Places(places))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    use crate::model::{Coordinates, CurrentConditions, LocationQuery};
    use crate::provider::{LegacyForecast, UnifiedForecast};

    #[derive(Debug, Default)]
    struct ScriptedGeocoder {
        deny_key: bool,
        places: Vec<Place>,
        probes: AtomicUsize,
        lookups: AtomicUsize,
    }

    #[async_trait]
    impl WeatherProvider for ScriptedGeocoder {
        async fn current(
            &self,
            _query: &LocationQuery,
        ) -> Result<CurrentConditions, WeatherError> {
            unreachable!("not used by the suggester")
        }

        async fn one_call(&self, _coords: Coordinates) -> Result<UnifiedForecast, WeatherError> {
            unreachable!("not used by the suggester")
        }

        async fn legacy_forecast(
            &self,
            _coords: Coordinates,
        ) -> Result<LegacyForecast, WeatherError> {
            unreachable!("not used by the suggester")
        }

        async fn geocode(&self, _query: &str, limit: u8) -> Result<Vec<Place>, WeatherError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self.places.iter().take(limit as usize).cloned().collect())
        }

        async fn probe_key(&self) -> Result<(), WeatherError> {
            self.probes.fetch_add(1, Ordering::SeqCst);
            if self.deny_key {
                return Err(WeatherError::Authentication);
            }
            Ok(())
        }
    }

    fn lisbon() -> Place {
        Place {
            name: "Lisbon".to_string(),
            state: None,
            country: "PT".to_string(),
            coords: Coordinates { lat: 38.7, lon: -9.1 },
        }
    }

    fn suggester(provider: ScriptedGeocoder) -> Suggester<ScriptedGeocoder> {
        Suggester::new(Arc::new(provider)).with_debounce(Duration::from_millis(10))
    }

    #[tokio::test]
    async fn short_queries_return_empty_without_network() {
        let suggester = suggester(ScriptedGeocoder::default());

        let outcome = suggester.suggest("L").await.expect("short query");

        assert_eq!(outcome, Suggestion::Places(Vec::new()));
        assert_eq!(suggester.provider.probes.load(Ordering::SeqCst), 0);
        assert_eq!(suggester.provider.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn matching_places_are_returned() {
        let provider = ScriptedGeocoder { places: vec![lisbon()], ..Default::default() };
        let suggester = suggester(provider);

        let outcome = suggester.suggest("Lis").await.expect("suggestions");

        assert_eq!(outcome, Suggestion::Places(vec![lisbon()]));
        assert_eq!(suggester.provider.probes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn rapid_edits_supersede_the_older_query() {
        let provider = ScriptedGeocoder { places: vec![lisbon()], ..Default::default() };
        let suggester = suggester(provider);

        let (first, second) = tokio::join!(suggester.suggest("Lis"), suggester.suggest("Lisb"));

        assert_eq!(first.expect("first"), Suggestion::Superseded);
        assert_eq!(second.expect("second"), Suggestion::Places(vec![lisbon()]));
        // Only the winning query reached the network.
        assert_eq!(suggester.provider.lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn bad_credential_fails_before_the_geocode_call() {
        let provider =
            ScriptedGeocoder { deny_key: true, places: vec![lisbon()], ..Default::default() };
        let suggester = suggester(provider);

        let err = suggester.suggest("Lis").await.unwrap_err();

        assert!(matches!(err, WeatherError::Authentication));
        assert_eq!(suggester.provider.lookups.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn no_matches_is_a_classified_error() {
        let suggester = suggester(ScriptedGeocoder::default());

        let err = suggester.suggest("Zzz").await.unwrap_err();

        assert!(matches!(err, WeatherError::NoResults));
    }
}
