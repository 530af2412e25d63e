//! Presentation-facing state for the dashboard, decoupled from any UI
//! framework's own state primitives.

use crate::{error::WeatherError, model::WeatherReport};

/// Identifies one query so late results can be told apart from current
/// ones when the user re-searches before the previous query settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestToken(u64);

/// Holds the latest successful snapshot and drives the
/// loading/result/error transitions. Results and errors from superseded
/// queries are ignored (last-requested wins), so overlapping queries
/// cannot overwrite newer data with stale data.
#[derive(Debug, Default)]
pub struct DashboardState {
    report: Option<WeatherReport>,
    last_error: Option<String>,
    loading: bool,
    latest: u64,
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new query; any outstanding older query becomes stale.
    pub fn begin_query(&mut self) -> RequestToken {
        self.latest += 1;
        self.loading = true;
        self.last_error = None;
        RequestToken(self.latest)
    }

    /// Install a successful result, replacing the snapshot wholesale.
    /// Stale tokens are dropped.
    pub fn apply_result(&mut self, token: RequestToken, report: WeatherReport) {
        if token.0 != self.latest {
            return;
        }
        self.report = Some(report);
        self.last_error = None;
        self.loading = false;
    }

    /// Record a failure. The previous successful snapshot is retained so
    /// the dashboard keeps showing the last good data.
    pub fn apply_error(&mut self, token: RequestToken, error: &WeatherError) {
        if token.0 != self.latest {
            return;
        }
        self.last_error = Some(error.to_string());
        self.loading = false;
    }

    pub fn report(&self) -> Option<&WeatherReport> {
        self.report.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Coordinates, CurrentConditions};

    fn report(location: &str) -> WeatherReport {
        WeatherReport {
            current: CurrentConditions {
                location: location.to_string(),
                temperature_c: 20.0,
                description: "clear sky".to_string(),
                humidity_pct: 50,
                wind_speed_mps: 3.0,
                icon: "01d".to_string(),
                feels_like_c: 20.0,
                pressure_hpa: 1015,
                visibility_m: None,
                sunrise: None,
                sunset: None,
                coords: Coordinates { lat: 0.0, lon: 0.0 },
            },
            daily5: Vec::new(),
            daily10: Vec::new(),
            hourly: Vec::new(),
            alerts: Vec::new(),
        }
    }

    #[test]
    fn result_replaces_the_snapshot_and_clears_loading() {
        let mut state = DashboardState::new();
        let token = state.begin_query();
        assert!(state.is_loading());

        state.apply_result(token, report("Lisbon"));

        assert!(!state.is_loading());
        assert_eq!(state.report().unwrap().current.location, "Lisbon");
        assert!(state.last_error().is_none());
    }

    #[test]
    fn stale_results_are_dropped() {
        let mut state = DashboardState::new();
        let stale = state.begin_query();
        let fresh = state.begin_query();

        state.apply_result(fresh, report("Porto"));
        // The slower, older query settles afterwards; it must not win.
        state.apply_result(stale, report("Lisbon"));

        assert_eq!(state.report().unwrap().current.location, "Porto");
    }

    #[test]
    fn errors_retain_the_previous_snapshot() {
        let mut state = DashboardState::new();
        let token = state.begin_query();
        state.apply_result(token, report("Lisbon"));

        let token = state.begin_query();
        state.apply_error(token, &WeatherError::LocationNotFound);

        assert_eq!(state.report().unwrap().current.location, "Lisbon");
        assert_eq!(state.last_error(), Some("location not found"));
        assert!(!state.is_loading());
    }

    #[test]
    fn stale_errors_do_not_clobber_fresh_results() {
        let mut state = DashboardState::new();
        let stale = state.begin_query();
        let fresh = state.begin_query();

        state.apply_result(fresh, report("Porto"));
        state.apply_error(stale, &WeatherError::RateLimited);

        assert!(state.last_error().is_none());
        assert_eq!(state.report().unwrap().current.location, "Porto");
    }
}
