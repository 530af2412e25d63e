use chrono::Duration;
use rand::Rng;

use crate::model::DailyForecast;

/// Conditions a synthesized day can show, with their icon codes. Drawn
/// uniformly, independent of the base day and of each other.
const CONDITIONS: [(&str, &str); 9] = [
    ("clear sky", "01d"),
    ("few clouds", "02d"),
    ("scattered clouds", "03d"),
    ("broken clouds", "04d"),
    ("shower rain", "09d"),
    ("rain", "10d"),
    ("thunderstorm", "11d"),
    ("snow", "13d"),
    ("mist", "50d"),
];

/// Produce `count` synthesized forecast days dated on consecutive days
/// after `base.date`, varying within fixed bounds around the base day.
///
/// This is a placeholder simulation to fill the 10-day view when the real
/// source stops at 5 days, not a forecast model. Temperature stays within
/// ±2 °C of the base day; humidity is clamped to 0-100 and wind speed to
/// ≥ 0. Optional fields absent on the base day stay absent.
pub fn extend_forecast<R: Rng>(
    rng: &mut R,
    base: &DailyForecast,
    count: usize,
) -> Vec<DailyForecast> {
    (1..=count as i64)
        .map(|offset| {
            let temperature_c = base.temperature_c + rng.gen_range(-2.0..=2.0);
            let (description, icon) = CONDITIONS[rng.gen_range(0..CONDITIONS.len())];

            DailyForecast {
                date: base.date + Duration::days(offset),
                temperature_c,
                description: description.to_string(),
                icon: icon.to_string(),
                min_temp_c: Some(temperature_c - rng.gen_range(0.0..=3.0)),
                max_temp_c: Some(temperature_c + rng.gen_range(0.0..=3.0)),
                humidity_pct: base.humidity_pct.map(|h| {
                    (f64::from(h) + rng.gen_range(-5.0..=5.0)).round().clamp(0.0, 100.0) as u8
                }),
                wind_speed_mps: base
                    .wind_speed_mps
                    .map(|w| round1(w + rng.gen_range(-1.0..=1.0)).max(0.0)),
                precipitation_pct: Some(rng.gen_range(0.0_f64..=100.0).round()),
                uvi: Some(round1(rng.gen_range(0.0..=8.0))),
            }
        })
        .collect()
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
