//! Plain-text rendering of the canonical weather records. Temperature
//! conversion happens here, at display time; the records themselves stay
//! in Celsius.

use chrono::{DateTime, Local, Utc};

use skycast_core::{
    DailyForecast, HourlyForecast, WeatherReport,
    units::{TemperatureUnit, format_temperature},
};

pub fn dashboard(report: &WeatherReport, unit: TemperatureUnit, extended: bool) -> String {
    let mut out = String::new();

    for alert in &report.alerts {
        out.push_str(&format!(
            "! {} [{}] {} — {}\n",
            alert.severity.as_str().to_uppercase(),
            alert.sender,
            alert.event,
            span(alert.start, alert.end),
        ));
    }
    if !report.alerts.is_empty() {
        out.push('\n');
    }

    let current = &report.current;
    out.push_str(&format!(
        "{}  {}  (feels like {})\n",
        current.location,
        format_temperature(current.temperature_c, unit),
        format_temperature(current.feels_like_c, unit),
    ));
    out.push_str(&format!("{}\n", capitalize(&current.description)));
    out.push_str(&format!(
        "humidity {}%   wind {:.1} m/s   pressure {} hPa\n",
        current.humidity_pct, current.wind_speed_mps, current.pressure_hpa,
    ));
    if let Some(visibility) = current.visibility_m {
        out.push_str(&format!("visibility {:.1} km\n", f64::from(visibility) / 1000.0));
    }
    if let (Some(sunrise), Some(sunset)) = (current.sunrise, current.sunset) {
        out.push_str(&format!("sunrise {}   sunset {}\n", clock(sunrise), clock(sunset)));
    }

    out.push_str("\nHourly\n");
    for hour in &report.hourly {
        out.push_str(&hour_line(hour, unit));
    }

    let days = if extended { &report.daily10 } else { &report.daily5 };
    out.push_str(&format!("\n{}-day forecast\n", days.len()));
    for day in days {
        out.push_str(&day_line(day, unit));
    }
    if extended {
        out.push_str(
            "\nNote: extended forecasts beyond 5 days are less accurate and should\n\
             be used for general planning only.\n",
        );
    }

    out
}

fn hour_line(hour: &HourlyForecast, unit: TemperatureUnit) -> String {
    let mut line = format!(
        "  {}  {:>5}  {}",
        hour.time.with_timezone(&Local).format("%H:%M"),
        format_temperature(hour.temperature_c, unit),
        hour.description,
    );
    if let Some(pop) = hour.precipitation_pct {
        line.push_str(&format!("  ({:.0}% precip)", pop));
    }
    line.push('\n');
    line
}

fn day_line(day: &DailyForecast, unit: TemperatureUnit) -> String {
    let mut line = format!(
        "  {}  {:>5}",
        day.date.with_timezone(&Local).format("%a %d %b"),
        format_temperature(day.temperature_c, unit),
    );
    if let (Some(min), Some(max)) = (day.min_temp_c, day.max_temp_c) {
        line.push_str(&format!(
            "  ({} / {})",
            format_temperature(min, unit),
            format_temperature(max, unit)
        ));
    }
    line.push_str(&format!("  {}", day.description));
    if let Some(pop) = day.precipitation_pct {
        line.push_str(&format!("  {:.0}% precip", pop));
    }
    line.push('\n');
    line
}

fn clock(epoch: i64) -> String {
    match DateTime::<Utc>::from_timestamp(epoch, 0) {
        Some(instant) => instant.with_timezone(&Local).format("%H:%M").to_string(),
        None => "--:--".to_string(),
    }
}

fn span(start: i64, end: i64) -> String {
    format!("{} to {}", clock(start), clock(end))
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
