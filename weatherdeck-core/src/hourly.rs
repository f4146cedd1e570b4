//! Rolling 24-hour window over the forecast.

use crate::model::{ForecastSet, HourlyRecord, WeatherQueryResult, parse_local_time};

/// Hours from the location's current hour today through the same hour
/// tomorrow.
///
/// Both filters compare inclusively, so hour `H` appears once from today and
/// once from tomorrow. Returns an empty window when the location's local time
/// cannot be parsed.
pub fn hourly_window(result: &WeatherQueryResult) -> Vec<&HourlyRecord> {
    match result.location.current_hour() {
        Some(hour) => hourly_window_from(&result.forecast, hour),
        None => Vec::new(),
    }
}

/// Same as [`hourly_window`] with an explicit current hour (0-23).
pub fn hourly_window_from(forecast: &ForecastSet, current_hour: u32) -> Vec<&HourlyRecord> {
    let today = forecast.today().map(|d| d.hours.as_slice()).unwrap_or_default();
    let tomorrow = forecast.tomorrow().map(|d| d.hours.as_slice()).unwrap_or_default();

    let remaining_today = today
        .iter()
        .filter(|h| h.hour_of_day().is_some_and(|hour| hour >= current_hour));
    let tomorrow_prefix = tomorrow
        .iter()
        .filter(|h| h.hour_of_day().is_some_and(|hour| hour <= current_hour));

    remaining_today.chain(tomorrow_prefix).collect()
}

/// Probability shown for an hour: rain chance when rain is expected, else snow
/// chance when snow is expected, else zero.
pub fn chance_of_precipitation(hour: &HourlyRecord) -> u8 {
    if hour.will_rain() {
        hour.chance_of_rain
    } else if hour.will_snow() {
        hour.chance_of_snow
    } else {
        0
    }
}

/// `2024-05-01 14:00` -> `2 PM`. Unparseable input is returned unchanged.
pub fn format_hour_label(time: &str) -> String {
    match parse_local_time(time) {
        Some(t) => t.format("%-I %p").to_string(),
        None => time.to_string(),
    }
}
