//! Multi-day outlook: the days after today.

use chrono::NaiveDate;

use crate::{
    model::{DayRecord, UnitSystem, WeatherQueryResult},
    units::{self, TemperatureVariant},
};

/// First and last (inclusive) forecast indices shown in the outlook.
pub const OUTLOOK_START: usize = 1;
pub const OUTLOOK_END: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrecipitationType {
    Rain,
    Snow,
    None,
}

impl PrecipitationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrecipitationType::Rain => "Rain",
            PrecipitationType::Snow => "Snow",
            PrecipitationType::None => "None",
        }
    }
}

impl std::fmt::Display for PrecipitationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tomorrow through five days out; shorter when the provider sent fewer days.
pub fn weekly_window(result: &WeatherQueryResult) -> &[DayRecord] {
    let days = result.forecast.days.as_slice();
    let start = OUTLOOK_START.min(days.len());
    let end = (OUTLOOK_END + 1).min(days.len());
    &days[start..end]
}

fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()
}

/// `2024-05-06` -> `Mon`.
pub fn format_day_of_week(date: &str) -> String {
    parse_date(date).map_or_else(|| date.to_string(), |d| d.format("%a").to_string())
}

/// `2024-05-06` -> `May 6`.
pub fn format_date(date: &str) -> String {
    parse_date(date).map_or_else(|| date.to_string(), |d| d.format("%b %-d").to_string())
}

pub fn precipitation_chance(day: &DayRecord) -> u8 {
    day.day.daily_chance_of_rain.max(day.day.daily_chance_of_snow)
}

pub fn precipitation_type(day: &DayRecord) -> PrecipitationType {
    if day.day.will_rain() {
        PrecipitationType::Rain
    } else if day.day.will_snow() {
        PrecipitationType::Snow
    } else {
        PrecipitationType::None
    }
}

/// Midpoint of the day's high and low.
pub fn average_temperature(day: &DayRecord, unit: UnitSystem) -> f64 {
    let max = units::temperature(&day.day, unit, TemperatureVariant::Max);
    let min = units::temperature(&day.day, unit, TemperatureVariant::Min);
    (max + min) / 2.0
}
