//! Card view-models: every string a dashboard card shows, already converted to
//! the selected unit system.

use std::ops::Range;

use crate::{
    hourly,
    model::{Alert, DayRecord, HourlyRecord, UnitSystem, WeatherQueryResult, parse_local_time},
    units::{self, TemperatureVariant},
    weekly,
};

fn floored(value: f64) -> i64 {
    value.floor() as i64
}

pub fn format_temperature(value: f64, unit: UnitSystem) -> String {
    format!("{}{}", floored(value), units::temperature_symbol(unit))
}

fn format_speed(value: f64, unit: UnitSystem) -> String {
    format!("{} {}", floored(value), units::wind_speed_symbol(unit))
}

/// `2024-05-01 14:05` -> `02:05 PM`.
fn format_clock(localtime: &str) -> String {
    parse_local_time(localtime)
        .map_or_else(|| localtime.to_string(), |t| t.format("%I:%M %p").to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentCard {
    pub title: String,
    pub local_time: String,
    pub coordinates: String,
    pub temperature: String,
    pub condition: String,
    pub icon: String,
    pub feels_like: String,
    pub wind: String,
    pub gust: String,
    pub humidity: String,
    pub precipitation: String,
    pub uv: String,
    pub visibility: String,
    pub air_quality: Option<String>,
    pub is_day: bool,
}

impl CurrentCard {
    pub fn build(result: &WeatherQueryResult, unit: UnitSystem) -> Self {
        let location = &result.location;
        let current = &result.current;

        let temperature = units::temperature(current, unit, TemperatureVariant::Current);
        let wind = units::wind_speed(current, unit);
        let wind = if current.wind_dir.is_empty() {
            format_speed(wind, unit)
        } else {
            format!("{} {}", format_speed(wind, unit), current.wind_dir)
        };

        let air_quality = current.air_quality.as_ref().and_then(|aq| {
            let index = aq.us_epa_index?;
            Some(match aq.us_epa_label() {
                Some(label) => format!("{index} ({label})"),
                None => index.to_string(),
            })
        });

        Self {
            title: location.display_name(),
            local_time: format_clock(&location.localtime),
            coordinates: format!("Lat: {:.2}, Long: {:.2}", location.lat, location.lon),
            temperature: format_temperature(temperature, unit),
            condition: current.condition.text.clone(),
            icon: current.condition.icon.clone(),
            feels_like: format_temperature(units::feels_like(current, unit), unit),
            wind,
            gust: format_speed(units::gust_speed(current, unit), unit),
            humidity: format!("{}%", current.humidity),
            precipitation: format!(
                "{} {}",
                units::precipitation(current, unit),
                units::precipitation_symbol(unit)
            ),
            uv: current.uv.to_string(),
            visibility: format!("{} {}", units::visibility(current, unit), units::visibility_symbol(unit)),
            air_quality,
            is_day: current.is_day(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourEntry {
    pub label: String,
    pub temperature: String,
    pub feels_like: String,
    pub condition: String,
    pub icon: String,
    pub precipitation_chance: String,
    pub wind: String,
}

impl HourEntry {
    pub fn build(hour: &HourlyRecord, unit: UnitSystem) -> Self {
        Self {
            label: hourly::format_hour_label(&hour.time),
            temperature: format_temperature(
                units::temperature(hour, unit, TemperatureVariant::Current),
                unit,
            ),
            feels_like: format_temperature(units::feels_like(hour, unit), unit),
            condition: hour.condition.text.clone(),
            icon: hour.condition.icon.clone(),
            precipitation_chance: format!("{}%", hourly::chance_of_precipitation(hour)),
            wind: format_speed(units::wind_speed(hour, unit), unit),
        }
    }
}

/// The 24-hour strip.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyCard {
    pub entries: Vec<HourEntry>,
}

impl HourlyCard {
    pub fn build(result: &WeatherQueryResult, unit: UnitSystem) -> Self {
        let entries = hourly::hourly_window(result)
            .into_iter()
            .map(|hour| HourEntry::build(hour, unit))
            .collect();
        Self { entries }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayEntry {
    pub weekday: String,
    pub date: String,
    pub condition: String,
    pub icon: String,
    pub high: String,
    pub low: String,
    pub precipitation_chance: String,
    pub precipitation_type: weekly::PrecipitationType,
    pub sunrise: String,
    pub sunset: String,
}

impl DayEntry {
    pub fn build(day: &DayRecord, unit: UnitSystem) -> Self {
        Self {
            weekday: weekly::format_day_of_week(&day.date),
            date: weekly::format_date(&day.date),
            condition: day.day.condition.text.clone(),
            icon: day.day.condition.icon.clone(),
            high: format_temperature(
                units::temperature(&day.day, unit, TemperatureVariant::Max),
                unit,
            ),
            low: format_temperature(
                units::temperature(&day.day, unit, TemperatureVariant::Min),
                unit,
            ),
            precipitation_chance: format!("{}%", weekly::precipitation_chance(day)),
            precipitation_type: weekly::precipitation_type(day),
            sunrise: day.astro.sunrise.clone(),
            sunset: day.astro.sunset.clone(),
        }
    }
}

/// The 5-day outlook.
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyCard {
    pub entries: Vec<DayEntry>,
}

impl WeeklyCard {
    pub fn build(result: &WeatherQueryResult, unit: UnitSystem) -> Self {
        let entries = weekly::weekly_window(result)
            .iter()
            .map(|day| DayEntry::build(day, unit))
            .collect();
        Self { entries }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertEntry {
    pub headline: String,
    pub severity: String,
    pub expires: String,
    pub instruction: String,
}

impl From<&Alert> for AlertEntry {
    fn from(alert: &Alert) -> Self {
        let headline = if alert.headline.is_empty() { &alert.event } else { &alert.headline };
        Self {
            headline: headline.clone(),
            severity: alert.severity.clone(),
            expires: alert.expires.clone(),
            instruction: alert.instruction.clone(),
        }
    }
}

pub fn alert_entries(result: &WeatherQueryResult) -> Vec<AlertEntry> {
    result.alerts.items.iter().map(AlertEntry::from).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Left,
    Right,
}

/// Paged view over the hourly strip with arrow visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourlyStrip {
    len: usize,
    width: usize,
    offset: usize,
}

impl HourlyStrip {
    pub fn new(len: usize, width: usize) -> Self {
        Self { len, width: width.max(1), offset: 0 }
    }

    pub fn visible(&self) -> Range<usize> {
        self.offset..(self.offset + self.width).min(self.len)
    }

    pub fn show_left_arrow(&self) -> bool {
        self.offset > 0
    }

    pub fn show_right_arrow(&self) -> bool {
        self.offset + self.width < self.len
    }

    /// Move one page; returns false when already at that edge.
    pub fn scroll(&mut self, direction: ScrollDirection) -> bool {
        let before = self.offset;
        self.offset = match direction {
            ScrollDirection::Left => self.offset.saturating_sub(self.width),
            ScrollDirection::Right => {
                (self.offset + self.width).min(self.len.saturating_sub(self.width))
            }
        };
        self.offset != before
    }
}
