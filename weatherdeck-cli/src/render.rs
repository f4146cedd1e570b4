//! Plain-text rendering of the dashboard cards.

use weatherdeck_core::{
    DashboardState,
    view::{
        AlertEntry, CurrentCard, DayEntry, HourEntry, HourlyCard, HourlyStrip, WeeklyCard,
        alert_entries,
    },
};

const COLUMN: usize = 11;

fn heading(title: &str) -> Vec<String> {
    vec![String::new(), title.to_string(), "=".repeat(title.chars().count())]
}

pub fn current(card: &CurrentCard) -> String {
    let mut lines = heading(&format!("Current Weather: {}", card.title));
    lines.push(format!("Local time {}   {}", card.local_time, card.coordinates));
    lines.push(String::new());
    lines.push(format!("{}  {}", card.temperature, card.condition));
    lines.push(format!("Feels like {}", card.feels_like));
    lines.push(String::new());
    lines.push(format!("{:<14}{}", "Wind", card.wind));
    lines.push(format!("{:<14}{}", "Gust", card.gust));
    lines.push(format!("{:<14}{}", "Humidity", card.humidity));
    lines.push(format!("{:<14}{}", "Precipitation", card.precipitation));
    lines.push(format!("{:<14}{}", "UV index", card.uv));
    lines.push(format!("{:<14}{}", "Visibility", card.visibility));
    if let Some(aqi) = &card.air_quality {
        lines.push(format!("{:<14}{}", "Air quality", aqi));
    }
    lines.join("\n")
}

/// One page of the 24-hour strip, with arrows where more hours exist.
pub fn hourly_page(card: &HourlyCard, strip: &HourlyStrip) -> String {
    let mut lines = heading("24-Hour Forecast");
    // A strip built for a different card shows nothing rather than panicking.
    let page = card.entries.get(strip.visible()).unwrap_or_default();
    if page.is_empty() {
        lines.push("No hourly data.".to_string());
        return lines.join("\n");
    }

    let left = if strip.show_left_arrow() { "< " } else { "  " };
    let right = if strip.show_right_arrow() { " >" } else { "" };

    let column = |field: fn(&HourEntry) -> &String| -> Vec<&str> {
        page.iter().map(|h| field(h).as_str()).collect()
    };
    let rows = [
        ("", column(|h| &h.label)),
        ("", column(|h| &h.temperature)),
        ("", column(|h| &h.condition)),
        ("Feels", column(|h| &h.feels_like)),
        ("P.O.P", column(|h| &h.precipitation_chance)),
        ("Wind", column(|h| &h.wind)),
    ];

    for (idx, (name, cells)) in rows.iter().enumerate() {
        let cells: String = cells
            .iter()
            .map(|text| format!("{:<COLUMN$}", truncate(text, COLUMN - 1)))
            .collect();
        let (lead, tail) = if idx == 0 { (left, right) } else { ("  ", "") };
        lines.push(format!("{lead}{name:<6}{}{tail}", cells.trim_end()));
    }
    lines.join("\n")
}

pub fn weekly(card: &WeeklyCard) -> String {
    let mut lines = heading("5-Day Outlook");
    if card.entries.is_empty() {
        lines.push("No outlook data.".to_string());
    }
    for day in &card.entries {
        lines.push(day_line(day));
    }
    lines.join("\n")
}

fn day_line(day: &DayEntry) -> String {
    format!(
        "{:<4}{:<8}{:<24}High: {:<7}Low: {:<7}P.O.P: {:<5}{}",
        day.weekday,
        day.date,
        truncate(&day.condition, 23),
        day.high,
        day.low,
        day.precipitation_chance,
        day.precipitation_type
    )
}

/// A single past day, as returned by the history lookup.
pub fn history_day(title: &str, day: &DayEntry) -> String {
    let mut lines = heading(&format!("History: {title}"));
    lines.push(day_line(day));
    if !day.sunrise.is_empty() {
        lines.push(format!("Sunrise {}   Sunset {}", day.sunrise, day.sunset));
    }
    lines.join("\n")
}

pub fn alerts(entries: &[AlertEntry]) -> String {
    let mut lines = heading("Alerts");
    for alert in entries {
        let severity = if alert.severity.is_empty() { "Alert" } else { &alert.severity };
        lines.push(format!("[{severity}] {}", alert.headline));
        if !alert.expires.is_empty() {
            lines.push(format!("    until {}", alert.expires));
        }
        if !alert.instruction.is_empty() {
            lines.push(format!("    {}", alert.instruction));
        }
    }
    lines.join("\n")
}

/// Every card for the state's current forecast, or a placeholder.
pub fn dashboard(state: &DashboardState, strip: &HourlyStrip) -> String {
    let mut out = Vec::new();
    if let Some(err) = state.error() {
        out.push(format!("! {err}"));
    }

    let Some(weather) = state.weather() else {
        out.push("No forecast loaded.".to_string());
        return out.join("\n");
    };
    let unit = state.unit_system();

    out.push(current(&CurrentCard::build(weather, unit)));
    out.push(hourly_page(&HourlyCard::build(weather, unit), strip));
    out.push(weekly(&WeeklyCard::build(weather, unit)));

    let alert_list = alert_entries(weather);
    if !alert_list.is_empty() {
        out.push(alerts(&alert_list));
    }
    out.join("\n")
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('~');
    cut
}
