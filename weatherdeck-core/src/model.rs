use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Layout of `localtime` and hourly `time` strings returned by WeatherAPI.com.
pub const LOCAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Parse a provider timestamp such as `2024-05-01 14:00`.
pub fn parse_local_time(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), LOCAL_TIME_FORMAT).ok()
}

/// Which half of every paired-unit field is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    #[default]
    Metric,
    Imperial,
}

impl UnitSystem {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitSystem::Metric => "metric",
            UnitSystem::Imperial => "imperial",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            UnitSystem::Metric => UnitSystem::Imperial,
            UnitSystem::Imperial => UnitSystem::Metric,
        }
    }

    /// Select the metric or imperial half of a pair.
    pub fn pick<T>(self, metric: T, imperial: T) -> T {
        match self {
            UnitSystem::Metric => metric,
            UnitSystem::Imperial => imperial,
        }
    }
}

impl std::fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UnitSystem {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "metric" => Ok(UnitSystem::Metric),
            "imperial" => Ok(UnitSystem::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported: metric, imperial."
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherCondition {
    pub text: String,
    pub icon: String,
    pub code: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub name: String,
    pub region: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    pub tz_id: String,
    pub localtime_epoch: i64,
    pub localtime: String,
}

impl Location {
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }

    /// Wall-clock "now" at the location, if the provider sent a parseable value.
    pub fn local_time(&self) -> Option<NaiveDateTime> {
        parse_local_time(&self.localtime)
    }

    pub fn current_hour(&self) -> Option<u32> {
        self.local_time().map(|t| t.hour())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AirQuality {
    pub co: Option<f64>,
    pub no2: Option<f64>,
    pub o3: Option<f64>,
    pub so2: Option<f64>,
    pub pm2_5: Option<f64>,
    pub pm10: Option<f64>,
    #[serde(rename = "us-epa-index")]
    pub us_epa_index: Option<u8>,
    #[serde(rename = "gb-defra-index")]
    pub gb_defra_index: Option<u8>,
}

impl AirQuality {
    /// Label for the US EPA index (1..=6).
    pub fn us_epa_label(&self) -> Option<&'static str> {
        let label = match self.us_epa_index? {
            1 => "Good",
            2 => "Moderate",
            3 => "Unhealthy for sensitive groups",
            4 => "Unhealthy",
            5 => "Very unhealthy",
            6 => "Hazardous",
            _ => return None,
        };
        Some(label)
    }
}

/// Snapshot at "now". Temperatures are optional; the provider omits them
/// occasionally and readers fall back to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentConditions {
    pub last_updated: String,
    pub last_updated_epoch: i64,
    pub is_day: u8,
    pub condition: WeatherCondition,
    pub temp_c: Option<f64>,
    pub temp_f: Option<f64>,
    pub feelslike_c: Option<f64>,
    pub feelslike_f: Option<f64>,
    pub wind_kph: f64,
    pub wind_mph: f64,
    pub wind_dir: String,
    pub gust_kph: f64,
    pub gust_mph: f64,
    pub precip_mm: f64,
    pub precip_in: f64,
    pub humidity: u8,
    pub uv: f64,
    pub vis_km: f64,
    pub vis_miles: f64,
    pub air_quality: Option<AirQuality>,
}

impl CurrentConditions {
    pub fn is_day(&self) -> bool {
        self.is_day == 1
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HourlyRecord {
    pub time_epoch: i64,
    pub time: String,
    pub temp_c: Option<f64>,
    pub temp_f: Option<f64>,
    pub feelslike_c: Option<f64>,
    pub feelslike_f: Option<f64>,
    pub is_day: u8,
    pub condition: WeatherCondition,
    pub wind_kph: f64,
    pub wind_mph: f64,
    pub wind_dir: String,
    pub gust_kph: f64,
    pub gust_mph: f64,
    pub will_it_rain: u8,
    pub chance_of_rain: u8,
    pub will_it_snow: u8,
    pub chance_of_snow: u8,
    pub snow_cm: f64,
    pub precip_mm: f64,
    pub precip_in: f64,
    pub humidity: u8,
    pub windchill_c: f64,
    pub windchill_f: f64,
    pub vis_km: f64,
    pub vis_miles: f64,
    pub uv: f64,
    pub air_quality: Option<AirQuality>,
}

impl HourlyRecord {
    pub fn will_rain(&self) -> bool {
        self.will_it_rain == 1
    }

    pub fn will_snow(&self) -> bool {
        self.will_it_snow == 1
    }

    /// Hour of day (0-23) taken from `time`.
    pub fn hour_of_day(&self) -> Option<u32> {
        parse_local_time(&self.time).map(|t| t.hour())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DaySummary {
    pub maxtemp_c: Option<f64>,
    pub maxtemp_f: Option<f64>,
    pub mintemp_c: Option<f64>,
    pub mintemp_f: Option<f64>,
    pub maxwind_kph: f64,
    pub maxwind_mph: f64,
    pub daily_will_it_rain: u8,
    pub daily_chance_of_rain: u8,
    pub daily_will_it_snow: u8,
    pub daily_chance_of_snow: u8,
    pub totalprecip_mm: f64,
    pub totalprecip_in: f64,
    pub totalsnow_cm: f64,
    pub avghumidity: f64,
    pub condition: WeatherCondition,
    pub uv: f64,
}

impl DaySummary {
    pub fn will_rain(&self) -> bool {
        self.daily_will_it_rain == 1
    }

    pub fn will_snow(&self) -> bool {
        self.daily_will_it_snow == 1
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Astro {
    pub sunrise: String,
    pub sunset: String,
    pub moonrise: String,
    pub moonset: String,
    pub moon_phase: String,
    pub moon_illumination: f64,
    pub is_moon_up: u8,
    pub is_sun_up: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayRecord {
    /// Calendar date, `YYYY-MM-DD`.
    pub date: String,
    pub date_epoch: i64,
    pub day: DaySummary,
    pub astro: Astro,
    #[serde(rename = "hour")]
    pub hours: Vec<HourlyRecord>,
}

/// Days in provider order; index 0 is today.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastSet {
    #[serde(rename = "forecastday")]
    pub days: Vec<DayRecord>,
}

impl ForecastSet {
    pub fn today(&self) -> Option<&DayRecord> {
        self.days.first()
    }

    pub fn tomorrow(&self) -> Option<&DayRecord> {
        self.days.get(1)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Alert {
    pub headline: String,
    pub severity: String,
    pub urgency: String,
    pub areas: String,
    pub event: String,
    pub effective: String,
    pub expires: String,
    pub desc: String,
    pub instruction: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Alerts {
    #[serde(rename = "alert")]
    pub items: Vec<Alert>,
}

/// Candidate match for a partial location query (`search.json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationSuggestion {
    pub id: i64,
    pub name: String,
    pub region: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    pub url: String,
}

impl LocationSuggestion {
    /// Query string used when the suggestion is picked.
    pub fn query(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }

    /// Secondary line: `region, country`, or just the country.
    pub fn subtitle(&self) -> String {
        if self.region.is_empty() {
            self.country.clone()
        } else {
            format!("{}, {}", self.region, self.country)
        }
    }
}

/// Everything the dashboard renders from. Replaced as a whole on each
/// successful query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherQueryResult {
    pub location: Location,
    pub current: CurrentConditions,
    #[serde(default)]
    pub forecast: ForecastSet,
    #[serde(default)]
    pub alerts: Alerts,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryResult {
    pub location: Location,
    #[serde(default)]
    pub forecast: ForecastSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastOptions {
    pub air_quality: bool,
    pub alerts: bool,
}

impl Default for ForecastOptions {
    fn default() -> Self {
        Self { air_quality: true, alerts: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastQuery {
    pub location: String,
    pub days: u8,
    pub options: ForecastOptions,
}

impl ForecastQuery {
    pub const DEFAULT_DAYS: u8 = 7;

    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            days: Self::DEFAULT_DAYS,
            options: ForecastOptions::default(),
        }
    }

    pub fn with_days(mut self, days: u8) -> Self {
        self.days = days;
        self
    }

    pub fn with_options(mut self, options: ForecastOptions) -> Self {
        self.options = options;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "location": {
            "name": "London", "region": "City of London, Greater London",
            "country": "United Kingdom", "lat": 51.52, "lon": -0.11,
            "tz_id": "Europe/London", "localtime_epoch": 1714572300,
            "localtime": "2024-05-01 14:05"
        },
        "current": {
            "temp_c": 17.0, "temp_f": 62.6, "is_day": 1,
            "condition": {"text": "Sunny", "icon": "//cdn/113.png", "code": 1000},
            "wind_kph": 11.2, "wind_mph": 6.9, "wind_dir": "WSW",
            "humidity": 55,
            "air_quality": {"pm2_5": 4.2, "us-epa-index": 1}
        },
        "forecast": {"forecastday": [
            {"date": "2024-05-01", "day": {"maxtemp_c": 19.1, "daily_chance_of_rain": 10},
             "astro": {"sunrise": "05:33 AM"},
             "hour": [{"time": "2024-05-01 00:00", "temp_c": 9.5, "will_it_rain": 0}]}
        ]}
    }"#;

    #[test]
    fn deserializes_partial_provider_payload() {
        let result: WeatherQueryResult = serde_json::from_str(SAMPLE).expect("valid json");

        assert_eq!(result.location.display_name(), "London, United Kingdom");
        assert_eq!(result.location.current_hour(), Some(14));
        assert_eq!(result.current.temp_c, Some(17.0));
        assert_eq!(result.current.feelslike_c, None);
        assert_eq!(result.current.gust_kph, 0.0);
        assert!(result.current.is_day());

        let aq = result.current.air_quality.as_ref().expect("air quality present");
        assert_eq!(aq.us_epa_index, Some(1));
        assert_eq!(aq.us_epa_label(), Some("Good"));

        let today = result.forecast.today().expect("one day");
        assert_eq!(today.hours.len(), 1);
        assert_eq!(today.hours[0].hour_of_day(), Some(0));
        assert_eq!(today.day.daily_chance_of_rain, 10);
        assert!(result.forecast.tomorrow().is_none());
        assert!(result.alerts.items.is_empty());
    }

    #[test]
    fn unit_system_toggles_and_parses() {
        assert_eq!(UnitSystem::Metric.toggled(), UnitSystem::Imperial);
        assert_eq!(UnitSystem::Imperial.toggled(), UnitSystem::Metric);
        assert_eq!(UnitSystem::try_from("Imperial").unwrap(), UnitSystem::Imperial);
        assert!(UnitSystem::try_from("kelvin").is_err());
        assert_eq!(UnitSystem::default(), UnitSystem::Metric);
    }

    #[test]
    fn suggestion_subtitle_skips_empty_region() {
        let mut s = LocationSuggestion {
            name: "Paris".into(),
            country: "France".into(),
            ..Default::default()
        };
        assert_eq!(s.subtitle(), "France");
        s.region = "Ile-de-France".into();
        assert_eq!(s.subtitle(), "Ile-de-France, France");
        assert_eq!(s.query(), "Paris, France");
    }

    #[test]
    fn forecast_query_defaults_match_dashboard_search() {
        let q = ForecastQuery::new("Oslo");
        assert_eq!(q.days, 7);
        assert!(q.options.air_quality);
        assert!(q.options.alerts);
    }
}
