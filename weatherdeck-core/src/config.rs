use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::model::{ForecastOptions, ForecastQuery, UnitSystem};

pub const API_KEY_ENV: &str = "WEATHER_API_KEY";
pub const BASE_URL_ENV: &str = "WEATHER_BASE_URL";

/// Upper bound on the forecast horizon accepted by WeatherAPI.com.
pub const MAX_FORECAST_DAYS: u8 = 14;

/// Validated credentials for the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub api_key: String,
    pub base_url: String,
}

/// Display and lookup preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub unit_system: UnitSystem,
    pub forecast_days: u8,
    pub air_quality: bool,
    pub alerts: bool,
    /// Quiet period before a typed query is looked up.
    pub debounce_ms: u64,
    /// Period of the `watch` refresh loop.
    pub repeat_interval_secs: u64,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            unit_system: UnitSystem::Metric,
            forecast_days: ForecastQuery::DEFAULT_DAYS,
            air_quality: true,
            alerts: true,
            debounce_ms: 300,
            repeat_interval_secs: 600,
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// base_url = "https://api.weatherapi.com/v1"
///
/// [preferences]
/// unit_system = "imperial"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    #[serde(default)]
    pub preferences: Preferences,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weatherdeck", "weatherdeck")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply `WEATHER_API_KEY` / `WEATHER_BASE_URL` from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary lookup; blank values are ignored.
    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let present = |name| lookup(name).filter(|v: &String| !v.trim().is_empty());

        if let Some(key) = present(API_KEY_ENV) {
            self.api_key = Some(key);
        }
        if let Some(url) = present(BASE_URL_ENV) {
            self.base_url = Some(url);
        }
        self
    }

    pub fn set_credentials(&mut self, api_key: String, base_url: String) {
        self.api_key = Some(api_key);
        self.base_url = Some(base_url);
    }

    /// Credentials and endpoint, or an error naming what is missing.
    pub fn endpoint(&self) -> Result<Endpoint> {
        let api_key = non_blank(self.api_key.as_deref());
        let base_url = non_blank(self.base_url.as_deref());

        let (api_key, base_url) = match (api_key, base_url) {
            (Some(k), Some(u)) => (k, u),
            (k, u) => {
                let missing: Vec<&str> = [(k.is_none(), "api_key"), (u.is_none(), "base_url")]
                    .into_iter()
                    .filter_map(|(absent, name)| absent.then_some(name))
                    .collect();
                return Err(anyhow!(
                    "Missing required configuration: {}.\n\
                     Hint: run `weatherdeck configure` or set {API_KEY_ENV} and {BASE_URL_ENV}.",
                    missing.join(", ")
                ));
            }
        };

        reqwest::Url::parse(base_url)
            .with_context(|| format!("Invalid base_url '{base_url}'"))?;

        Ok(Endpoint { api_key: api_key.to_string(), base_url: base_url.to_string() })
    }

    pub fn is_configured(&self) -> bool {
        self.endpoint().is_ok()
    }

    /// Forecast request using the stored horizon and options.
    pub fn forecast_query(&self, location: impl Into<String>) -> ForecastQuery {
        let prefs = &self.preferences;
        ForecastQuery::new(location)
            .with_days(prefs.forecast_days.clamp(1, MAX_FORECAST_DAYS))
            .with_options(ForecastOptions { air_quality: prefs.air_quality, alerts: prefs.alerts })
    }

    pub fn debounce_delay(&self) -> Duration {
        Duration::from_millis(self.preferences.debounce_ms)
    }

    pub fn repeat_interval(&self) -> Duration {
        Duration::from_secs(self.preferences.repeat_interval_secs.max(1))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn endpoint_errors_when_not_configured() {
        let cfg = Config::default();
        let msg = cfg.endpoint().unwrap_err().to_string();

        assert!(msg.contains("Missing required configuration: api_key, base_url"));
        assert!(msg.contains("Hint: run `weatherdeck configure`"));
        assert!(!cfg.is_configured());
    }

    #[test]
    fn endpoint_names_only_the_missing_setting() {
        let cfg = Config { api_key: Some("KEY".into()), ..Default::default() };
        let msg = cfg.endpoint().unwrap_err().to_string();
        assert!(msg.contains("Missing required configuration: base_url."));

        let cfg = Config { base_url: Some("https://x.test".into()), api_key: Some("  ".into()), ..Default::default() };
        let msg = cfg.endpoint().unwrap_err().to_string();
        assert!(msg.contains("Missing required configuration: api_key."));
    }

    #[test]
    fn endpoint_rejects_unparseable_base_url() {
        let mut cfg = Config::default();
        cfg.set_credentials("KEY".into(), "not a url".into());
        assert!(cfg.endpoint().unwrap_err().to_string().contains("Invalid base_url"));
    }

    #[test]
    fn set_credentials_yields_endpoint() {
        let mut cfg = Config::default();
        cfg.set_credentials("KEY".into(), "https://api.weatherapi.com/v1".into());

        let endpoint = cfg.endpoint().expect("configured");
        assert_eq!(endpoint.api_key, "KEY");
        assert_eq!(endpoint.base_url, "https://api.weatherapi.com/v1");
    }

    #[test]
    fn environment_overrides_file_values() {
        let mut cfg = Config::default();
        cfg.set_credentials("FILE_KEY".into(), "https://file.test".into());

        let cfg = cfg.with_overrides_from(env(&[(API_KEY_ENV, "ENV_KEY"), (BASE_URL_ENV, "")]));
        assert_eq!(cfg.api_key.as_deref(), Some("ENV_KEY"));
        assert_eq!(cfg.base_url.as_deref(), Some("https://file.test"));
    }

    #[test]
    fn save_and_load_round_trip_through_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_credentials("KEY".into(), "https://api.weatherapi.com/v1".into());
        cfg.preferences.unit_system = UnitSystem::Imperial;
        cfg.preferences.debounce_ms = 500;
        cfg.save_to(&path).expect("save");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn missing_file_loads_defaults_and_partial_preferences_fill_in() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(Config::load_from(&dir.path().join("absent.toml")).unwrap(), Config::default());

        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = \"K\"\n[preferences]\nunit_system = \"imperial\"\n").unwrap();
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.preferences.unit_system, UnitSystem::Imperial);
        assert_eq!(cfg.preferences.debounce_ms, 300);
        assert_eq!(cfg.debounce_delay(), Duration::from_millis(300));
    }

    #[test]
    fn forecast_query_clamps_horizon() {
        let mut cfg = Config::default();
        cfg.preferences.forecast_days = 40;
        cfg.preferences.alerts = false;

        let q = cfg.forecast_query("Lima");
        assert_eq!(q.days, MAX_FORECAST_DAYS);
        assert!(q.options.air_quality);
        assert!(!q.options.alerts);

        cfg.preferences.forecast_days = 0;
        assert_eq!(cfg.forecast_query("Lima").days, 1);
    }
}
