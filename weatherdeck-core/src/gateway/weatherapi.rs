use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, error};

use crate::{
    config::Endpoint,
    model::{ForecastQuery, HistoryResult, LocationSuggestion, WeatherQueryResult},
};

use super::{GatewayError, WeatherGateway};

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";

/// Generous enough for slow mobile links.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct WeatherApiGateway {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiGateway {
    pub fn new(endpoint: Endpoint) -> Result<Self> {
        Self::with_timeout(endpoint, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(endpoint: Endpoint, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client for WeatherAPI.com")?;

        Ok(Self {
            api_key: endpoint.api_key,
            base_url: endpoint.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// GET `path` with the API key attached and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, GatewayError> {
        let url = self.url(path);
        debug!(%url, ?params, "sending WeatherAPI request");

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| logged(path, None, GatewayError::from(e)))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| logged(path, Some(status), GatewayError::from(e)))?;

        if !status.is_success() {
            let detail = provider_message(&body).unwrap_or_else(|| truncate_body(&body));
            return Err(logged(path, Some(status), GatewayError::from_status(status, detail)));
        }

        serde_json::from_str(&body).map_err(|e| {
            logged(
                path,
                Some(status),
                GatewayError::RequestFailed(format!("invalid response from {path}: {e}")),
            )
        })
    }
}

#[async_trait]
impl WeatherGateway for WeatherApiGateway {
    async fn fetch_forecast(&self, query: &ForecastQuery) -> Result<WeatherQueryResult, GatewayError> {
        self.get_json(
            "forecast.json",
            &[
                ("q", query.location.clone()),
                ("days", query.days.to_string()),
                ("aqi", yes_no(query.options.air_quality)),
                ("alerts", yes_no(query.options.alerts)),
            ],
        )
        .await
    }

    async fn fetch_suggestions(&self, partial: &str) -> Result<Vec<LocationSuggestion>, GatewayError> {
        self.get_json("search.json", &[("q", partial.to_string())]).await
    }

    async fn fetch_history(&self, location: &str, date: NaiveDate) -> Result<HistoryResult, GatewayError> {
        self.get_json(
            "history.json",
            &[("q", location.to_string()), ("dt", date.format("%Y-%m-%d").to_string())],
        )
        .await
    }
}

#[derive(Debug, Deserialize)]
struct WaErrorBody {
    error: WaErrorDetail,
}

#[derive(Debug, Deserialize)]
struct WaErrorDetail {
    message: String,
}

/// WeatherAPI.com explains failures as `{"error": {"code": .., "message": ..}}`.
fn provider_message(body: &str) -> Option<String> {
    serde_json::from_str::<WaErrorBody>(body).ok().map(|b| b.error.message)
}

fn logged(path: &str, status: Option<StatusCode>, err: GatewayError) -> GatewayError {
    error!(path, status = status.map(|s| s.as_u16()), error = %err, "WeatherAPI request failed");
    err
}

fn yes_no(flag: bool) -> String {
    let value = if flag { "yes" } else { "no" };
    value.to_string()
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_message_extracts_error_text() {
        let body = r#"{"error":{"code":1006,"message":"No matching location found."}}"#;
        assert_eq!(provider_message(body).as_deref(), Some("No matching location found."));
        assert_eq!(provider_message("<html>"), None);
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        let cut = truncate_body(&long);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn url_joins_without_double_slash() {
        let gw = WeatherApiGateway::new(Endpoint {
            api_key: "k".into(),
            base_url: "http://localhost:1234/v1/".into(),
        })
        .unwrap();
        assert_eq!(gw.url("forecast.json"), "http://localhost:1234/v1/forecast.json");
    }
}
