use crate::{
    Config,
    gateway::weatherapi::WeatherApiGateway,
    model::{ForecastQuery, HistoryResult, LocationSuggestion, WeatherQueryResult},
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::{fmt::Debug, sync::Arc};

pub mod weatherapi;

/// User-facing failure categories. Transport status codes never leave the
/// gateway; callers only see one of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("Invalid API Key")]
    Unauthorized,
    #[error("API Access Denied")]
    AccessDenied,
    #[error("Rate Limit Exceeded")]
    RateLimited,
    #[error("Server Error")]
    ServerError,
    #[error("Request Failed: {0}")]
    RequestFailed(String),
}

impl GatewayError {
    pub fn from_status(status: reqwest::StatusCode, detail: impl Into<String>) -> Self {
        match status.as_u16() {
            401 => GatewayError::Unauthorized,
            403 => GatewayError::AccessDenied,
            429 => GatewayError::RateLimited,
            500 => GatewayError::ServerError,
            _ => GatewayError::RequestFailed(detail.into()),
        }
    }

    /// One-line message for the search area, e.g.
    /// `Failed to fetch weather data: Invalid API Key`.
    pub fn user_message(&self, operation: Operation) -> String {
        format!("{}: {self}", operation.failure_prefix())
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return GatewayError::RequestFailed("request timed out".to_string());
        }
        match err.status() {
            Some(status) => GatewayError::from_status(status, status.to_string()),
            None => GatewayError::RequestFailed(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Forecast,
    Suggestions,
    History,
}

impl Operation {
    pub fn failure_prefix(&self) -> &'static str {
        match self {
            Operation::Forecast => "Failed to fetch weather data",
            Operation::Suggestions => "Failed to retrieve location suggestions",
            Operation::History => "Failed to retrieve historical data",
        }
    }
}

#[async_trait]
pub trait WeatherGateway: Send + Sync + Debug {
    async fn fetch_forecast(&self, query: &ForecastQuery) -> Result<WeatherQueryResult, GatewayError>;

    async fn fetch_suggestions(&self, partial: &str) -> Result<Vec<LocationSuggestion>, GatewayError>;

    async fn fetch_history(&self, location: &str, date: NaiveDate) -> Result<HistoryResult, GatewayError>;
}

/// Construct the WeatherAPI.com gateway from config. Missing credentials are
/// fatal.
pub fn gateway_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherGateway>> {
    let endpoint = config.endpoint()?;
    Ok(Arc::new(WeatherApiGateway::new(endpoint)?))
}
