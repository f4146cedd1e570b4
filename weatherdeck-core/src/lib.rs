//! Core library for the `weatherdeck` dashboard.
//!
//! This crate defines:
//! - The forecast data model, mirroring WeatherAPI.com responses
//! - Unit-aware readers and the hourly / weekly derivations
//! - The gateway to WeatherAPI.com and its user-facing error categories
//! - Dashboard state, cancellable timers and debounced suggestions
//! - Card view-models and configuration
//!
//! It is used by `weatherdeck-cli`, but can also back other front ends.

pub mod config;
pub mod gateway;
pub mod hourly;
pub mod model;
pub mod search;
pub mod state;
pub mod timer;
pub mod units;
pub mod view;
pub mod weekly;

pub use config::{Config, Endpoint, Preferences};
pub use gateway::{GatewayError, Operation, WeatherGateway, gateway_from_config};
pub use model::{
    DayRecord, ForecastQuery, ForecastSet, HourlyRecord, LocationSuggestion, UnitSystem,
    WeatherQueryResult,
};
pub use state::{Action, DashboardState, QueryTicket, Transition};
