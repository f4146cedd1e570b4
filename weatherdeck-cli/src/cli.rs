use std::{fmt, sync::Arc, time::Duration};

use anyhow::{Context, anyhow, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tokio::sync::{Mutex, mpsc};
use tracing::{info, warn};
use weatherdeck_core::{
    Action, Config, DashboardState, ForecastQuery, LocationSuggestion, UnitSystem, WeatherGateway,
    config::MAX_FORECAST_DAYS,
    gateway::{Operation, weatherapi::DEFAULT_BASE_URL},
    gateway_from_config,
    model::ForecastOptions,
    search::{MIN_QUERY_CHARS, SuggestionEvent, SuggestionFeed},
    timer::RepeatTimer,
    view::{DayEntry, HourlyCard, HourlyStrip, ScrollDirection, format_temperature},
    weekly,
};

use crate::render;

/// Hours shown per page of the hourly strip.
const HOURS_PER_PAGE: usize = 8;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weatherdeck", version, about = "Weather dashboard for the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WeatherAPI.com key, endpoint and default units.
    Configure,

    /// Show current conditions, the next 24 hours and the 5-day outlook.
    Show {
        /// City, postcode or "lat,lon".
        location: String,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// Suggest locations matching a partial name.
    Search {
        /// At least two characters of a place name.
        partial: String,

        /// Pick one of the matches and open its dashboard.
        #[arg(long)]
        pick: bool,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// Show a past day for a location.
    History {
        location: String,

        /// Day to look up, as YYYY-MM-DD.
        date: NaiveDate,

        #[command(flatten)]
        units: UnitArgs,
    },

    /// Redraw the dashboard on a fixed period until Ctrl-C.
    Watch {
        location: String,

        /// Seconds between refreshes; defaults to the configured interval.
        #[arg(long)]
        every: Option<u64>,

        #[command(flatten)]
        query: QueryArgs,
    },
}

#[derive(Debug, Clone, Copy, Default, Args)]
pub struct UnitArgs {
    /// Use °F, mph, inches and miles.
    #[arg(long, conflicts_with = "metric")]
    pub imperial: bool,

    /// Use °C, km/h, millimetres and kilometres.
    #[arg(long)]
    pub metric: bool,
}

impl UnitArgs {
    pub fn resolve(&self, default: UnitSystem) -> UnitSystem {
        match (self.imperial, self.metric) {
            (true, _) => UnitSystem::Imperial,
            (_, true) => UnitSystem::Metric,
            _ => default,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Args)]
pub struct QueryArgs {
    /// Forecast horizon in days (1-14).
    #[arg(long)]
    pub days: Option<u8>,

    /// Skip the air-quality block.
    #[arg(long)]
    pub no_air_quality: bool,

    /// Skip weather alerts.
    #[arg(long)]
    pub no_alerts: bool,

    #[command(flatten)]
    pub units: UnitArgs,
}

impl QueryArgs {
    /// Stored preferences, narrowed by the flags given on the command line.
    pub fn forecast_query(&self, config: &Config, location: impl Into<String>) -> ForecastQuery {
        let base = config.forecast_query(location);
        let days = self.days.map_or(base.days, |d| d.clamp(1, MAX_FORECAST_DAYS));
        let options = ForecastOptions {
            air_quality: base.options.air_quality && !self.no_air_quality,
            alerts: base.options.alerts && !self.no_alerts,
        };
        base.with_days(days).with_options(options)
    }

    pub fn unit_system(&self, config: &Config) -> UnitSystem {
        self.units.resolve(config.preferences.unit_system)
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { location, query } => {
                let config = load_config()?;
                let gateway = gateway_from_config(&config)?;
                let mut state = DashboardState::new(query.unit_system(&config));

                let forecast = query.forecast_query(&config, location);
                load_forecast(gateway.as_ref(), &mut state, &forecast).await;
                print_dashboard(&state);
                match state.error() {
                    Some(err) => Err(anyhow!("{err}")),
                    None => Ok(()),
                }
            }
            Command::Search { partial, pick, query } => {
                let config = load_config()?;
                let gateway = gateway_from_config(&config)?;
                let delay = config.debounce_delay();
                let suggestions = lookup_suggestions(Arc::clone(&gateway), delay, &partial).await?;

                if suggestions.is_empty() {
                    println!("No locations match '{partial}'.");
                    return Ok(());
                }
                if !pick {
                    for s in &suggestions {
                        println!("{:<28}{}", s.name, s.subtitle());
                    }
                    return Ok(());
                }

                let options = suggestions.into_iter().map(SuggestionChoice).collect();
                let choice = inquire::Select::new("Location:", options).prompt()?;
                browse(gateway.as_ref(), &config, query, choice.0.query()).await
            }
            Command::History { location, date, units } => {
                let config = load_config()?;
                let gateway = gateway_from_config(&config)?;
                let unit = units.resolve(config.preferences.unit_system);

                let history = gateway
                    .fetch_history(&location, date)
                    .await
                    .map_err(|e| anyhow!(e.user_message(Operation::History)))?;
                let day = history
                    .forecast
                    .days
                    .first()
                    .with_context(|| format!("No history returned for {location} on {date}"))?;

                let title = history.location.display_name();
                println!("{}", render::history_day(&title, &DayEntry::build(day, unit)));

                let average = weekly::average_temperature(day, unit);
                println!("Average: {}", format_temperature(average, unit));
                Ok(())
            }
            Command::Watch { location, every, query } => {
                let config = load_config()?;
                let gateway = gateway_from_config(&config)?;
                let period = every
                    .map_or_else(|| config.repeat_interval(), |s| Duration::from_secs(s.max(1)));
                let forecast = query.forecast_query(&config, location);
                watch(gateway, forecast, query.unit_system(&config), period).await
            }
        }
    }
}

fn load_config() -> anyhow::Result<Config> {
    Ok(Config::load()?.with_env_overrides())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = inquire::Password::new("WeatherAPI.com API key:")
        .without_confirmation()
        .prompt()?;
    let current_url = config.base_url.clone().unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let base_url = inquire::Text::new("Base URL:").with_default(&current_url).prompt()?;
    let choices = vec![UnitSystem::Metric, UnitSystem::Imperial];
    let units = inquire::Select::new("Default units:", choices)
        .with_starting_cursor(match config.preferences.unit_system {
            UnitSystem::Metric => 0,
            UnitSystem::Imperial => 1,
        })
        .prompt()?;

    config.set_credentials(api_key.trim().to_string(), base_url.trim().to_string());
    config.preferences.unit_system = units;
    config.endpoint()?;
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

/// Run one forecast lookup through the ticketed state.
async fn load_forecast(
    gateway: &dyn WeatherGateway,
    state: &mut DashboardState,
    query: &ForecastQuery,
) {
    state.dispatch(Action::InputChanged(query.location.clone()));
    let Some((ticket, _)) = state.submit() else {
        return;
    };
    let outcome = gateway.fetch_forecast(query).await;
    state.complete(ticket, outcome);
}

fn print_dashboard(state: &DashboardState) {
    let strip = HourlyStrip::new(hour_count(state), HOURS_PER_PAGE);
    println!("{}", render::dashboard(state, &strip));
}

fn hour_count(state: &DashboardState) -> usize {
    state.weather().map_or(0, |w| HourlyCard::build(w, state.unit_system()).entries.len())
}

/// Feed `partial` through the debounced search and wait for its outcome.
async fn lookup_suggestions(
    gateway: Arc<dyn WeatherGateway>,
    delay: Duration,
    partial: &str,
) -> anyhow::Result<Vec<LocationSuggestion>> {
    let (mut feed, rx) = SuggestionFeed::new(gateway, delay);
    feed.input(partial);
    let outcome = first_outcome(rx).await;
    feed.cancel();
    outcome
}

async fn first_outcome(
    mut rx: mpsc::UnboundedReceiver<SuggestionEvent>,
) -> anyhow::Result<Vec<LocationSuggestion>> {
    while let Some(event) = rx.recv().await {
        match event {
            SuggestionEvent::Searching { query } => info!(%query, "looking up locations"),
            SuggestionEvent::Loaded { suggestions, .. } => return Ok(suggestions),
            SuggestionEvent::Failed { message, .. } => bail!(message),
            SuggestionEvent::Cleared => {
                bail!("Type at least {MIN_QUERY_CHARS} characters to search for a location.")
            }
        }
    }
    Err(anyhow!("Location search stopped before returning results"))
}

struct SuggestionChoice(LocationSuggestion);

impl fmt::Display for SuggestionChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0.name, self.0.subtitle())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    LaterHours,
    EarlierHours,
    ToggleUnits,
    Refresh,
    Quit,
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MenuChoice::LaterHours => "Later hours",
            MenuChoice::EarlierHours => "Earlier hours",
            MenuChoice::ToggleUnits => "Switch °C / °F",
            MenuChoice::Refresh => "Refresh",
            MenuChoice::Quit => "Quit",
        })
    }
}

/// Interactive dashboard for a picked location.
async fn browse(
    gateway: &dyn WeatherGateway,
    config: &Config,
    args: QueryArgs,
    location: String,
) -> anyhow::Result<()> {
    let query = args.forecast_query(config, location);
    let mut state = DashboardState::new(args.unit_system(config));
    load_forecast(gateway, &mut state, &query).await;

    let mut strip = HourlyStrip::new(hour_count(&state), HOURS_PER_PAGE);

    loop {
        println!("{}", render::dashboard(&state, &strip));

        let mut options = Vec::new();
        if strip.show_right_arrow() {
            options.push(MenuChoice::LaterHours);
        }
        if strip.show_left_arrow() {
            options.push(MenuChoice::EarlierHours);
        }
        options.extend([MenuChoice::ToggleUnits, MenuChoice::Refresh, MenuChoice::Quit]);

        match inquire::Select::new("Next:", options).prompt()? {
            MenuChoice::LaterHours => {
                strip.scroll(ScrollDirection::Right);
            }
            MenuChoice::EarlierHours => {
                strip.scroll(ScrollDirection::Left);
            }
            MenuChoice::ToggleUnits => {
                state.dispatch(Action::UnitToggled);
            }
            MenuChoice::Refresh => {
                load_forecast(gateway, &mut state, &query).await;
                strip = HourlyStrip::new(hour_count(&state), HOURS_PER_PAGE);
            }
            MenuChoice::Quit => return Ok(()),
        }
    }
}

async fn watch(
    gateway: Arc<dyn WeatherGateway>,
    query: ForecastQuery,
    unit: UnitSystem,
    period: Duration,
) -> anyhow::Result<()> {
    let state = Arc::new(Mutex::new(DashboardState::new(unit)));
    refresh(gateway.as_ref(), &state, &query).await;

    let mut timer = RepeatTimer::new(period);
    timer.start(move || {
        let gateway = Arc::clone(&gateway);
        let state = Arc::clone(&state);
        let query = query.clone();
        async move { refresh(gateway.as_ref(), &state, &query).await }
    });
    info!(period_secs = period.as_secs(), "watching; press Ctrl-C to stop");

    tokio::signal::ctrl_c().await.context("Failed to listen for Ctrl-C")?;
    timer.cancel();
    Ok(())
}

/// The lock is released while the request is in flight; the ticket decides
/// whether the response still applies when it lands.
async fn refresh(
    gateway: &dyn WeatherGateway,
    state: &Mutex<DashboardState>,
    query: &ForecastQuery,
) {
    let ticket = state.lock().await.begin_query();
    let outcome = gateway.fetch_forecast(query).await;

    let mut state = state.lock().await;
    if let Err(err) = &outcome {
        warn!(error = %err, location = %query.location, "refresh failed");
    }
    state.complete(ticket, outcome);
    print_dashboard(&state);
}
