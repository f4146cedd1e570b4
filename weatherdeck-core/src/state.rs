//! Dashboard state: the single source the cards render from.
//!
//! Queries are tracked by a monotonically increasing [`QueryTicket`]. Only the
//! completion carrying the newest ticket is applied; anything older is a stale
//! response and leaves the state untouched, whatever order the network
//! delivers results in.

use tracing::debug;

use crate::{
    gateway::{GatewayError, Operation},
    model::{UnitSystem, WeatherQueryResult},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryTicket(u64);

impl QueryTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    QueryStarted,
    QuerySucceeded { ticket: QueryTicket, result: Box<WeatherQueryResult> },
    QueryFailed { ticket: QueryTicket, message: String },
    UnitToggled,
    InputChanged(String),
    InputCleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Started(QueryTicket),
    Applied,
    /// A completion for a superseded query was ignored.
    Stale,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    weather: Option<WeatherQueryResult>,
    unit_system: UnitSystem,
    loading: bool,
    error: Option<String>,
    input: String,
    latest: u64,
}

impl DashboardState {
    pub fn new(unit_system: UnitSystem) -> Self {
        Self { unit_system, ..Default::default() }
    }

    pub fn weather(&self) -> Option<&WeatherQueryResult> {
        self.weather.as_ref()
    }

    pub fn unit_system(&self) -> UnitSystem {
        self.unit_system
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_latest(&self, ticket: QueryTicket) -> bool {
        ticket.0 == self.latest
    }

    pub fn dispatch(&mut self, action: Action) -> Transition {
        match action {
            Action::QueryStarted => Transition::Started(self.begin_query()),
            Action::QuerySucceeded { ticket, result } => {
                if !self.finish(ticket) {
                    return Transition::Stale;
                }
                self.weather = Some(*result);
                Transition::Applied
            }
            Action::QueryFailed { ticket, message } => {
                if !self.finish(ticket) {
                    return Transition::Stale;
                }
                // The previous forecast stays on screen.
                self.error = Some(message);
                Transition::Applied
            }
            Action::UnitToggled => {
                self.unit_system = self.unit_system.toggled();
                Transition::Applied
            }
            Action::InputChanged(text) => {
                self.input = text;
                Transition::Applied
            }
            Action::InputCleared => {
                self.input.clear();
                Transition::Applied
            }
        }
    }

    /// Start a query and hand out its ticket.
    pub fn begin_query(&mut self) -> QueryTicket {
        self.latest += 1;
        self.loading = true;
        self.error = None;
        QueryTicket(self.latest)
    }

    /// Start a query for the current input; `None` when the input is blank.
    pub fn submit(&mut self) -> Option<(QueryTicket, String)> {
        let location = self.input.trim().to_string();
        if location.is_empty() {
            return None;
        }
        Some((self.begin_query(), location))
    }

    /// Apply a gateway outcome for `ticket`.
    pub fn complete(
        &mut self,
        ticket: QueryTicket,
        outcome: Result<WeatherQueryResult, GatewayError>,
    ) -> Transition {
        let action = match outcome {
            Ok(result) => Action::QuerySucceeded { ticket, result: Box::new(result) },
            Err(err) => Action::QueryFailed { ticket, message: err.user_message(Operation::Forecast) },
        };
        self.dispatch(action)
    }

    /// Common bookkeeping for a completion. Returns false for stale tickets.
    fn finish(&mut self, ticket: QueryTicket) -> bool {
        if !self.is_latest(ticket) {
            debug!(ticket = ticket.0, latest = self.latest, "discarding stale forecast response");
            return false;
        }
        self.loading = false;
        // The search box resets whether or not the lookup worked.
        self.input.clear();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Location;

    fn result_for(name: &str) -> WeatherQueryResult {
        WeatherQueryResult {
            location: Location { name: name.to_string(), ..Default::default() },
            ..Default::default()
        }
    }

    #[test]
    fn successful_query_replaces_weather_and_clears_input() {
        let mut state = DashboardState::new(UnitSystem::Metric);
        state.dispatch(Action::InputChanged("Berlin".into()));

        let (ticket, location) = state.submit().expect("non-blank input");
        assert_eq!(location, "Berlin");
        assert!(state.is_loading());

        assert_eq!(state.complete(ticket, Ok(result_for("Berlin"))), Transition::Applied);
        assert!(!state.is_loading());
        assert_eq!(state.input(), "");
        assert_eq!(state.weather().map(|w| w.location.name.as_str()), Some("Berlin"));
        assert_eq!(state.error(), None);
    }

    #[test]
    fn failed_query_keeps_previous_weather() {
        let mut state = DashboardState::default();
        let first = state.begin_query();
        state.complete(first, Ok(result_for("Rome")));

        state.dispatch(Action::InputChanged("Nowhere".into()));
        let second = state.begin_query();
        state.complete(second, Err(GatewayError::Unauthorized));

        assert_eq!(state.error(), Some("Failed to fetch weather data: Invalid API Key"));
        assert_eq!(state.weather().map(|w| w.location.name.as_str()), Some("Rome"));
        assert_eq!(state.input(), "");
        assert!(!state.is_loading());
    }

    #[test]
    fn starting_a_query_clears_the_previous_error() {
        let mut state = DashboardState::default();
        let t = state.begin_query();
        state.complete(t, Err(GatewayError::ServerError));
        assert!(state.error().is_some());

        state.begin_query();
        assert!(state.error().is_none());
    }

    #[test]
    fn stale_responses_are_ignored_in_any_order() {
        let mut state = DashboardState::default();
        let older = state.begin_query();
        let newer = state.begin_query();
        assert!(newer > older);

        assert_eq!(state.complete(newer, Ok(result_for("Newer"))), Transition::Applied);
        assert_eq!(state.complete(older, Ok(result_for("Older"))), Transition::Stale);
        assert_eq!(state.weather().map(|w| w.location.name.as_str()), Some("Newer"));

        // A stale failure does not surface an error either.
        let a = state.begin_query();
        let b = state.begin_query();
        assert_eq!(state.complete(a, Err(GatewayError::RateLimited)), Transition::Stale);
        assert!(state.is_loading());
        assert!(state.error().is_none());
        state.complete(b, Ok(result_for("Latest")));
        assert!(!state.is_loading());
    }

    #[test]
    fn blank_input_does_not_start_a_query() {
        let mut state = DashboardState::default();
        state.dispatch(Action::InputChanged("   ".into()));
        assert!(state.submit().is_none());
        assert!(!state.is_loading());
    }

    #[test]
    fn unit_toggle_flips_between_systems() {
        let mut state = DashboardState::new(UnitSystem::Imperial);
        state.dispatch(Action::UnitToggled);
        assert_eq!(state.unit_system(), UnitSystem::Metric);
        state.dispatch(Action::UnitToggled);
        assert_eq!(state.unit_system(), UnitSystem::Imperial);
    }

    #[test]
    fn input_clear_resets_text() {
        let mut state = DashboardState::default();
        state.dispatch(Action::InputChanged("Lis".into()));
        assert_eq!(state.input(), "Lis");
        state.dispatch(Action::InputCleared);
        assert_eq!(state.input(), "");
    }
}
