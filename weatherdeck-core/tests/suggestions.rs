use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::time::sleep;
use weatherdeck_core::{
    ForecastQuery, GatewayError, LocationSuggestion, WeatherGateway, WeatherQueryResult,
    model::HistoryResult,
    search::{SuggestionEvent, SuggestionFeed},
};

/// Answers suggestion lookups with one entry named after the query.
#[derive(Debug, Default)]
struct FakeGateway {
    calls: Mutex<Vec<String>>,
    latency: Duration,
    fail_with: Option<GatewayError>,
}

impl FakeGateway {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WeatherGateway for FakeGateway {
    async fn fetch_forecast(&self, _query: &ForecastQuery) -> Result<WeatherQueryResult, GatewayError> {
        Err(GatewayError::ServerError)
    }

    async fn fetch_suggestions(&self, partial: &str) -> Result<Vec<LocationSuggestion>, GatewayError> {
        self.calls.lock().unwrap().push(partial.to_string());
        sleep(self.latency).await;
        if let Some(err) = &self.fail_with {
            return Err(err.clone());
        }
        Ok(vec![LocationSuggestion { name: partial.to_string(), ..Default::default() }])
    }

    async fn fetch_history(&self, _location: &str, _date: NaiveDate) -> Result<HistoryResult, GatewayError> {
        Err(GatewayError::ServerError)
    }
}

const DELAY: Duration = Duration::from_millis(300);

#[tokio::test(start_paused = true)]
async fn rapid_typing_issues_one_lookup_for_the_last_value() {
    let gateway = Arc::new(FakeGateway::default());
    let (mut feed, mut rx) = SuggestionFeed::new(gateway.clone(), DELAY);

    for text in ["L", "Lo", "Lon", "Lond"] {
        feed.input(text);
        sleep(Duration::from_millis(50)).await;
    }

    assert_eq!(rx.recv().await, Some(SuggestionEvent::Cleared));
    assert_eq!(rx.recv().await, Some(SuggestionEvent::Searching { query: "Lond".into() }));
    match rx.recv().await {
        Some(SuggestionEvent::Loaded { query, suggestions }) => {
            assert_eq!(query, "Lond");
            assert_eq!(suggestions[0].name, "Lond");
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(gateway.calls(), ["Lond"]);
    assert!(!feed.is_pending());
}

#[tokio::test(start_paused = true)]
async fn short_input_cancels_the_pending_lookup() {
    let gateway = Arc::new(FakeGateway::default());
    let (mut feed, mut rx) = SuggestionFeed::new(gateway.clone(), DELAY);

    feed.input("Ber");
    assert!(feed.is_pending());
    feed.input("B");

    assert_eq!(rx.recv().await, Some(SuggestionEvent::Cleared));
    sleep(Duration::from_secs(2)).await;
    assert!(rx.try_recv().is_err());
    assert!(gateway.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn length_counts_raw_input_but_blank_input_clears() {
    let gateway = Arc::new(FakeGateway::default());
    let (mut feed, mut rx) = SuggestionFeed::new(gateway.clone(), DELAY);

    feed.input("   ");
    assert_eq!(rx.recv().await, Some(SuggestionEvent::Cleared));
    assert!(!feed.is_pending());

    // Two characters typed, one of them a space: the lookup uses the trimmed text.
    feed.input(" a");
    assert_eq!(rx.recv().await, Some(SuggestionEvent::Searching { query: "a".into() }));
    match rx.recv().await {
        Some(SuggestionEvent::Loaded { query, .. }) => assert_eq!(query, "a"),
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(gateway.calls(), ["a"]);
}

#[tokio::test(start_paused = true)]
async fn newer_input_supersedes_an_in_flight_lookup() {
    let gateway = Arc::new(FakeGateway { latency: Duration::from_secs(1), ..Default::default() });
    let (mut feed, mut rx) = SuggestionFeed::new(gateway.clone(), DELAY);

    feed.input("Par");
    // First lookup starts at 300ms and would finish at 1300ms.
    sleep(Duration::from_millis(500)).await;
    feed.input("Pari");

    assert_eq!(rx.recv().await, Some(SuggestionEvent::Searching { query: "Par".into() }));
    assert_eq!(rx.recv().await, Some(SuggestionEvent::Searching { query: "Pari".into() }));
    match rx.recv().await {
        Some(SuggestionEvent::Loaded { query, .. }) => assert_eq!(query, "Pari"),
        other => panic!("unexpected event {other:?}"),
    }

    sleep(Duration::from_secs(5)).await;
    assert!(rx.try_recv().is_err());
    assert_eq!(gateway.calls(), ["Par", "Pari"]);
}

#[tokio::test(start_paused = true)]
async fn failures_surface_a_suggestion_message() {
    let gateway = Arc::new(FakeGateway {
        fail_with: Some(GatewayError::RateLimited),
        ..Default::default()
    });
    let (mut feed, mut rx) = SuggestionFeed::new(gateway, DELAY);

    feed.input("Quito");
    assert_eq!(rx.recv().await, Some(SuggestionEvent::Searching { query: "Quito".into() }));
    assert_eq!(
        rx.recv().await,
        Some(SuggestionEvent::Failed {
            query: "Quito".into(),
            message: "Failed to retrieve location suggestions: Rate Limit Exceeded".into(),
        })
    );
}

#[tokio::test(start_paused = true)]
async fn cancel_discards_pending_work() {
    let gateway = Arc::new(FakeGateway::default());
    let (mut feed, mut rx) = SuggestionFeed::new(gateway.clone(), DELAY);

    feed.input("Madrid");
    feed.cancel();
    sleep(Duration::from_secs(1)).await;

    assert!(rx.try_recv().is_err());
    assert!(gateway.calls().is_empty());
}
