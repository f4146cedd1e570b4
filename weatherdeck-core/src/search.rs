//! Debounced location suggestions.
//!
//! Every keystroke goes through [`SuggestionFeed::input`]; a lookup fires only
//! after the quiet period, and its result is delivered only if no newer input
//! arrived while it was in flight.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::{
    gateway::{Operation, WeatherGateway},
    model::LocationSuggestion,
    timer::Debouncer,
};

/// Shorter input, or input that is only whitespace, clears the list instead
/// of querying.
pub const MIN_QUERY_CHARS: usize = 2;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, PartialEq)]
pub enum SuggestionEvent {
    Cleared,
    Searching { query: String },
    Loaded { query: String, suggestions: Vec<LocationSuggestion> },
    Failed { query: String, message: String },
}

#[derive(Debug)]
pub struct SuggestionFeed {
    gateway: Arc<dyn WeatherGateway>,
    debouncer: Debouncer,
    generation: Arc<AtomicU64>,
    events: mpsc::UnboundedSender<SuggestionEvent>,
}

impl SuggestionFeed {
    pub fn new(
        gateway: Arc<dyn WeatherGateway>,
        delay: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<SuggestionEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let feed = Self {
            gateway,
            debouncer: Debouncer::new(delay),
            generation: Arc::new(AtomicU64::new(0)),
            events,
        };
        (feed, rx)
    }

    /// Feed the current contents of the search box.
    pub fn input(&mut self, text: &str) {
        let current = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let query = text.trim().to_string();

        if query.is_empty() || text.chars().count() < MIN_QUERY_CHARS {
            self.debouncer.cancel();
            let _ = self.events.send(SuggestionEvent::Cleared);
            return;
        }

        let gateway = Arc::clone(&self.gateway);
        let generation = Arc::clone(&self.generation);
        let events = self.events.clone();

        self.debouncer.schedule(async move {
            let _ = events.send(SuggestionEvent::Searching { query: query.clone() });
            let outcome = gateway.fetch_suggestions(&query).await;

            if generation.load(Ordering::SeqCst) != current {
                debug!(%query, "dropping superseded suggestions");
                return;
            }

            let event = match outcome {
                Ok(suggestions) => SuggestionEvent::Loaded { query, suggestions },
                Err(err) => {
                    warn!(%query, error = %err, "location suggestions failed");
                    SuggestionEvent::Failed { query, message: err.user_message(Operation::Suggestions) }
                }
            };
            let _ = events.send(event);
        });
    }

    /// Drop any pending lookup, e.g. once a suggestion has been picked.
    pub fn cancel(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.debouncer.cancel();
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.is_active()
    }
}
