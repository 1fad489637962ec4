//! Debounced autocomplete over the geocoder.
//!
//! Every query change bumps a generation counter. A scheduled fetch sleeps
//! through the quiescence window and only hits the network if its generation
//! is still the latest; results travel back over a channel tagged with that
//! generation, and [`SuggestionController::apply`] drops any batch that has
//! been overtaken in the meantime.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tokio::sync::mpsc;
use tracing::debug;

use crate::{client::GeocodeClient, error::ClientError, model::PlaceCandidate};

/// Queries shorter than this (after trimming) never reach the geocoder.
pub const MIN_QUERY_CHARS: usize = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionSettings {
    pub count: u32,
    pub language: String,
    pub debounce: Duration,
    pub min_query_chars: usize,
}

impl Default for SuggestionSettings {
    fn default() -> Self {
        Self {
            count: 5,
            language: "en".to_string(),
            debounce: Duration::from_millis(300),
            min_query_chars: MIN_QUERY_CHARS,
        }
    }
}

/// The suggestion panel.
///
/// `highlighted`, when set, always indexes into `items`; it is reset whenever
/// `items` is replaced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SuggestionState {
    items: Vec<PlaceCandidate>,
    visible: bool,
    highlighted: Option<usize>,
}

impl SuggestionState {
    /// A panel showing `items`, nothing highlighted. Empty lists stay hidden.
    pub fn with_items(items: Vec<PlaceCandidate>) -> Self {
        let mut state = Self::default();
        state.replace(items);
        state
    }

    pub fn items(&self) -> &[PlaceCandidate] {
        &self.items
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn highlighted_item(&self) -> Option<&PlaceCandidate> {
        self.highlighted.and_then(|i| self.items.get(i))
    }

    /// Set the highlight; indices past the end are ignored.
    pub fn set_highlighted(&mut self, index: Option<usize>) {
        match index {
            Some(i) if i >= self.items.len() => {}
            _ => self.highlighted = index,
        }
    }

    fn replace(&mut self, items: Vec<PlaceCandidate>) {
        self.visible = !items.is_empty();
        self.items = items;
        self.highlighted = None;
    }

    fn clear(&mut self) {
        self.replace(Vec::new());
    }
}

/// Result of one suggestion fetch, tagged with the generation that issued it.
#[derive(Debug)]
pub struct SuggestionBatch {
    pub generation: u64,
    pub query: String,
    pub result: Result<Vec<PlaceCandidate>, ClientError>,
}

#[derive(Debug)]
pub struct SuggestionController {
    geocoder: Arc<dyn GeocodeClient>,
    settings: SuggestionSettings,
    state: SuggestionState,
    query: String,
    generation: Arc<AtomicU64>,
    batches: mpsc::UnboundedSender<SuggestionBatch>,
}

impl SuggestionController {
    /// Returns the controller and the receiving end its fetches report to.
    pub fn new(
        geocoder: Arc<dyn GeocodeClient>,
        settings: SuggestionSettings,
    ) -> (Self, mpsc::UnboundedReceiver<SuggestionBatch>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let controller = Self {
            geocoder,
            settings,
            state: SuggestionState::default(),
            query: String::new(),
            generation: Arc::new(AtomicU64::new(0)),
            batches: tx,
        };
        (controller, rx)
    }

    pub fn state(&self) -> &SuggestionState {
        &self.state
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Feed the latest input text. Must be called inside a tokio runtime.
    pub fn on_query_changed(&mut self, query: &str) {
        self.query = query.to_owned();
        let generation = self.invalidate();

        let trimmed = query.trim();
        let min_chars = self.settings.min_query_chars.max(MIN_QUERY_CHARS);
        if trimmed.chars().count() < min_chars {
            self.state.clear();
            return;
        }

        let geocoder = Arc::clone(&self.geocoder);
        let latest = Arc::clone(&self.generation);
        let batches = self.batches.clone();
        let settings = self.settings.clone();
        let query = trimmed.to_owned();

        tokio::spawn(async move {
            tokio::time::sleep(settings.debounce).await;
            if latest.load(Ordering::SeqCst) != generation {
                return;
            }

            debug!(%query, generation, "fetching suggestions");
            let result = geocoder.search(&query, settings.count, &settings.language).await;
            // The receiver is gone only when the owner is shutting down.
            let _ = batches.send(SuggestionBatch {
                generation,
                query,
                result,
            });
        });
    }

    /// Apply a finished fetch. Returns false if the batch was stale and dropped.
    pub fn apply(&mut self, batch: SuggestionBatch) -> bool {
        if batch.generation != self.generation.load(Ordering::SeqCst) {
            debug!(
                query = %batch.query,
                generation = batch.generation,
                "dropping stale suggestions"
            );
            return false;
        }

        match batch.result {
            Ok(items) => self.state.replace(items),
            Err(_) => self.state.clear(),
        }
        true
    }

    /// Hide and empty the panel; anything still pending is discarded.
    pub fn dismiss(&mut self) {
        self.invalidate();
        self.state.clear();
    }

    pub fn highlight(&mut self, index: Option<usize>) {
        self.state.set_highlighted(index);
    }

    /// Replace the input text without starting a suggestion cycle.
    pub fn set_query_text(&mut self, text: &str) {
        self.query = text.to_owned();
        self.dismiss();
    }

    fn invalidate(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }
}
