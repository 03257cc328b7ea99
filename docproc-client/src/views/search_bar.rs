//! Full-text search box with a dismissable results dropdown.

use crate::models::{DocumentId, SearchHit};
use crate::services::ApiClient;
use crate::sync::{LoadOutcome, Nowhere, OutsideDismiss, PointerHub, Region};
use crate::views::collaborators::{Navigator, Route};
use parking_lot::Mutex;

#[derive(Default)]
struct SearchState {
    query: String,
    results: Vec<SearchHit>,
    searching: bool,
    error: Option<String>,
    generation: u64,
    disposed: bool,
}

pub struct SearchBar {
    api: ApiClient,
    state: Mutex<SearchState>,
    dropdown: OutsideDismiss,
}

impl SearchBar {
    /// `container` covers both the input and the dropdown.
    pub fn new(api: ApiClient, hub: PointerHub, container: impl Region + 'static) -> Self {
        Self {
            api,
            state: Mutex::new(SearchState::default()),
            dropdown: OutsideDismiss::new(hub, container, Nowhere),
        }
    }

    pub fn set_query(&self, text: &str) {
        self.state.lock().query = text.to_string();
    }

    pub fn query(&self) -> String {
        self.state.lock().query.clone()
    }

    pub fn results(&self) -> Vec<SearchHit> {
        self.state.lock().results.clone()
    }

    pub fn is_searching(&self) -> bool {
        self.state.lock().searching
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    /// Whether the dropdown is shown; it may be shown with no results.
    pub fn is_open(&self) -> bool {
        self.dropdown.is_open()
    }

    pub fn dropdown(&self) -> &OutsideDismiss {
        &self.dropdown
    }

    /// Run the current query. Blank queries are ignored.
    pub async fn submit(&self) -> LoadOutcome {
        let (generation, query) = {
            let mut state = self.state.lock();
            if state.disposed || state.query.trim().is_empty() {
                return LoadOutcome::Skipped;
            }
            state.generation += 1;
            state.searching = true;
            (state.generation, state.query.clone())
        };

        let result = self.api.search(&query).await;

        let mut state = self.state.lock();
        if state.disposed || state.generation != generation {
            return LoadOutcome::Stale;
        }
        state.searching = false;

        match result {
            Ok(hits) => {
                tracing::debug!(query = %query, hits = hits.len(), "Search completed");
                state.results = hits;
                state.error = None;
                drop(state);
                self.dropdown.open();
                LoadOutcome::Applied
            }
            Err(e) => {
                let message = e.user_message();
                tracing::warn!(query = %query, error = %message, "Search failed");
                state.error = Some(message.clone());
                LoadOutcome::Failed(message)
            }
        }
    }

    /// Reopen the dropdown on focus if earlier results are still held.
    pub fn focus(&self) -> bool {
        let has_results = !self.state.lock().results.is_empty();
        self.dropdown.focus_trigger(has_results)
    }

    /// Open a hit's document.
    pub fn follow(&self, id: DocumentId, navigator: &dyn Navigator) {
        self.dropdown.close();
        navigator.navigate(Route::Document(id));
    }

    pub fn dispose(&self) {
        self.state.lock().disposed = true;
        self.dropdown.close();
    }
}
