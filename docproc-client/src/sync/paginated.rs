//! Generic controller for one filtered, paginated remote query.
//!
//! Inputs are `{filter, skip, limit}`. Every input change issues exactly one
//! fetch. Each fetch is stamped with a generation number and its result is
//! committed only if no newer fetch was started in the meantime and the
//! controller has not been disposed.

use crate::error::ClientError;
use crate::models::{Page, PageRequest, PageWindow};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// Remote query backing a [`PaginatedQuery`].
#[async_trait]
pub trait PageSource: Send + Sync + 'static {
    type Item: Clone + Send + Sync + 'static;

    async fn fetch_page(
        &self,
        filter: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<Self::Item>, ClientError>;
}

/// What happened to the state after an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The fetched result was committed.
    Applied,
    /// A newer request superseded this one, or the owner went away.
    Stale,
    /// The request failed; the error was recorded.
    Failed(String),
    /// Nothing to do (e.g. no next page).
    Skipped,
}

impl LoadOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, LoadOutcome::Applied)
    }
}

/// Point-in-time copy of a controller's visible state.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySnapshot<T> {
    pub filter: Option<String>,
    pub items: Vec<T>,
    pub window: PageWindow,
    pub loading: bool,
    pub error: Option<String>,
    /// True once any fetch has been committed.
    pub loaded: bool,
}

struct QueryState<T> {
    filter: Option<String>,
    request: PageRequest,
    items: Vec<T>,
    window: PageWindow,
    /// Filter the committed window was fetched with.
    window_filter: Option<String>,
    loading: bool,
    error: Option<String>,
    loaded: bool,
    generation: u64,
    disposed: bool,
}

pub struct PaginatedQuery<S: PageSource> {
    name: &'static str,
    source: Arc<S>,
    state: Arc<Mutex<QueryState<S::Item>>>,
}

impl<S: PageSource> Clone for PaginatedQuery<S> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            source: Arc::clone(&self.source),
            state: Arc::clone(&self.state),
        }
    }
}

fn normalize_filter(filter: Option<String>) -> Option<String> {
    filter.filter(|f| !f.trim().is_empty())
}

impl<S: PageSource> PaginatedQuery<S> {
    /// `limit` is fixed for the controller's lifetime.
    pub fn new(name: &'static str, source: S, limit: u64) -> Self {
        Self {
            name,
            source: Arc::new(source),
            state: Arc::new(Mutex::new(QueryState {
                filter: None,
                request: PageRequest::first(limit),
                items: Vec::new(),
                window: PageWindow::new(0, limit, 0),
                window_filter: None,
                loading: false,
                error: None,
                loaded: false,
                generation: 0,
                disposed: false,
            })),
        }
    }

    pub fn snapshot(&self) -> QuerySnapshot<S::Item> {
        let state = self.state.lock();
        QuerySnapshot {
            filter: state.filter.clone(),
            items: state.items.clone(),
            window: state.window,
            loading: state.loading,
            error: state.error.clone(),
            loaded: state.loaded,
        }
    }

    pub fn items(&self) -> Vec<S::Item> {
        self.state.lock().items.clone()
    }

    pub fn window(&self) -> PageWindow {
        self.state.lock().window
    }

    pub fn filter(&self) -> Option<String> {
        self.state.lock().filter.clone()
    }

    /// The page the next fetch will ask for.
    pub fn pending_request(&self) -> PageRequest {
        self.state.lock().request
    }

    pub fn limit(&self) -> u64 {
        self.state.lock().request.limit
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().loading
    }

    /// Initial load on mount.
    pub async fn load(&self) -> LoadOutcome {
        self.fetch().await
    }

    /// Re-issue the current query unchanged.
    pub async fn reload(&self) -> LoadOutcome {
        self.fetch().await
    }

    /// Replace the filter and go back to the first page.
    pub async fn set_filter(&self, filter: Option<String>) -> LoadOutcome {
        {
            let mut state = self.state.lock();
            state.filter = normalize_filter(filter);
            state.request.skip = 0;
        }
        self.fetch().await
    }

    pub async fn next_page(&self) -> LoadOutcome {
        if !self.step(|window| window.has_next, PageRequest::next) {
            return LoadOutcome::Skipped;
        }
        self.fetch().await
    }

    pub async fn prev_page(&self) -> LoadOutcome {
        if !self.step(|window| window.has_prev, PageRequest::prev) {
            return LoadOutcome::Skipped;
        }
        self.fetch().await
    }

    /// Move the pending request one page from the committed window. When the
    /// committed window belongs to another filter, the first page of the
    /// active filter is requested instead.
    fn step(
        &self,
        allowed: impl Fn(&PageWindow) -> bool,
        advance: impl Fn(PageRequest) -> PageRequest,
    ) -> bool {
        let mut state = self.state.lock();
        if state.window_filter != state.filter {
            state.request.skip = 0;
            return true;
        }
        if !allowed(&state.window) {
            return false;
        }
        state.request = advance(PageRequest {
            skip: state.window.skip,
            limit: state.request.limit,
        });
        true
    }

    /// Reset to "no filter" if the active filter is not among `options`.
    /// Returns `None` when the filter is still valid.
    pub async fn ensure_filter_in(&self, options: &[String]) -> Option<LoadOutcome> {
        let stale_filter = {
            let state = self.state.lock();
            match &state.filter {
                Some(active) if !options.iter().any(|o| o == active) => Some(active.clone()),
                _ => None,
            }
        };

        let removed = stale_filter?;
        tracing::info!(
            query = self.name,
            filter = %removed,
            "Active filter no longer available; resetting"
        );
        Some(self.set_filter(None).await)
    }

    /// Drop committed items matching `predicate` and shrink the total to
    /// match. Returns how many were removed.
    pub fn remove_where(&self, predicate: impl Fn(&S::Item) -> bool) -> usize {
        let mut state = self.state.lock();
        let before = state.items.len();
        state.items.retain(|item| !predicate(item));
        let removed = before - state.items.len();
        if removed > 0 {
            let window = state.window;
            state.window =
                PageWindow::new(window.skip, window.limit, window.total.saturating_sub(removed as u64));
        }
        removed
    }

    /// Stop applying results; in-flight fetches complete as `Stale`.
    pub fn dispose(&self) {
        let mut state = self.state.lock();
        state.disposed = true;
        state.loading = false;
    }

    async fn fetch(&self) -> LoadOutcome {
        let (generation, filter, request) = {
            let mut state = self.state.lock();
            if state.disposed {
                return LoadOutcome::Skipped;
            }
            state.generation += 1;
            state.loading = true;
            (state.generation, state.filter.clone(), state.request)
        };

        let result = self.source.fetch_page(filter.as_deref(), request).await;

        let mut state = self.state.lock();
        if state.disposed || state.generation != generation {
            tracing::debug!(
                query = self.name,
                generation,
                latest = state.generation,
                "Discarding stale page response"
            );
            return LoadOutcome::Stale;
        }
        state.loading = false;

        match result {
            Ok(page) => {
                state.items = page.items;
                state.window = page.window;
                state.window_filter = filter.clone();
                state.request.skip = page.window.skip;
                state.error = None;
                state.loaded = true;
                LoadOutcome::Applied
            }
            Err(e) => {
                let message = e.user_message();
                tracing::warn!(
                    query = self.name,
                    filter = ?filter,
                    skip = request.skip,
                    error = %message,
                    "Page fetch failed"
                );
                state.error = Some(message.clone());
                LoadOutcome::Failed(message)
            }
        }
    }
}
