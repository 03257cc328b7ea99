//! Type-ahead suggestions for the add-tag input.

use crate::models::{names_match, PageRequest, Tag};
use crate::sync::dismiss::{OutsideDismiss, PointerHub, Region};
use crate::sync::paginated::{LoadOutcome, PageSource};
use parking_lot::Mutex;

#[derive(Default)]
struct SuggestionState {
    query: String,
    suggestions: Vec<Tag>,
    generation: u64,
    disposed: bool,
}

/// Suggestion list for one tag input.
///
/// Every keystroke recomputes the list from scratch. Results from an older
/// keystroke never replace those of a newer one, and tags already attached
/// to the document are never offered.
pub struct TagSuggestions<S: PageSource<Item = Tag>> {
    source: S,
    limit: u64,
    state: Mutex<SuggestionState>,
    panel: OutsideDismiss,
}

impl<S: PageSource<Item = Tag>> TagSuggestions<S> {
    pub fn new(
        source: S,
        limit: u64,
        hub: PointerHub,
        input: impl Region + 'static,
        list: impl Region + 'static,
    ) -> Self {
        Self {
            source,
            limit,
            state: Mutex::new(SuggestionState::default()),
            panel: OutsideDismiss::new(hub, input, list),
        }
    }

    pub fn query(&self) -> String {
        self.state.lock().query.clone()
    }

    pub fn suggestions(&self) -> Vec<Tag> {
        self.state.lock().suggestions.clone()
    }

    pub fn is_visible(&self) -> bool {
        self.panel.is_open()
    }

    pub fn panel(&self) -> &OutsideDismiss {
        &self.panel
    }

    /// Recompute suggestions for `query`, excluding `attached`.
    ///
    /// A blank query clears and hides the list without a request.
    pub async fn suggest(&self, query: &str, attached: &[Tag]) -> LoadOutcome {
        let generation = {
            let mut state = self.state.lock();
            if state.disposed {
                return LoadOutcome::Skipped;
            }
            state.generation += 1;
            state.query = query.to_string();
            if query.trim().is_empty() {
                state.suggestions.clear();
                drop(state);
                self.panel.close();
                return LoadOutcome::Applied;
            }
            state.generation
        };

        let search = query.trim();
        let result = self
            .source
            .fetch_page(Some(search), PageRequest::first(self.limit))
            .await;

        let mut state = self.state.lock();
        if state.disposed || state.generation != generation {
            tracing::debug!(query = search, "Discarding stale tag suggestions");
            return LoadOutcome::Stale;
        }

        match result {
            Ok(page) => {
                state.suggestions = page
                    .items
                    .into_iter()
                    .filter(|tag| !attached.iter().any(|a| names_match(&a.name, &tag.name)))
                    .collect();
                let visible = !state.suggestions.is_empty();
                drop(state);
                if visible {
                    self.panel.open();
                } else {
                    self.panel.close();
                }
                LoadOutcome::Applied
            }
            Err(e) => {
                state.suggestions.clear();
                drop(state);
                self.panel.close();
                let message = e.user_message();
                tracing::warn!(query = search, error = %message, "Tag suggestion lookup failed");
                LoadOutcome::Failed(message)
            }
        }
    }

    /// Put the chosen name in the input and close the list. The caller
    /// decides whether to submit.
    pub fn select(&self, tag: &Tag) -> String {
        {
            let mut state = self.state.lock();
            state.generation += 1;
            state.query = tag.name.clone();
            state.suggestions.clear();
        }
        self.panel.close();
        tag.name.clone()
    }

    /// Reopen the list without a new lookup if it still has entries.
    pub fn focus(&self) -> bool {
        let has_content = !self.state.lock().suggestions.is_empty();
        self.panel.focus_trigger(has_content)
    }

    /// Reset the input, e.g. after a successful add.
    pub fn clear(&self) {
        {
            let mut state = self.state.lock();
            state.generation += 1;
            state.query.clear();
            state.suggestions.clear();
        }
        self.panel.close();
    }

    pub fn dispose(&self) {
        self.state.lock().disposed = true;
        self.panel.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::models::{Page, PageWindow};
    use crate::sync::dismiss::{Point, Rect};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Arc;
    use tokio::sync::oneshot;

    type Reply = Result<Page<Tag>, ClientError>;

    #[derive(Default)]
    struct Vocabulary {
        gates: Mutex<VecDeque<oneshot::Receiver<Reply>>>,
        searches: Mutex<Vec<(String, u64)>>,
    }

    impl Vocabulary {
        fn gate(&self) -> oneshot::Sender<Reply> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().push_back(rx);
            tx
        }
    }

    #[async_trait]
    impl PageSource for Arc<Vocabulary> {
        type Item = Tag;

        async fn fetch_page(&self, filter: Option<&str>, page: PageRequest) -> Reply {
            self.searches
                .lock()
                .push((filter.unwrap_or_default().to_string(), page.limit));
            let gate = self.gates.lock().pop_front().expect("a gate per search");
            gate.await.expect("gate released")
        }
    }

    fn tags(names: &[&str]) -> Reply {
        let items: Vec<Tag> = names
            .iter()
            .enumerate()
            .map(|(i, n)| Tag::new(i as i64 + 1, *n))
            .collect();
        let total = items.len() as u64;
        Ok(Page {
            items,
            window: PageWindow::new(0, 50, total),
        })
    }

    fn engine() -> (TagSuggestions<Arc<Vocabulary>>, Arc<Vocabulary>, PointerHub) {
        let vocab = Arc::new(Vocabulary::default());
        let hub = PointerHub::new();
        let engine = TagSuggestions::new(
            Arc::clone(&vocab),
            50,
            hub.clone(),
            Rect::new(0.0, 0.0, 300.0, 30.0),
            Rect::new(0.0, 30.0, 300.0, 200.0),
        );
        (engine, vocab, hub)
    }

    #[tokio::test]
    async fn test_blank_query_hides_without_request() {
        let (engine, vocab, _hub) = engine();

        assert_eq!(engine.suggest("   ", &[]).await, LoadOutcome::Applied);
        assert!(engine.suggestions().is_empty());
        assert!(!engine.is_visible());
        assert!(vocab.searches.lock().is_empty());
    }

    #[tokio::test]
    async fn test_attached_tags_are_excluded_case_insensitively() {
        let (engine, vocab, _hub) = engine();
        vocab.gate().send(tags(&["Finance", "fin-2024", "Legal"])).unwrap();
        let attached = vec![Tag::new(9, "FINANCE")];

        engine.suggest(" fin ", &attached).await;

        let names: Vec<String> = engine.suggestions().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["fin-2024", "Legal"]);
        assert!(engine.is_visible());
        assert_eq!(vocab.searches.lock()[0], ("fin".to_string(), 50));
    }

    #[tokio::test]
    async fn test_all_filtered_out_stays_hidden() {
        let (engine, vocab, _hub) = engine();
        vocab.gate().send(tags(&["invoice"])).unwrap();

        engine.suggest("inv", &[Tag::new(3, "Invoice")]).await;

        assert!(engine.suggestions().is_empty());
        assert!(!engine.is_visible());
    }

    #[tokio::test]
    async fn test_older_keystroke_cannot_overwrite_newer() {
        let (engine, vocab, _hub) = engine();
        let first = vocab.gate();
        let second = vocab.gate();

        let (a, b, _) = tokio::join!(engine.suggest("f", &[]), engine.suggest("fi", &[]), async {
            second.send(tags(&["finance"])).unwrap();
            tokio::task::yield_now().await;
            first.send(tags(&["foo", "finance"])).unwrap();
        });

        assert_eq!(a, LoadOutcome::Stale);
        assert_eq!(b, LoadOutcome::Applied);
        assert_eq!(engine.suggestions(), vec![Tag::new(1, "finance")]);
        assert_eq!(engine.query(), "fi");
    }

    #[tokio::test]
    async fn test_clearing_input_beats_pending_lookup() {
        let (engine, vocab, _hub) = engine();
        let gate = vocab.gate();

        let (a, b, _) = tokio::join!(engine.suggest("fin", &[]), engine.suggest("", &[]), async {
            gate.send(tags(&["finance"])).unwrap();
        });

        assert_eq!(a, LoadOutcome::Stale);
        assert_eq!(b, LoadOutcome::Applied);
        assert!(engine.suggestions().is_empty());
        assert!(!engine.is_visible());
    }

    #[tokio::test]
    async fn test_select_fills_input_and_closes() {
        let (engine, vocab, _hub) = engine();
        vocab.gate().send(tags(&["Finance"])).unwrap();
        engine.suggest("fin", &[]).await;

        let chosen = engine.select(&Tag::new(1, "Finance"));

        assert_eq!(chosen, "Finance");
        assert_eq!(engine.query(), "Finance");
        assert!(!engine.is_visible());
        assert_eq!(vocab.searches.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_outside_click_hides_and_focus_reopens() {
        let (engine, vocab, hub) = engine();
        vocab.gate().send(tags(&["finance"])).unwrap();
        engine.suggest("fin", &[]).await;
        assert_eq!(hub.listener_count(), 1);

        hub.pointer_down(Point::new(500.0, 500.0));
        assert!(!engine.is_visible());
        assert_eq!(hub.listener_count(), 0);

        assert!(engine.focus());
        assert!(engine.is_visible());
        assert_eq!(vocab.searches.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_lookup_hides_list() {
        let (engine, vocab, _hub) = engine();
        vocab
            .gate()
            .send(Err(ClientError::request("Request failed: Internal Server Error", Some(500))))
            .unwrap();

        let outcome = engine.suggest("fin", &[]).await;

        assert!(matches!(outcome, LoadOutcome::Failed(_)));
        assert!(!engine.is_visible());
    }
}
