//! Single-document view-model: load, delete, and tag add/remove.
//!
//! Tag mutations patch the held snapshot from the backend's response
//! instead of refetching the document.

use crate::config::PaginationSettings;
use crate::error::ClientError;
use crate::models::{AddTagRequest, Document, DocumentId, Tag, TagId};
use crate::services::ApiClient;
use crate::sync::{
    InvalidationBus, LoadOutcome, Nowhere, PointerHub, Region, Signal, TagSuggestions,
    TagsBySearch,
};
use crate::views::collaborators::{Confirm, Navigator, Route};
use parking_lot::Mutex;
use validator::Validate;

pub const DELETE_DOCUMENT_PROMPT: &str = "Are you sure you want to delete this document?";

#[derive(Debug, Clone, PartialEq)]
pub enum DetailState {
    Loading,
    Ready(Document),
    NotFound,
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Cancelled,
    Deleted,
    Failed(String),
    /// No loaded document to delete.
    NotReady,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagChange {
    Added(Tag),
    Removed(TagId),
    /// Input failed validation; nothing was sent.
    Rejected(String),
    Failed(String),
    NotReady,
}

struct SessionState {
    id: DocumentId,
    view: DetailState,
    generation: u64,
    disposed: bool,
    adding_tag: bool,
    last_error: Option<String>,
}

pub struct DocumentDetailSession {
    api: ApiClient,
    bus: InvalidationBus,
    suggestions: TagSuggestions<TagsBySearch>,
    state: Mutex<SessionState>,
}

impl DocumentDetailSession {
    pub fn new(
        api: ApiClient,
        bus: InvalidationBus,
        hub: PointerHub,
        pagination: &PaginationSettings,
        id: DocumentId,
    ) -> Self {
        Self {
            suggestions: TagSuggestions::new(
                TagsBySearch::new(api.clone()),
                pagination.suggestion_limit,
                hub,
                Nowhere,
                Nowhere,
            ),
            api,
            bus,
            state: Mutex::new(SessionState {
                id,
                view: DetailState::Loading,
                generation: 0,
                disposed: false,
                adding_tag: false,
                last_error: None,
            }),
        }
    }

    pub fn id(&self) -> DocumentId {
        self.state.lock().id
    }

    pub fn state(&self) -> DetailState {
        self.state.lock().view.clone()
    }

    pub fn document(&self) -> Option<Document> {
        match &self.state.lock().view {
            DetailState::Ready(doc) => Some(doc.clone()),
            _ => None,
        }
    }

    /// Most recent mutation failure; the loaded snapshot stays visible.
    pub fn last_error(&self) -> Option<String> {
        self.state.lock().last_error.clone()
    }

    pub fn is_adding_tag(&self) -> bool {
        self.state.lock().adding_tag
    }

    pub fn suggestions(&self) -> &TagSuggestions<TagsBySearch> {
        &self.suggestions
    }

    /// Bounds of the tag input and its suggestion list.
    pub fn set_tag_input_regions(&self, input: impl Region + 'static, list: impl Region + 'static) {
        self.suggestions.panel().set_regions(input, list);
    }

    /// Load the current document.
    pub async fn mount(&self) -> LoadOutcome {
        let id = self.id();
        self.open(id).await
    }

    /// Switch to `id` (or reload it) and fetch it.
    pub async fn open(&self, id: DocumentId) -> LoadOutcome {
        let generation = {
            let mut state = self.state.lock();
            if state.disposed {
                return LoadOutcome::Skipped;
            }
            state.generation += 1;
            state.id = id;
            state.view = DetailState::Loading;
            state.last_error = None;
            state.generation
        };
        self.suggestions.clear();

        let result = self.api.get_document(id).await;

        let mut state = self.state.lock();
        if state.disposed || state.generation != generation {
            tracing::debug!(document_id = id, "Discarding stale document load");
            return LoadOutcome::Stale;
        }

        match result {
            Ok(doc) => {
                state.view = DetailState::Ready(doc);
                LoadOutcome::Applied
            }
            Err(e) if e.is_not_found() => {
                tracing::info!(document_id = id, "Document not found");
                state.view = DetailState::NotFound;
                LoadOutcome::Applied
            }
            Err(e) => {
                let message = e.user_message();
                tracing::warn!(document_id = id, error = %message, "Failed to load document");
                state.view = DetailState::Error(message.clone());
                LoadOutcome::Failed(message)
            }
        }
    }

    pub async fn reload(&self) -> LoadOutcome {
        let id = self.id();
        self.open(id).await
    }

    /// Delete after confirmation, then leave the page.
    pub async fn delete(&self, confirm: &dyn Confirm, navigator: &dyn Navigator) -> DeleteOutcome {
        let Some(id) = self.ready_id() else {
            return DeleteOutcome::NotReady;
        };

        if !confirm.confirm(DELETE_DOCUMENT_PROMPT).await {
            return DeleteOutcome::Cancelled;
        }

        match self.api.delete_document(id).await {
            Ok(()) => {
                self.dispose();
                navigator.navigate(Route::Home);
                DeleteOutcome::Deleted
            }
            Err(e) => {
                let message = e.user_message();
                tracing::warn!(document_id = id, error = %message, "Failed to delete document");
                self.state.lock().last_error = Some(message.clone());
                DeleteOutcome::Failed(message)
            }
        }
    }

    /// Tag input changed; recompute suggestions against the attached tags.
    pub async fn set_tag_input(&self, text: &str) -> LoadOutcome {
        let attached = self.document().map(|doc| doc.tags).unwrap_or_default();
        self.suggestions.suggest(text, &attached).await
    }

    pub fn tag_input(&self) -> String {
        self.suggestions.query()
    }

    pub fn select_suggestion(&self, tag: &Tag) -> String {
        self.suggestions.select(tag)
    }

    pub fn focus_tag_input(&self) -> bool {
        self.suggestions.focus()
    }

    /// Add whatever is in the tag input.
    pub async fn submit_tag_input(&self) -> TagChange {
        let text = self.suggestions.query();
        self.add_tag(&text).await
    }

    /// Attach `name` (trimmed) and append the stored tag to the snapshot.
    /// `TagCreated` is published whenever the backend stored the tag, even if
    /// the session has since switched documents.
    pub async fn add_tag(&self, name: &str) -> TagChange {
        let request = AddTagRequest::new(name);
        if let Err(errors) = request.validate() {
            let message = ClientError::from(errors).user_message();
            return TagChange::Rejected(message);
        }

        let (id, generation) = {
            let mut state = self.state.lock();
            if state.disposed || state.adding_tag || !matches!(state.view, DetailState::Ready(_)) {
                return TagChange::NotReady;
            }
            state.adding_tag = true;
            (state.id, state.generation)
        };
        self.suggestions.panel().close();

        let result = self.api.add_tag(id, &request.name).await;

        let (tag, current) = {
            let mut state = self.state.lock();
            state.adding_tag = false;
            let current = !state.disposed && state.generation == generation;
            match result {
                Ok(tag) => {
                    if current {
                        if let DetailState::Ready(doc) = &mut state.view {
                            if !doc.has_tag(tag.id) {
                                doc.tags.push(tag.clone());
                            }
                        }
                        state.last_error = None;
                    }
                    (tag, current)
                }
                Err(e) => {
                    let message = e.user_message();
                    tracing::warn!(document_id = id, tag = %request.name, error = %message, "Failed to add tag");
                    if current {
                        state.last_error = Some(message.clone());
                    }
                    return TagChange::Failed(message);
                }
            }
        };

        if current {
            self.suggestions.clear();
        } else {
            tracing::debug!(document_id = id, tag_id = tag.id, "Tag added after session moved on");
        }
        // The tag exists on the backend either way.
        self.bus.publish(Signal::TagCreated);
        TagChange::Added(tag)
    }

    /// Detach `tag_id` and filter it out of the snapshot.
    pub async fn remove_tag(&self, tag_id: TagId) -> TagChange {
        let Some(id) = self.ready_id() else {
            return TagChange::NotReady;
        };
        let generation = self.state.lock().generation;

        let result = self.api.remove_tag(id, tag_id).await;

        let mut state = self.state.lock();
        if state.disposed || state.generation != generation {
            return TagChange::NotReady;
        }
        match result {
            Ok(()) => {
                if let DetailState::Ready(doc) = &mut state.view {
                    doc.tags.retain(|t| t.id != tag_id);
                }
                state.last_error = None;
                TagChange::Removed(tag_id)
            }
            Err(e) => {
                let message = e.user_message();
                tracing::warn!(document_id = id, tag_id, error = %message, "Failed to remove tag");
                state.last_error = Some(message.clone());
                TagChange::Failed(message)
            }
        }
    }

    /// Stop applying late results.
    pub fn dispose(&self) {
        self.state.lock().disposed = true;
        self.suggestions.dispose();
    }

    fn ready_id(&self) -> Option<DocumentId> {
        let state = self.state.lock();
        match (&state.view, state.disposed) {
            (DetailState::Ready(_), false) => Some(state.id),
            _ => None,
        }
    }
}
