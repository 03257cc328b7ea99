//! Home-page document list with its tag filter bar.

use crate::config::PaginationSettings;
use crate::models::{Document, PageRequest, Tag};
use crate::services::ApiClient;
use crate::sync::{
    DocumentsByTag, LoadOutcome, PaginatedQuery, QuerySnapshot, Refreshable, TagsBySearch,
};
use async_trait::async_trait;

pub struct DocumentList {
    documents: PaginatedQuery<DocumentsByTag>,
    filter_options: PaginatedQuery<TagsBySearch>,
}

impl DocumentList {
    pub fn new(api: ApiClient, pagination: &PaginationSettings) -> Self {
        Self {
            documents: PaginatedQuery::new(
                "documents",
                DocumentsByTag::new(api.clone()),
                pagination.documents_page_size,
            ),
            filter_options: PaginatedQuery::new(
                "filter_options",
                TagsBySearch::new(api),
                pagination.filter_options_limit,
            ),
        }
    }

    /// Initial load of the first page and the filter bar.
    pub async fn mount(&self) -> (LoadOutcome, LoadOutcome) {
        tokio::join!(self.documents.load(), self.refresh_filter_options())
    }

    pub fn snapshot(&self) -> QuerySnapshot<Document> {
        self.documents.snapshot()
    }

    pub fn documents(&self) -> &PaginatedQuery<DocumentsByTag> {
        &self.documents
    }

    pub fn selected_tag(&self) -> Option<String> {
        self.documents.filter()
    }

    pub fn pending_request(&self) -> PageRequest {
        self.documents.pending_request()
    }

    /// Tags offered in the filter bar. Empty hides the bar.
    pub fn available_tags(&self) -> Vec<Tag> {
        self.filter_options.items()
    }

    pub async fn set_filter(&self, tag: Option<String>) -> LoadOutcome {
        self.documents.set_filter(tag).await
    }

    /// Clicking the active tag clears the filter; any other selects it.
    pub async fn toggle_tag(&self, name: Option<&str>) -> LoadOutcome {
        let next = match (self.documents.filter(), name) {
            (Some(active), Some(clicked)) if active == clicked => None,
            (_, clicked) => clicked.map(str::to_string),
        };
        self.documents.set_filter(next).await
    }

    pub async fn next_page(&self) -> LoadOutcome {
        self.documents.next_page().await
    }

    pub async fn prev_page(&self) -> LoadOutcome {
        self.documents.prev_page().await
    }

    pub async fn reload_documents(&self) -> LoadOutcome {
        self.documents.reload().await
    }

    /// Refetch the filter bar, then drop the active filter if its tag is gone.
    pub async fn refresh_filter_options(&self) -> LoadOutcome {
        let outcome = self.filter_options.reload().await;
        if outcome.is_applied() {
            let names: Vec<String> = self
                .filter_options
                .items()
                .into_iter()
                .map(|tag| tag.name)
                .collect();
            self.documents.ensure_filter_in(&names).await;
        }
        outcome
    }

    pub fn empty_message(&self) -> String {
        match self.documents.filter() {
            Some(tag) => format!("No documents found with tag \"{}\"", tag),
            None => "No documents uploaded yet. Upload a PDF to get started.".to_string(),
        }
    }

    pub fn dispose(&self) {
        self.documents.dispose();
        self.filter_options.dispose();
    }
}

#[async_trait]
impl Refreshable for DocumentList {
    async fn refresh(&self) {
        self.reload_documents().await;
    }

    async fn refresh_tags(&self) {
        self.refresh_filter_options().await;
    }
}
