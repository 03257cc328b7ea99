//! Tag vocabulary panel: searchable, paginated, with delete.

use crate::models::{Tag, TagDeleted, TagId};
use crate::services::ApiClient;
use crate::sync::{LoadOutcome, PaginatedQuery, QuerySnapshot, TagsBySearch};
use crate::views::collaborators::Confirm;
use parking_lot::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTagOutcome {
    Cancelled,
    Deleted(TagDeleted),
    Failed(String),
}

pub struct TagManager {
    api: ApiClient,
    tags: PaginatedQuery<TagsBySearch>,
    deleting: Mutex<Option<TagId>>,
    error: Mutex<Option<String>>,
}

pub fn delete_prompt(name: &str) -> String {
    format!(
        "Are you sure you want to delete the tag \"{}\"? This will remove it from all documents.",
        name
    )
}

impl TagManager {
    pub fn new(api: ApiClient, page_size: u64) -> Self {
        Self {
            tags: PaginatedQuery::new("tag_manager", TagsBySearch::new(api.clone()), page_size),
            api,
            deleting: Mutex::new(None),
            error: Mutex::new(None),
        }
    }

    pub async fn mount(&self) -> LoadOutcome {
        self.tags.load().await
    }

    pub fn snapshot(&self) -> QuerySnapshot<Tag> {
        self.tags.snapshot()
    }

    pub fn tags(&self) -> &PaginatedQuery<TagsBySearch> {
        &self.tags
    }

    pub async fn search(&self, text: &str) -> LoadOutcome {
        self.tags.set_filter(Some(text.trim().to_string())).await
    }

    pub async fn next_page(&self) -> LoadOutcome {
        self.tags.next_page().await
    }

    pub async fn prev_page(&self) -> LoadOutcome {
        self.tags.prev_page().await
    }

    pub async fn reload(&self) -> LoadOutcome {
        self.tags.reload().await
    }

    /// Tag whose delete is in flight, if any.
    pub fn deleting(&self) -> Option<TagId> {
        *self.deleting.lock()
    }

    /// Last delete failure, shown next to the list.
    pub fn error(&self) -> Option<String> {
        self.error.lock().clone()
    }

    /// Delete `id` everywhere after confirmation and drop it from this page.
    pub async fn delete_tag(&self, id: TagId, name: &str, confirm: &dyn Confirm) -> DeleteTagOutcome {
        if !confirm.confirm(&delete_prompt(name)).await {
            return DeleteTagOutcome::Cancelled;
        }

        *self.deleting.lock() = Some(id);
        let result = self.api.delete_tag(id).await;
        *self.deleting.lock() = None;

        match result {
            Ok(deleted) => {
                self.tags.remove_where(|tag| tag.id == id);
                *self.error.lock() = None;
                tracing::info!(
                    tag_id = id,
                    tag = %name,
                    removed_from_documents = deleted.removed_from_documents,
                    "Tag removed from vocabulary"
                );
                DeleteTagOutcome::Deleted(deleted)
            }
            Err(e) => {
                let message = e.user_message();
                tracing::warn!(tag_id = id, error = %message, "Failed to delete tag");
                *self.error.lock() = Some(message.clone());
                DeleteTagOutcome::Failed(message)
            }
        }
    }

    pub fn dispose(&self) {
        self.tags.dispose();
    }
}
