use crate::config::Settings;
use crate::error::ClientError;
use crate::models::{DocumentId, TagId};
use crate::services::ApiClient;
use crate::sync::{
    InvalidationBus, Nowhere, PointerHub, RefreshHandle, Refreshable, Signal, Subscription,
};
use crate::views::{
    Confirm, DeleteTagOutcome, DocumentDetailSession, DocumentList, SearchBar, TagManager,
    TagPresence, UploadForm,
};
use parking_lot::Mutex;
use std::sync::Arc;

/// Home screen: every view-model plus the wiring between them.
///
/// - The upload form reloads the list through a [`RefreshHandle`].
/// - A tag added anywhere reloads the [`TagManager`] and recomputes
///   [`TagPresence`] via the bus.
/// - Deleting a tag refreshes the filter bar, the list, and presence.
pub struct Workspace {
    settings: Settings,
    api: ApiClient,
    bus: InvalidationBus,
    hub: PointerHub,
    list: Arc<DocumentList>,
    list_handle: RefreshHandle,
    upload: UploadForm,
    search: SearchBar,
    tag_manager: Arc<TagManager>,
    presence: TagPresence,
    tag_subscription: Mutex<Option<Subscription>>,
}

impl Workspace {
    pub fn build(
        settings: Settings,
        bus: InvalidationBus,
        hub: PointerHub,
    ) -> Result<Self, ClientError> {
        let api = ApiClient::new(&settings.api)?;
        let list_handle = RefreshHandle::new();

        Ok(Self {
            list: Arc::new(DocumentList::new(api.clone(), &settings.pagination)),
            upload: UploadForm::new(api.clone(), settings.upload.clone(), list_handle.clone()),
            search: SearchBar::new(api.clone(), hub.clone(), Nowhere),
            tag_manager: Arc::new(TagManager::new(api.clone(), settings.pagination.tags_page_size)),
            presence: TagPresence::new(api.clone()),
            list_handle,
            tag_subscription: Mutex::new(None),
            settings,
            api,
            bus,
            hub,
        })
    }

    /// Wire subscriptions and run the initial loads.
    pub async fn mount(&self) {
        let list: Arc<dyn Refreshable> = self.list.clone();
        self.list_handle.attach(list);

        let presence = self.presence.clone();
        let tag_manager = Arc::clone(&self.tag_manager);
        let subscription = self.bus.subscribe(Signal::TagCreated, move || {
            let presence = presence.clone();
            let tag_manager = Arc::clone(&tag_manager);
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    handle.spawn(async move {
                        // Reload before presence flips, so the manager shows up populated.
                        tag_manager.reload().await;
                        presence.recompute().await;
                    });
                }
                Err(_) => tracing::warn!("TagCreated received outside a runtime; tags not reloaded"),
            }
        });
        *self.tag_subscription.lock() = Some(subscription);

        tokio::join!(
            self.list.mount(),
            self.tag_manager.mount(),
            self.presence.recompute()
        );
        tracing::info!(base_url = %self.api.base_url(), "Workspace mounted");
    }

    pub fn list(&self) -> &DocumentList {
        &self.list
    }

    pub fn list_handle(&self) -> &RefreshHandle {
        &self.list_handle
    }

    pub fn upload_form(&self) -> &UploadForm {
        &self.upload
    }

    pub fn search_bar(&self) -> &SearchBar {
        &self.search
    }

    pub fn tag_manager(&self) -> &TagManager {
        &self.tag_manager
    }

    pub fn presence(&self) -> &TagPresence {
        &self.presence
    }

    /// The tag manager is only shown once some tag exists.
    pub fn shows_tag_manager(&self) -> bool {
        self.presence.has_tags()
    }

    /// Detail session for one document, sharing this workspace's bus.
    pub fn open_document(&self, id: DocumentId) -> DocumentDetailSession {
        DocumentDetailSession::new(
            self.api.clone(),
            self.bus.clone(),
            self.hub.clone(),
            &self.settings.pagination,
            id,
        )
    }

    /// Delete a tag from the manager and bring the other views back in line.
    pub async fn delete_tag(&self, id: TagId, name: &str, confirm: &dyn Confirm) -> DeleteTagOutcome {
        let outcome = self.tag_manager.delete_tag(id, name, confirm).await;
        if let DeleteTagOutcome::Deleted(_) = &outcome {
            // Filter options first, so a deleted active filter resets before the list reloads.
            self.list_handle.refresh_tags().await;
            self.list_handle.refresh().await;
            self.presence.recompute().await;
        }
        outcome
    }

    pub fn unmount(&self) {
        self.tag_subscription.lock().take();
        let list: Arc<dyn Refreshable> = self.list.clone();
        self.list_handle.detach(&list);
        self.list.dispose();
        self.search.dispose();
        self.tag_manager.dispose();
        self.presence.dispose();
        tracing::info!("Workspace unmounted");
    }
}
