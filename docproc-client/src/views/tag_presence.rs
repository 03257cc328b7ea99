//! Derived "does any tag exist" flag that gates the tag manager.

use crate::models::PageRequest;
use crate::services::ApiClient;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Default)]
struct ProbeState {
    generation: u64,
    disposed: bool,
}

/// Recomputed from a fresh one-item tag fetch whenever asked; never set
/// directly.
#[derive(Clone)]
pub struct TagPresence {
    api: ApiClient,
    state: Arc<Mutex<ProbeState>>,
    flag: Arc<watch::Sender<bool>>,
}

impl TagPresence {
    pub fn new(api: ApiClient) -> Self {
        let (flag, _) = watch::channel(false);
        Self {
            api,
            state: Arc::new(Mutex::new(ProbeState::default())),
            flag: Arc::new(flag),
        }
    }

    pub fn has_tags(&self) -> bool {
        *self.flag.borrow()
    }

    pub fn watch(&self) -> watch::Receiver<bool> {
        self.flag.subscribe()
    }

    /// Refetch and publish the flag. A failed probe counts as "no tags".
    pub async fn recompute(&self) -> bool {
        let generation = {
            let mut state = self.state.lock();
            if state.disposed {
                return self.has_tags();
            }
            state.generation += 1;
            state.generation
        };

        let present = match self.api.list_tags(None, PageRequest::first(1)).await {
            Ok(page) => !page.items.is_empty(),
            Err(e) => {
                tracing::warn!(error = %e, "Tag presence check failed");
                false
            }
        };

        let state = self.state.lock();
        if state.disposed || state.generation != generation {
            return self.has_tags();
        }
        self.flag.send_replace(present);
        tracing::debug!(has_tags = present, "Tag presence recomputed");
        present
    }

    pub fn dispose(&self) {
        self.state.lock().disposed = true;
    }
}
