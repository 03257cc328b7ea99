//! Parent-held capability for reloading a child list without knowing its state.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

#[async_trait]
pub trait Refreshable: Send + Sync {
    async fn refresh(&self);
    async fn refresh_tags(&self);
}

/// Stable handle a sibling can call after a mutation.
///
/// Calls always go to whatever implementation is attached at call time;
/// with nothing attached they do nothing.
#[derive(Clone, Default)]
pub struct RefreshHandle {
    target: Arc<RwLock<Option<Arc<dyn Refreshable>>>>,
}

impl RefreshHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current target.
    pub fn attach(&self, target: Arc<dyn Refreshable>) {
        *self.target.write() = Some(target);
    }

    /// Detach only if `target` is still the attached one, so a late unmount
    /// cannot unhook its replacement.
    pub fn detach(&self, target: &Arc<dyn Refreshable>) -> bool {
        let mut current = self.target.write();
        let same = current
            .as_ref()
            .map(|attached| same_target(attached, target))
            .unwrap_or(false);
        if same {
            *current = None;
        }
        same
    }

    pub fn is_attached(&self) -> bool {
        self.target.read().is_some()
    }

    pub async fn refresh(&self) {
        match self.current() {
            Some(target) => target.refresh().await,
            None => tracing::debug!("refresh requested with no list attached"),
        }
    }

    pub async fn refresh_tags(&self) {
        match self.current() {
            Some(target) => target.refresh_tags().await,
            None => tracing::debug!("refresh_tags requested with no list attached"),
        }
    }

    fn current(&self) -> Option<Arc<dyn Refreshable>> {
        self.target.read().clone()
    }
}

fn same_target(a: &Arc<dyn Refreshable>, b: &Arc<dyn Refreshable>) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}
