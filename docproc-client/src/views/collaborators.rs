//! Host-provided primitives the view-models call out to.

use crate::models::DocumentId;
use async_trait::async_trait;

/// Modal yes/no prompt.
#[async_trait]
pub trait Confirm: Send + Sync {
    async fn confirm(&self, prompt: &str) -> bool;
}

#[async_trait]
impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    async fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Document(DocumentId),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Document(id) => format!("/documents/{}", id),
        }
    }
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}
