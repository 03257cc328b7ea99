//! Backend queries that feed the paginated controllers.

use crate::error::ClientError;
use crate::models::{Document, Page, PageRequest, Tag};
use crate::services::ApiClient;
use crate::sync::paginated::PageSource;
use async_trait::async_trait;

/// `GET /documents`, filtered by exact tag name.
#[derive(Clone)]
pub struct DocumentsByTag {
    api: ApiClient,
}

impl DocumentsByTag {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl PageSource for DocumentsByTag {
    type Item = Document;

    async fn fetch_page(
        &self,
        filter: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<Document>, ClientError> {
        self.api.list_documents(filter, page).await
    }
}

/// `GET /tags`, filtered by case-insensitive name substring.
#[derive(Clone)]
pub struct TagsBySearch {
    api: ApiClient,
}

impl TagsBySearch {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl PageSource for TagsBySearch {
    type Item = Tag;

    async fn fetch_page(
        &self,
        filter: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<Tag>, ClientError> {
        self.api.list_tags(filter, page).await
    }
}
