//! Typed gateway over the document-processing backend's REST interface.
//!
//! One method per endpoint. Any transport failure or non-2xx status becomes
//! [`ClientError::Request`]; nothing is retried.

use crate::config::ApiSettings;
use crate::error::ClientError;
use crate::models::{
    AddTagRequest, CreatedDocument, Document, DocumentId, ListBody, Page, PageRequest, SearchHit,
    Tag, TagDeleted, TagId, UploadFile,
};
use crate::services::metrics;
use client_core::observability::{TracedClientExt, TracedRequest};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::{Duration, Instant};

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

#[derive(Serialize)]
struct DocumentListQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    tag: Option<&'a str>,
    skip: u64,
    limit: u64,
}

#[derive(Serialize)]
struct TagListQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<&'a str>,
    skip: u64,
    limit: u64,
}

impl ApiClient {
    pub fn new(settings: &ApiSettings) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to build HTTP client");
                ClientError::request(format!("HTTP client setup failed: {}", e), None)
            })?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `POST /documents` (multipart). Callers validate the file first.
    pub async fn create_document(&self, file: &UploadFile) -> Result<CreatedDocument, ClientError> {
        let part = reqwest::multipart::Part::bytes(file.bytes.clone())
            .file_name(file.filename.clone())
            .mime_str(&file.content_type)
            .map_err(|_| {
                ClientError::validation(format!("Invalid content type: {}", file.content_type))
            })?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let request = self.client.traced_post(&self.url("/documents")).multipart(form);
        let created: CreatedDocument = self.fetch_json("create_document", request).await?;

        tracing::info!(
            document_id = created.id,
            filename = %created.filename,
            size = file.size(),
            "Document uploaded"
        );
        Ok(created)
    }

    /// `GET /documents?tag=&skip=&limit=`
    pub async fn list_documents(
        &self,
        tag: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<Document>, ClientError> {
        let request = self
            .client
            .traced_get(&self.url("/documents"))
            .query(&DocumentListQuery {
                tag,
                skip: page.skip,
                limit: page.limit,
            });
        let body: ListBody<Document> = self.fetch_json("list_documents", request).await?;
        Ok(body.into_page(page))
    }

    /// `GET /documents/{id}`, tags included.
    pub async fn get_document(&self, id: DocumentId) -> Result<Document, ClientError> {
        let request = self.client.traced_get(&self.url(&format!("/documents/{}", id)));
        self.fetch_json("get_document", request).await
    }

    /// `DELETE /documents/{id}`
    pub async fn delete_document(&self, id: DocumentId) -> Result<(), ClientError> {
        let request = self
            .client
            .traced_delete(&self.url(&format!("/documents/{}", id)));
        self.execute("delete_document", request).await?;

        tracing::info!(document_id = id, "Document deleted");
        Ok(())
    }

    /// `GET /search?q=` in server order.
    pub async fn search(&self, query: &str) -> Result<Vec<SearchHit>, ClientError> {
        let request = self
            .client
            .traced_get(&self.url("/search"))
            .query(&[("q", query)]);
        self.fetch_json("search", request).await
    }

    /// `POST /documents/{id}/tags`. Returns the tag as stored, which may be an
    /// existing tag and may differ in case from `name`.
    pub async fn add_tag(&self, document_id: DocumentId, name: &str) -> Result<Tag, ClientError> {
        let request = self
            .client
            .traced_post(&self.url(&format!("/documents/{}/tags", document_id)))
            .json(&AddTagRequest {
                name: name.to_string(),
            });
        let tag: Tag = self.fetch_json("add_tag", request).await?;

        tracing::info!(document_id, tag_id = tag.id, tag = %tag.name, "Tag added to document");
        Ok(tag)
    }

    /// `DELETE /documents/{id}/tags/{tagId}`
    pub async fn remove_tag(&self, document_id: DocumentId, tag_id: TagId) -> Result<(), ClientError> {
        let request = self.client.traced_delete(
            &self.url(&format!("/documents/{}/tags/{}", document_id, tag_id)),
        );
        self.execute("remove_tag", request).await?;

        tracing::info!(document_id, tag_id, "Tag removed from document");
        Ok(())
    }

    /// `GET /documents/{id}/tags`
    pub async fn document_tags(&self, document_id: DocumentId) -> Result<Vec<Tag>, ClientError> {
        let request = self
            .client
            .traced_get(&self.url(&format!("/documents/{}/tags", document_id)));
        self.fetch_json("document_tags", request).await
    }

    /// `GET /tags?search=&skip=&limit=`. Substring match is case-insensitive
    /// and happens server-side.
    pub async fn list_tags(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<Tag>, ClientError> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        let request = self
            .client
            .traced_get(&self.url("/tags"))
            .query(&TagListQuery {
                search,
                skip: page.skip,
                limit: page.limit,
            });
        let body: ListBody<Tag> = self.fetch_json("list_tags", request).await?;
        Ok(body.into_page(page))
    }

    /// `DELETE /tags/{id}`; the backend detaches it from every document.
    pub async fn delete_tag(&self, tag_id: TagId) -> Result<TagDeleted, ClientError> {
        let request = self.client.traced_delete(&self.url(&format!("/tags/{}", tag_id)));
        let response = self.execute("delete_tag", request).await?;

        // Older backends answer with an empty body.
        let body = read_body("delete_tag", response).await?;
        let deleted = if body.trim().is_empty() {
            TagDeleted::default()
        } else {
            decode("delete_tag", &body)?
        };

        tracing::info!(tag_id, "Tag deleted");
        Ok(deleted)
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        request: TracedRequest,
    ) -> Result<T, ClientError> {
        let response = self.execute(endpoint, request).await?;
        let body = read_body(endpoint, response).await?;
        decode(endpoint, &body)
    }

    async fn execute(
        &self,
        endpoint: &'static str,
        request: TracedRequest,
    ) -> Result<reqwest::Response, ClientError> {
        let request_id = request.request_id().to_string();
        let started = Instant::now();

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                metrics::record_request(endpoint, "transport_error", started.elapsed());
                tracing::error!(endpoint, request_id = %request_id, error = %e, "HTTP request failed");
                return Err(ClientError::request(format!("Request failed: {}", e), None));
            }
        };

        let status = response.status();
        if status.is_success() {
            metrics::record_request(endpoint, "ok", started.elapsed());
            tracing::debug!(endpoint, request_id = %request_id, status = %status, "HTTP request succeeded");
            return Ok(response);
        }

        metrics::record_request(endpoint, "http_error", started.elapsed());
        let body = response.text().await.unwrap_or_default();
        let message = error_message(status, &body);
        tracing::warn!(
            endpoint,
            request_id = %request_id,
            status = status.as_u16(),
            message = %message,
            "Backend returned an error"
        );
        Err(ClientError::request(message, Some(status.as_u16())))
    }
}

/// Prefer the body's `detail`/`message`/`error` string; otherwise derive from
/// the status line.
fn error_message(status: StatusCode, body: &str) -> String {
    let from_body = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["detail", "message", "error"]
                .iter()
                .find_map(|key| value.get(*key).and_then(|v| v.as_str()).map(str::to_string))
        })
        .filter(|m| !m.is_empty());

    from_body.unwrap_or_else(|| {
        format!(
            "Request failed: {}",
            status.canonical_reason().unwrap_or(status.as_str())
        )
    })
}

async fn read_body(endpoint: &'static str, response: reqwest::Response) -> Result<String, ClientError> {
    response.text().await.map_err(|e| {
        tracing::error!(endpoint, error = %e, "Failed to read response body");
        ClientError::request(format!("Request failed: {}", e), None)
    })
}

fn decode<T: DeserializeOwned>(endpoint: &'static str, body: &str) -> Result<T, ClientError> {
    serde_json::from_str(body).map_err(|e| {
        metrics::record_request(endpoint, "decode_error", Duration::ZERO);
        tracing::error!(endpoint, error = %e, "Failed to decode response body");
        ClientError::Decode(e.to_string())
    })
}
