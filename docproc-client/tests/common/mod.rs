#![allow(dead_code)]

use docproc_client::config::{
    ApiSettings, PaginationSettings, Settings, UploadSettings,
};
use docproc_client::services::ApiClient;
use docproc_client::startup::Workspace;
use docproc_client::sync::{InvalidationBus, PointerHub};
use docproc_client::views::{Navigator, Route};
use client_core::config::LoggingSettings;
use serde_json::{json, Value};
use std::sync::Mutex;
use wiremock::{Match, MockServer, Request};

pub struct TestBackend {
    pub server: MockServer,
    pub bus: InvalidationBus,
    pub hub: PointerHub,
}

impl TestBackend {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
            bus: InvalidationBus::new(),
            hub: PointerHub::new(),
        }
    }

    pub fn settings(&self) -> Settings {
        Settings {
            api: ApiSettings::new(self.server.uri()),
            pagination: PaginationSettings::default(),
            upload: UploadSettings::default(),
            logging: LoggingSettings::default(),
        }
    }

    pub fn api(&self) -> ApiClient {
        ApiClient::new(&self.settings().api).expect("Failed to build API client")
    }

    pub fn workspace(&self) -> Workspace {
        Workspace::build(self.settings(), self.bus.clone(), self.hub.clone())
            .expect("Failed to build workspace")
    }
}

/// Matches requests that do not carry query parameter `.0`.
pub struct QueryParamAbsent(pub &'static str);

impl Match for QueryParamAbsent {
    fn matches(&self, request: &Request) -> bool {
        !request.url.query_pairs().any(|(key, _)| key == self.0)
    }
}

pub fn tag_json(id: i64, name: &str) -> Value {
    json!({ "id": id, "name": name, "created_at": "2024-03-01T10:00:00" })
}

pub fn document_json(id: i64, filename: &str, tags: Vec<Value>) -> Value {
    json!({
        "id": id,
        "filename": filename,
        "status": "completed",
        "page_count": 3,
        "file_size": 24576,
        "created_at": "2024-03-01T10:00:00.123456",
        "content": "Invoice total: 42.00",
        "tags": tags,
    })
}

pub fn documents(ids: std::ops::Range<i64>) -> Vec<Value> {
    ids.map(|id| document_json(id, &format!("doc-{}.pdf", id), vec![]))
        .collect()
}

pub fn envelope(items: Vec<Value>, skip: u64, limit: u64, total: u64) -> Value {
    json!({
        "items": items,
        "skip": skip,
        "limit": limit,
        "total": total,
        "has_next": skip + limit < total,
        "has_prev": skip > 0,
    })
}

/// Records navigation instead of changing pages.
#[derive(Default)]
pub struct RecordingNavigator {
    pub routes: Mutex<Vec<Route>>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}
