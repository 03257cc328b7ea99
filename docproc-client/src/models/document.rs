use crate::models::tag::{Tag, TagId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type DocumentId = i64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub filename: String,
    /// Extraction lifecycle as reported by the backend; display only.
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(deserialize_with = "crate::utils::timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
    /// Only present on the single-document endpoint.
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

fn default_status() -> String {
    "unknown".to_string()
}

impl Document {
    pub fn has_tag(&self, tag_id: TagId) -> bool {
        self.tags.iter().any(|t| t.id == tag_id)
    }

    pub fn tag_names(&self) -> Vec<String> {
        self.tags.iter().map(|t| t.name.clone()).collect()
    }
}

/// Body returned by `POST /documents`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatedDocument {
    pub id: DocumentId,
    pub filename: String,
}

/// One entry of `GET /search`, in server order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchHit {
    pub id: DocumentId,
    pub filename: String,
    #[serde(default)]
    pub snippet: String,
}
