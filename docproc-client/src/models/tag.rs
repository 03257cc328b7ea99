use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub type TagId = i64;

/// A tag shared across documents. Names display as stored but compare
/// case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "crate::utils::timestamp::option::deserialize"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl Tag {
    pub fn new(id: TagId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            created_at: None,
        }
    }

    pub fn matches_name(&self, name: &str) -> bool {
        names_match(&self.name, name)
    }
}

/// Case-insensitive tag name comparison.
pub fn names_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Body of `POST /documents/{id}/tags`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct AddTagRequest {
    #[validate(length(min = 1, max = 100, message = "Tag name must be between 1 and 100 characters"))]
    pub name: String,
}

impl AddTagRequest {
    /// Trims the raw input; validation happens separately.
    pub fn new(raw: &str) -> Self {
        Self {
            name: raw.trim().to_string(),
        }
    }
}

/// Result of `DELETE /tags/{id}`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
pub struct TagDeleted {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub removed_from_documents: u64,
}
