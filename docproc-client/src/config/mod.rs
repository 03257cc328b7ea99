use client_core::config::{self as core_config, LoggingSettings};
use client_core::error::CoreError;
use serde::Deserialize;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub api: ApiSettings,
    #[serde(default)]
    pub pagination: PaginationSettings,
    #[serde(default)]
    pub upload: UploadSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ApiSettings {
    /// Backend root, without trailing slash (e.g., http://localhost:8000).
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl ApiSettings {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Page sizes are fixed per list for the whole session.
#[derive(Deserialize, Clone, Debug)]
pub struct PaginationSettings {
    #[serde(default = "default_page_size")]
    pub documents_page_size: u64,
    #[serde(default = "default_page_size")]
    pub tags_page_size: u64,
    /// Upper bound on tag suggestions fetched per keystroke.
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: u64,
    /// How many tags the document list loads as filter options.
    #[serde(default = "default_filter_options_limit")]
    pub filter_options_limit: u64,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            documents_page_size: default_page_size(),
            tags_page_size: default_page_size(),
            suggestion_limit: default_suggestion_limit(),
            filter_options_limit: default_filter_options_limit(),
        }
    }
}

fn default_page_size() -> u64 {
    5
}

fn default_suggestion_limit() -> u64 {
    50
}

fn default_filter_options_limit() -> u64 {
    1000
}

#[derive(Deserialize, Clone, Debug)]
pub struct UploadSettings {
    #[serde(default = "default_max_file_size_bytes")]
    pub max_file_size_bytes: u64,
    #[serde(default = "default_allowed_mime_types")]
    pub allowed_mime_types: Vec<String>,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_file_size_bytes: default_max_file_size_bytes(),
            allowed_mime_types: default_allowed_mime_types(),
        }
    }
}

fn default_max_file_size_bytes() -> u64 {
    10 * 1024 * 1024
}

fn default_allowed_mime_types() -> Vec<String> {
    vec!["application/pdf".to_string()]
}

pub fn get_configuration() -> Result<Settings, CoreError> {
    let base_path = std::env::current_dir()?;

    let configuration_directory = core_config::configuration_directory(&base_path, "docproc-client");

    core_config::load(&configuration_directory)
}
