use crate::config::UploadSettings;
use crate::error::ClientError;

/// A file picked for upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(filename: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Client-side checks that must pass before anything is sent.
    pub fn validate(&self, limits: &UploadSettings) -> Result<(), ClientError> {
        if !limits
            .allowed_mime_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&self.content_type))
        {
            return Err(ClientError::validation("Please select a PDF file"));
        }

        if self.size() > limits.max_file_size_bytes {
            return Err(ClientError::validation(format!(
                "File too large. Maximum size is {:.1}MB",
                limits.max_file_size_bytes as f64 / (1024.0 * 1024.0)
            )));
        }

        if self.bytes.is_empty() {
            return Err(ClientError::validation("File is empty"));
        }

        Ok(())
    }
}
