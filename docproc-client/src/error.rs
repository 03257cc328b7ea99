use thiserror::Error;

/// Failures surfaced by the gateway and the view-models built on it.
///
/// A stale response is never an error: it is dropped before it reaches
/// anything that could produce one of these.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// Transport failure or non-2xx response. `status` is absent when no
    /// response was received.
    #[error("{message}")]
    Request {
        message: String,
        status: Option<u16>,
    },

    /// Rejected before any request was sent.
    #[error("{0}")]
    Validation(String),

    /// A successful response whose body could not be parsed.
    #[error("Invalid response from server: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn request(message: impl Into<String>, status: Option<u16>) -> Self {
        ClientError::Request {
            message: message.into(),
            status,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::Validation(message.into())
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Request { status, .. } => *status,
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }

    /// Text suitable for an error display.
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| errors.to_string());
        ClientError::Validation(message)
    }
}
