//! # Design
//!
//! - One error type for every backend call and service operation.
//! - Status failures keep the backend's `{message, code, type}` triple.
//! - Not-found and access-denied are distinct so callers can branch on them.

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use wallzee_api_models::ErrorBody;
use wallzee_core::{CoreError, ValidationError};

/// Result alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Backend and service error type.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("request failed")]
    Http {
        /// Operation identifier.
        operation: &'static str,
        /// Transport error.
        source: reqwest::Error,
    },
    /// The backend answered with a non-success status.
    #[error("{message}")]
    Status {
        /// HTTP status code.
        code: u16,
        /// Backend error type.
        kind: String,
        /// Backend message.
        message: String,
    },
    /// The addressed document or file does not exist.
    #[error("resource not found")]
    NotFound {
        /// Backend message.
        message: String,
    },
    /// The signed-in account lacks the admin label.
    #[error("Access Denied: This user is not authorized to access the admin panel.")]
    AccessDenied,
    /// A server key is required but not configured.
    #[error("a server API key is required for this operation")]
    MissingApiKey,
    /// The same wallpaper is already downloading.
    #[error("download already in progress")]
    DownloadInProgress {
        /// Wallpaper identifier.
        id: String,
    },
    /// A response body could not be decoded.
    #[error("failed to decode response")]
    Decode {
        /// Operation identifier.
        operation: &'static str,
        /// Decoder error.
        source: serde_json::Error,
    },
    /// Local filesystem access failed.
    #[error("filesystem operation failed")]
    Io {
        /// Operation identifier.
        operation: &'static str,
        /// Path involved.
        path: PathBuf,
        /// Source IO error.
        source: io::Error,
    },
    /// Client-side validation rejected the input.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Engine rule violation.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ClientError {
    /// Map a backend error body and status to an error.
    #[must_use]
    pub fn from_status(code: u16, body: Option<ErrorBody>) -> Self {
        let (kind, message) = body.map_or_else(
            || (String::new(), format!("request failed with status {code}")),
            |body| (body.kind, body.message),
        );
        if code == 404 {
            return Self::NotFound { message };
        }
        Self::Status {
            code,
            kind,
            message,
        }
    }

    /// Whether this is a not-found failure.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether the backend rejected the session.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { code: 401, .. })
    }

    /// Message suitable for user-facing feedback.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Http { source, .. } => format!("network error: {source}"),
            Self::NotFound { message } if !message.is_empty() => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_distinguishes_not_found() {
        let err = ClientError::from_status(
            404,
            Some(ErrorBody {
                message: "Document not found".into(),
                code: 404,
                kind: "document_not_found".into(),
            }),
        );
        assert!(err.is_not_found());
        assert_eq!(err.user_message(), "Document not found");

        let err = ClientError::from_status(401, None);
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "request failed with status 401");
    }

    #[test]
    fn access_denied_message() {
        assert_eq!(
            ClientError::AccessDenied.to_string(),
            "Access Denied: This user is not authorized to access the admin panel."
        );
        let err: ClientError = ValidationError::MissingTitle.into();
        assert_eq!(err.user_message(), "Please enter a title");
    }
}
