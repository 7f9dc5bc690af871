//! Error types for user-session.

use thiserror::Error;

use crate::storage::StorageError;

/// Broad category of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The request was rejected as invalid.
    Validation,
    /// Missing, expired or rejected credentials.
    Auth,
    /// The requested resource does not exist.
    NotFound,
    /// The API could not be reached.
    Network,
    /// The API failed or broke its response contract.
    Server,
    /// Local persistence failed.
    Storage,
}

/// Main error type for user-session operations.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The API rejected the request (4xx other than auth and not-found).
    #[error("request rejected ({status}): {message}")]
    Validation { status: u16, message: String },

    /// The API refused the credentials or token (401/403).
    #[error("not authorized ({status}): {message}")]
    Auth { status: u16, message: String },

    /// The API returned 404.
    #[error("not found: {message}")]
    NotFound { message: String },

    /// The API returned a 5xx or otherwise unexpected status.
    #[error("server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Transport-level failure (connect, timeout, broken body).
    #[error("network error: {0}")]
    Network(String),

    /// A successful response lacked the fields the operation needs.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// The configured base URL cannot be used to build endpoints.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A user identifier was empty.
    #[error("invalid user id: '{0}'")]
    InvalidUserId(String),

    /// Persistent storage failure.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl SessionError {
    /// Build an error from a non-success HTTP status and its decoded body.
    ///
    /// The message comes from a `message` field when the API sends one.
    pub fn from_status(status: u16, body: &serde_json::Value) -> Self {
        let message = body
            .get("message")
            .and_then(|m| m.as_str())
            .or_else(|| body.as_str())
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP {}", status));

        match status {
            401 | 403 => Self::Auth { status, message },
            404 => Self::NotFound { message },
            400..=499 => Self::Validation { status, message },
            _ => Self::Server { status, message },
        }
    }

    /// Category of this failure.
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Validation { .. } | Self::InvalidUrl(_) | Self::InvalidUserId(_) => {
                FailureKind::Validation
            }
            Self::Auth { .. } => FailureKind::Auth,
            Self::NotFound { .. } => FailureKind::NotFound,
            Self::Server { .. } | Self::MalformedResponse(_) => FailureKind::Server,
            Self::Network(_) => FailureKind::Network,
            Self::Storage(_) => FailureKind::Storage,
        }
    }

    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Validation { status, .. }
            | Self::Auth { status, .. }
            | Self::Server { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            _ => None,
        }
    }
}

/// Convenience Result type for user-session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
