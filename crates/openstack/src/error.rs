//! Error type shared by the identity and compute clients.

use thiserror::Error;

/// Errors that can occur while talking to an OpenStack cloud.
#[derive(Error, Debug)]
pub enum OpenStackError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Resource not found (HTTP 404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Resource is in a conflicting state (HTTP 409).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Authentication error.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// No usable endpoint in the service catalog.
    #[error("Service catalog error: {0}")]
    Catalog(String),

    /// A lookup by name matched more than one resource.
    #[error("Found {count} {resource}s matching {name}")]
    MultipleResults {
        resource: &'static str,
        name: String,
        count: usize,
    },

    /// Request options failed validation before being sent.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The client could not be constructed; every call reports why.
    #[error("Client unavailable: {0}")]
    ClientUnavailable(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl OpenStackError {
    /// Build an error from a non-success HTTP status and response body.
    #[must_use]
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        match status.as_u16() {
            404 => Self::NotFound(body),
            409 => Self::Conflict(body),
            401 | 403 => Self::Auth(body),
            code => Self::Api {
                status: code,
                message: body,
            },
        }
    }

    /// Whether the error means the resource does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::Http(e) => e.status() == Some(reqwest::StatusCode::NOT_FOUND),
            _ => false,
        }
    }

    /// Whether the error means the resource is in a conflicting state.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::Conflict(_) => true,
            Self::Http(e) => e.status() == Some(reqwest::StatusCode::CONFLICT),
            _ => false,
        }
    }

    /// HTTP status code carried by the error, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::NotFound(_) => Some(404),
            Self::Conflict(_) => Some(409),
            Self::Api { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result alias for OpenStack operations.
pub type Result<T, E = OpenStackError> = std::result::Result<T, E>;
