//! Error types for the Meilisearch SDK.

use std::time::Duration;

use thiserror::Error;

/// Meilisearch error codes the SDK inspects.
pub mod error_code {
    pub const INDEX_NOT_FOUND: &str = "index_not_found";
    pub const INDEX_ALREADY_EXISTS: &str = "index_already_exists";
    pub const DOCUMENT_NOT_FOUND: &str = "document_not_found";
    pub const MISSING_AUTHORIZATION_HEADER: &str = "missing_authorization_header";
    pub const INVALID_TOKEN: &str = "invalid_token";
}

/// Result type alias for Meilisearch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for Meilisearch operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The server answered the request with a non-2xx status.
    #[error("meilisearch: {message} (status={status_code})")]
    Api {
        /// HTTP status code of the response.
        status_code: u16,
        /// Human-readable message from the error envelope.
        message: String,
        /// Machine-readable `errorCode` from the error envelope.
        error_code: Option<String>,
        /// `errorType` from the error envelope.
        error_type: Option<String>,
        /// Documentation link from the error envelope.
        error_link: Option<String>,
    },

    /// The server could not be reached (connection refused, DNS failure,
    /// TLS handshake failure, request timeout).
    #[error("communication error: {0}")]
    Communication(#[from] reqwest::Error),

    /// A wait on a pending update gave up before the update reached a
    /// terminal state. The server-side task may still complete later.
    #[error("update {update_id} still pending after {timeout:?}")]
    Timeout {
        update_id: u64,
        timeout: Duration,
    },

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Creates a new API error.
    pub fn api(status_code: u16, message: impl Into<String>) -> Self {
        Error::Api {
            status_code,
            message: message.into(),
            error_code: None,
            error_type: None,
            error_link: None,
        }
    }

    /// Returns the `errorCode` field if this is an API error.
    pub fn api_error_code(&self) -> Option<&str> {
        match self {
            Error::Api { error_code, .. } => error_code.as_deref(),
            _ => None,
        }
    }

    /// Returns true if the server reported the requested resource missing.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Api {
                status_code,
                error_code,
                ..
            } => {
                *status_code == 404
                    || matches!(
                        error_code.as_deref(),
                        Some(error_code::INDEX_NOT_FOUND) | Some(error_code::DOCUMENT_NOT_FOUND)
                    )
            }
            _ => false,
        }
    }

    /// Returns true if index creation failed because the index exists.
    pub fn is_index_already_exists(&self) -> bool {
        self.api_error_code() == Some(error_code::INDEX_ALREADY_EXISTS)
    }

    /// Returns true if the request was rejected for missing or invalid
    /// credentials.
    pub fn is_auth_error(&self) -> bool {
        match self {
            Error::Api {
                status_code,
                error_code,
                ..
            } => {
                *status_code == 401
                    || *status_code == 403
                    || matches!(
                        error_code.as_deref(),
                        Some(error_code::MISSING_AUTHORIZATION_HEADER)
                            | Some(error_code::INVALID_TOKEN)
                    )
            }
            _ => false,
        }
    }

    /// Returns true if this is a client-side poll timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout { .. })
    }
}
