//! Unified SDK error types.

use thiserror::Error;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// A response decoded but its content failed domain checks.
    #[error("Invalid response for {resource}: {reason}")]
    InvalidResponse { resource: String, reason: String },

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// HTTP-layer errors.
#[derive(Error, Debug)]
pub enum HttpError {
    /// The request could not be sent or no response arrived.
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// A response arrived but its body does not match the expected shape.
    #[error("Unexpected response body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Server error {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Timeout")]
    Timeout,
}

/// Coarse classification used by view code to pick a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchErrorKind {
    /// No response was received.
    Network,
    /// The response body did not decode or failed domain checks.
    Decode,
    /// The requested entity does not exist.
    NotFound,
    /// The backend answered with a non-2xx status.
    Server,
    /// Input was rejected before any request was made.
    Invalid,
}

impl SdkError {
    pub(crate) fn invalid_response(
        resource: impl std::fmt::Display,
        reason: impl std::fmt::Display,
    ) -> Self {
        SdkError::InvalidResponse {
            resource: resource.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn kind(&self) -> FetchErrorKind {
        match self {
            SdkError::Http(e) => e.kind(),
            SdkError::NotFound(_) => FetchErrorKind::NotFound,
            SdkError::Validation(_) => FetchErrorKind::Invalid,
            SdkError::InvalidResponse { .. } => FetchErrorKind::Decode,
            SdkError::Serde(_) => FetchErrorKind::Decode,
            SdkError::Other(_) => FetchErrorKind::Server,
        }
    }

    /// Whether a retry of the same request could plausibly succeed.
    pub fn is_transient(&self, retryable_statuses: &[u16]) -> bool {
        match self {
            SdkError::Http(HttpError::Status { status, .. }) => {
                retryable_statuses.contains(status)
            }
            SdkError::Http(HttpError::Timeout) => true,
            #[cfg(feature = "http")]
            SdkError::Http(HttpError::Network(e)) => {
                e.is_connect() || e.is_timeout() || e.is_request()
            }
            _ => false,
        }
    }
}

impl HttpError {
    pub fn kind(&self) -> FetchErrorKind {
        match self {
            #[cfg(feature = "http")]
            HttpError::Network(_) => FetchErrorKind::Network,
            HttpError::Timeout => FetchErrorKind::Network,
            HttpError::Decode { .. } => FetchErrorKind::Decode,
            HttpError::NotFound(_) => FetchErrorKind::NotFound,
            HttpError::Status { .. } => FetchErrorKind::Server,
        }
    }
}
