// Error handling module
// Defines the error taxonomy shared by every API call

use thiserror::Error;

/// Message used when the backend reports `success: false` without an `error` field
pub const UNKNOWN_ERROR: &str = "Unknown Error";

/// Errors surfaced by the API client
///
/// Every failed call is logged where it is classified and then returned to the
/// caller unchanged; nothing here is retried.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The backend answered 2xx but the envelope carried `success: false`
    #[error("Business error: {message}")]
    Business { message: String },

    /// 401 or 403 from the backend
    #[error("Unauthorized: {status} - {message}")]
    Unauthorized { status: u16, message: String },

    /// Any other non-2xx status
    #[error("API error: {status} - {message}")]
    Status { status: u16, message: String },

    /// The request was sent but no response arrived (timeout, refused, reset)
    #[error("Network error: {0}")]
    Network(String),

    /// The request could not be built, so it never reached the transport
    #[error("Request error: {0}")]
    Request(String),

    /// Client-side input check failed before sending
    #[error("Validation error: {0}")]
    Validation(String),

    /// Response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// JSON endpoint answered with something else (usually an HTML page from a proxy)
    #[error("Unexpected content: {0}")]
    UnexpectedContent(String),

    /// Session store could not be read or written
    #[error("Session error: {0}")]
    Session(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// HTTP status carried by the error, if the backend answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { status, .. } | ApiError::Status { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    /// True for 401/403 responses
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// Short machine-readable category, used as a tracing field
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Business { .. } => "business",
            ApiError::Unauthorized { .. } => "unauthorized",
            ApiError::Status { .. } => "status",
            ApiError::Network(_) => "network",
            ApiError::Request(_) => "request",
            ApiError::Validation(_) => "validation",
            ApiError::Decode(_) => "decode",
            ApiError::UnexpectedContent(_) => "unexpected_content",
            ApiError::Session(_) => "session",
            ApiError::Config(_) => "config",
            ApiError::Internal(_) => "internal",
        }
    }
}

/// Result type alias for API operations
pub type Result<T> = std::result::Result<T, ApiError>;
