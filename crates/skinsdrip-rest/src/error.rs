//! Error types for REST API operations

use skinsdrip_types::SkinsdripError;

/// Errors that can occur during REST API operations
#[derive(Debug, thiserror::Error)]
pub enum RestError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned an error payload
    #[error("API error: {message}")]
    Upstream {
        /// Error message from the API envelope
        message: String,
    },

    /// Missing session token for an authenticated endpoint
    #[error("Authentication required for this endpoint")]
    AuthRequired,

    /// Failed to parse a response
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

impl RestError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

impl From<RestError> for SkinsdripError {
    fn from(err: RestError) -> Self {
        match err {
            RestError::Http(e) => SkinsdripError::Transport(e.to_string()),
            RestError::Upstream { message } => SkinsdripError::Upstream { message },
            RestError::AuthRequired => SkinsdripError::Unauthenticated,
            RestError::Parse(message) => SkinsdripError::InvalidJson { message, raw: None },
            RestError::InvalidParameter(message) => SkinsdripError::InvalidArgument(message),
        }
    }
}

/// Result type for REST operations
pub type RestResult<T> = Result<T, RestError>;
