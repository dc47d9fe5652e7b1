//! Error types for the Skinsdrip SDK

use std::time::Duration;
use thiserror::Error;

/// Main error type for Skinsdrip SDK operations
#[derive(Error, Debug)]
pub enum SkinsdripError {
    // === Configuration Errors ===
    /// Missing or invalid credentials at construction
    #[error("Configuration error: {0}")]
    Configuration(String),

    // === Caller Errors ===
    /// Operation attempted before a successful authenticate
    #[error("Not authenticated, call authenticate() first")]
    Unauthenticated,

    /// Missing or invalid call parameter
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // === Upstream Errors ===
    /// The merchant API returned an error payload
    #[error("Upstream error: {message}")]
    Upstream {
        /// Error message reported by the API
        message: String,
    },

    // === Transport Errors ===
    /// Failed to establish a connection
    #[error("Failed to connect to {url}: {source}")]
    ConnectionFailed {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// Connection attempt timed out
    #[error("Connection timeout after {timeout:?} to {url}")]
    ConnectionTimeout { url: String, timeout: Duration },

    /// Stream-level protocol or I/O error
    #[error("Transport error: {0}")]
    Transport(String),

    /// Failed to parse a JSON payload
    #[error("Invalid JSON: {message}")]
    InvalidJson {
        message: String,
        raw: Option<String>,
    },

    // === Internal Errors ===
    /// Internal channel was closed unexpectedly
    #[error("Internal channel closed unexpectedly")]
    ChannelClosed,
}

impl SkinsdripError {
    /// Returns true if this error is potentially recoverable via retry
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. } | Self::ConnectionTimeout { .. } | Self::Transport(_)
        )
    }

    /// Returns true if this error requires reconnecting the event stream
    pub fn requires_reconnect(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed { .. }
                | Self::ConnectionTimeout { .. }
                | Self::Transport(_)
                | Self::ChannelClosed
        )
    }

    /// Returns true if this error cannot be recovered from at runtime
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::InvalidArgument(_) | Self::Unauthenticated
        )
    }

    /// Create an upstream error from an API error message
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }
}

/// Result type alias for Skinsdrip SDK operations
pub type SkinsdripResult<T> = Result<T, SkinsdripError>;
