//! Event stream endpoint definitions

use std::fmt;

/// Skinsdrip event stream endpoints
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Endpoint {
    /// Production event stream (default)
    #[default]
    Production,
    /// Test-mode event stream
    Test,
    /// Custom URL (local development, test servers)
    Custom(String),
}

impl Endpoint {
    /// Get the WebSocket URL for this endpoint
    pub fn url(&self) -> &str {
        match self {
            Self::Production => "wss://api.skinsdrip.com",
            Self::Test => "wss://api.test.skinsdrip.com",
            Self::Custom(url) => url,
        }
    }

    /// Endpoint for the given test-mode flag
    pub fn for_test_mode(testmode: bool) -> Self {
        if testmode {
            Self::Test
        } else {
            Self::Production
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_urls() {
        assert_eq!(Endpoint::Production.url(), "wss://api.skinsdrip.com");
        assert_eq!(Endpoint::Test.url(), "wss://api.test.skinsdrip.com");
        assert_eq!(
            Endpoint::Custom("ws://127.0.0.1:9000".into()).url(),
            "ws://127.0.0.1:9000"
        );
    }

    #[test]
    fn test_for_test_mode() {
        assert_eq!(Endpoint::for_test_mode(false), Endpoint::Production);
        assert_eq!(Endpoint::for_test_mode(true), Endpoint::Test);
    }
}
