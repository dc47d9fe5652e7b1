//! Session credential issued by the authenticate endpoint

use std::fmt;

/// Opaque session token proving a successful merchant authentication.
///
/// Required to open the event channel and attached as a cookie to every
/// authenticated REST call. The token value is redacted from `Debug`
/// output so it cannot leak through logs.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a raw token string
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Access the raw token value
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render the token as a `Cookie` header value
    pub fn cookie_value(&self) -> String {
        format!("auth={}", self.0)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionToken").field(&"[REDACTED]").finish()
    }
}
