//! Merchant credentials for the Skinsdrip API
//!
//! # Security
//!
//! The merchant secret is stored using the `secrecy` crate which:
//! - Zeroizes memory on drop (prevents memory scanning)
//! - Prevents accidental logging via Debug impl
//! - Provides explicit access via `expose_secret()`

use secrecy::{ExposeSecret, SecretString};
use skinsdrip_types::{SkinsdripError, SkinsdripResult};

/// Merchant API credentials
///
/// The secret is automatically zeroized when the credentials are dropped,
/// preventing sensitive data from remaining in memory.
pub struct MerchantCredentials {
    /// Merchant identifier (public)
    merchant_id: String,
    /// Merchant secret (zeroized on drop)
    secret: SecretString,
}

impl MerchantCredentials {
    /// Create new credentials from a merchant id and secret
    ///
    /// # Errors
    /// Returns a `Configuration` error if either value is empty.
    pub fn new(
        merchant_id: impl Into<String>,
        secret: impl Into<String>,
    ) -> SkinsdripResult<Self> {
        let merchant_id = merchant_id.into();
        let secret = secret.into();

        if merchant_id.is_empty() {
            return Err(SkinsdripError::Configuration(
                "merchant id is required".to_string(),
            ));
        }
        if secret.is_empty() {
            return Err(SkinsdripError::Configuration(
                "merchant secret is required".to_string(),
            ));
        }

        Ok(Self {
            merchant_id,
            secret: SecretString::from(secret),
        })
    }

    /// Create credentials from environment variables
    ///
    /// Reads `SKINSDRIP_MERCHANT_ID` and `SKINSDRIP_MERCHANT_SECRET`.
    pub fn from_env() -> SkinsdripResult<Self> {
        let merchant_id = std::env::var("SKINSDRIP_MERCHANT_ID").map_err(|_| {
            SkinsdripError::Configuration("SKINSDRIP_MERCHANT_ID is not set".to_string())
        })?;
        let secret = std::env::var("SKINSDRIP_MERCHANT_SECRET").map_err(|_| {
            SkinsdripError::Configuration("SKINSDRIP_MERCHANT_SECRET is not set".to_string())
        })?;

        Self::new(merchant_id, secret)
    }

    /// Get the merchant id
    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    /// Access the merchant secret for signing
    pub fn secret(&self) -> &str {
        self.secret.expose_secret()
    }
}

impl Clone for MerchantCredentials {
    /// Clone credentials (creates a new secret box with the same content)
    fn clone(&self) -> Self {
        Self {
            merchant_id: self.merchant_id.clone(),
            secret: SecretString::from(self.secret.expose_secret().to_owned()),
        }
    }
}

impl std::fmt::Debug for MerchantCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MerchantCredentials")
            .field("merchant_id", &self.merchant_id)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
