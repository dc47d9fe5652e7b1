//! Merchant credentials and request signing for the Skinsdrip API
//!
//! This crate provides the credential container and the canonical
//! signature computation shared by the REST client and IPN verification.
//!
//! # Example
//!
//! ```
//! use skinsdrip_auth::{canonical_signature, verify_ipn, MerchantCredentials};
//! use serde_json::json;
//!
//! let creds = MerchantCredentials::new("merchant_1", "secret").unwrap();
//!
//! let mut notification = json!({"orderId": "ord_1", "status": "completed"});
//! let signature = canonical_signature(&notification, creds.secret());
//! notification["signature"] = signature.into();
//!
//! assert!(verify_ipn(&notification, creds.secret()));
//! ```

mod credentials;
mod signer;

pub use credentials::MerchantCredentials;
pub use signer::{canonical_signature, verify_ipn, SIGNATURE_FIELD};
