//! Canonical request signing
//!
//! Every signed call carries a `signature` field computed over the
//! top-level scalar fields of the request body:
//!
//! 1. Exclude the `signature` field itself and every non-scalar value
//!    (objects, arrays, null).
//! 2. Sort the remaining field names lexicographically and concatenate
//!    their values.
//! 3. Append the merchant secret, hash with SHA-256, render as lower hex.
//!
//! The same computation verifies inbound payment notifications (IPN).

use serde_json::Value;
use sha2::{Digest, Sha256};

/// Name of the signature field on signed payloads
pub const SIGNATURE_FIELD: &str = "signature";

/// Compute the canonical signature for a request payload.
///
/// Non-object payloads sign as if they had no fields, i.e. over the
/// secret alone.
pub fn canonical_signature(payload: &Value, secret: &str) -> String {
    let mut message = String::new();

    if let Some(map) = payload.as_object() {
        let mut keys: Vec<&String> = map.keys().collect();
        keys.sort();

        for key in keys {
            if key == SIGNATURE_FIELD {
                continue;
            }
            if let Some(fragment) = scalar_fragment(&map[key.as_str()]) {
                message.push_str(&fragment);
            }
        }
    }

    message.push_str(secret);

    hex::encode(Sha256::digest(message.as_bytes()))
}

/// Verify an inbound payment notification against its `signature` field.
///
/// Returns `false` when the signature field is missing or not a string.
/// The comparison does not short-circuit on the first mismatching byte.
pub fn verify_ipn(payload: &Value, secret: &str) -> bool {
    let Some(provided) = payload.get(SIGNATURE_FIELD).and_then(Value::as_str) else {
        return false;
    };

    let expected = canonical_signature(payload, secret);

    provided.len() == expected.len()
        && provided
            .bytes()
            .zip(expected.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

/// Render a scalar field value for signing; `None` excludes the field.
///
/// Null is excluded along with objects and arrays, matching the wire
/// behavior merchants already depend on.
fn scalar_fragment(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Object(_) | Value::Array(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SECRET: &str = "test_merchant_secret";

    #[test]
    fn test_signature_is_hex_sha256() {
        let sig = canonical_signature(&json!({"user_id": "u1"}), SECRET);
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_signature_is_deterministic() {
        let payload = json!({"b": "2", "a": "1"});
        assert_eq!(
            canonical_signature(&payload, SECRET),
            canonical_signature(&payload, SECRET)
        );
    }

    #[test]
    fn test_field_order_does_not_matter() {
        // Serde maps preserve insertion order; signing must not.
        let first = json!({"alpha": "1", "beta": "2"});
        let second = json!({"beta": "2", "alpha": "1"});
        assert_eq!(
            canonical_signature(&first, SECRET),
            canonical_signature(&second, SECRET)
        );
    }

    #[test]
    fn test_non_scalars_are_excluded() {
        let bare = json!({"user_id": "u1"});
        let padded = json!({
            "user_id": "u1",
            "items": [{"assetId": "a1"}],
            "meta": {"nested": true},
            "note": null
        });
        assert_eq!(
            canonical_signature(&bare, SECRET),
            canonical_signature(&padded, SECRET)
        );
    }

    #[test]
    fn test_signature_field_is_excluded() {
        let unsigned = json!({"user_id": "u1"});
        let signed = json!({"user_id": "u1", "signature": "deadbeef"});
        assert_eq!(
            canonical_signature(&unsigned, SECRET),
            canonical_signature(&signed, SECRET)
        );
    }

    #[test]
    fn test_verify_ipn_round_trip() {
        let mut payload = json!({"orderId": "ord_1", "status": "completed", "total": 12.5});
        let sig = canonical_signature(&payload, SECRET);
        payload[SIGNATURE_FIELD] = Value::String(sig);

        assert!(verify_ipn(&payload, SECRET));
    }

    #[test]
    fn test_verify_ipn_detects_mutation() {
        let mut payload = json!({"orderId": "ord_1", "status": "completed"});
        let sig = canonical_signature(&payload, SECRET);
        payload[SIGNATURE_FIELD] = Value::String(sig);

        // Mutating any scalar field must flip the result
        payload["status"] = Value::String("declined".to_string());
        assert!(!verify_ipn(&payload, SECRET));
    }

    #[test]
    fn test_verify_ipn_wrong_secret() {
        let mut payload = json!({"orderId": "ord_1"});
        let sig = canonical_signature(&payload, SECRET);
        payload[SIGNATURE_FIELD] = Value::String(sig);

        assert!(!verify_ipn(&payload, "another_secret"));
    }

    #[test]
    fn test_verify_ipn_missing_signature() {
        assert!(!verify_ipn(&json!({"orderId": "ord_1"}), SECRET));
        assert!(!verify_ipn(&json!({"orderId": "ord_1", "signature": 42}), SECRET));
    }

    #[test]
    fn test_numbers_and_bools_sign_canonically() {
        let a = canonical_signature(&json!({"count": 5, "flag": true}), SECRET);
        let b = canonical_signature(&json!({"count": 6, "flag": true}), SECRET);
        assert_ne!(a, b);
    }
}
