// crates/storefront-preflight-probes/src/signature.rs
// ============================================================================
// Module: Webhook Signatures
// Description: HMAC-SHA256 signing and verification for webhook payloads.
// Purpose: Produce the base64 digest carried in the provider HMAC header.
// Dependencies: hmac, sha2, base64, subtle
// ============================================================================

//! ## Overview
//! Webhook providers sign the raw request body with HMAC-SHA256 keyed by the
//! shared secret and send the digest base64-encoded (standard alphabet, with
//! padding). Verification decodes the candidate and compares digests in
//! constant time.

// ============================================================================
// SECTION: Imports
// ============================================================================

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::Hmac;
use hmac::Mac;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::ProbeError;

/// HMAC-SHA256 keyed hash.
type HmacSha256 = Hmac<Sha256>;

// ============================================================================
// SECTION: Signing
// ============================================================================

/// Computes the base64-encoded HMAC-SHA256 digest of `payload` keyed by `secret`.
///
/// # Errors
///
/// Returns [`ProbeError::Signature`] when the MAC cannot be keyed.
pub fn sign_payload(secret: &[u8], payload: &[u8]) -> Result<String, ProbeError> {
    Ok(BASE64.encode(digest(secret, payload)?))
}

/// Returns true when `candidate` is the base64 HMAC-SHA256 digest of `payload`.
///
/// Malformed base64 and wrong-length digests are rejected without panicking.
#[must_use]
pub fn verify_signature(secret: &[u8], payload: &[u8], candidate: &str) -> bool {
    let Ok(provided) = BASE64.decode(candidate.trim()) else {
        return false;
    };
    let Ok(expected) = digest(secret, payload) else {
        return false;
    };
    bool::from(expected.as_slice().ct_eq(provided.as_slice()))
}

/// Computes the raw HMAC-SHA256 digest.
fn digest(secret: &[u8], payload: &[u8]) -> Result<Vec<u8>, ProbeError> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|err| ProbeError::Signature(err.to_string()))?;
    mac.update(payload);
    Ok(mac.finalize().into_bytes().to_vec())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use super::*;

    /// RFC 4231 test case 2, base64 encoded.
    const RFC4231_CASE_2: &str = "W9zBRr9gdU5qBCQmCJV1x1oAPwidJzmDnexYuWTsOEM=";

    #[test]
    fn sign_matches_rfc4231_vector() {
        let signature = sign_payload(b"Jefe", b"what do ya want for nothing?").unwrap();
        assert_eq!(signature, RFC4231_CASE_2);
    }

    #[test]
    fn sign_matches_reference_for_default_payload() {
        let signature =
            sign_payload(b"shpss_test_secret", br##"{"id":12345,"name":"#1001"}"##).unwrap();
        assert_eq!(signature, "lZvn9hqoLeLyG8OZEFAhHWMf5w7dsrKSEsxrfFmvh0Q=");
    }

    #[test]
    fn empty_secret_still_signs() {
        let signature = sign_payload(b"", br##"{"id":12345,"name":"#1001"}"##).unwrap();
        assert_eq!(signature, "48Sg1QtQOBefjNbTem8PKS1HFzn9g/krmca6NTTBVOg=");
    }

    #[test]
    fn verify_accepts_matching_signature() {
        assert!(verify_signature(b"Jefe", b"what do ya want for nothing?", RFC4231_CASE_2));
    }

    #[test]
    fn verify_rejects_invalid_literal() {
        assert!(!verify_signature(
            b"Jefe",
            b"what do ya want for nothing?",
            "invalid_hmac_signature_12345678"
        ));
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        assert!(!verify_signature(b"jefe", b"what do ya want for nothing?", RFC4231_CASE_2));
    }
}
