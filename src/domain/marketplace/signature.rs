//! Gateway webhook signature verification.
//!
//! The gateway signs every notification with
//! `SHA-512(order_id ++ status_code ++ gross_amount ++ server_key)`,
//! hex-encoded into the `signature_key` field. This is the sole
//! authentication mechanism for inbound webhooks; nothing else about the
//! caller is trusted.
//!
//! # Security
//!
//! - `status_code` and `gross_amount` enter the hash exactly as
//!   delivered on the wire (never re-formatted), so the recomputation
//!   matches the vendor byte-for-byte
//! - Signatures are compared in constant time
//! - The mismatch error carries both signatures for audit logging; they
//!   are never echoed to the caller

use sha2::{Digest, Sha512};
use subtle::ConstantTimeEq;

use super::notification::GatewayNotification;
use super::webhook_errors::WebhookError;

/// Computes the expected hex-encoded signature for a notification.
pub fn compute_signature(
    order_id: &str,
    status_code: &str,
    gross_amount: &str,
    server_key: &str,
) -> String {
    let mut hasher = Sha512::new();
    hasher.update(order_id.as_bytes());
    hasher.update(status_code.as_bytes());
    hasher.update(gross_amount.as_bytes());
    hasher.update(server_key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Verifier for gateway notification signatures.
#[derive(Clone)]
pub struct SignatureVerifier {
    /// The gateway server key, shared with the vendor dashboard.
    server_key: String,
}

impl SignatureVerifier {
    /// Creates a new verifier with the given server key.
    pub fn new(server_key: impl Into<String>) -> Self {
        Self {
            server_key: server_key.into(),
        }
    }

    /// Verifies the signature carried by a parsed notification.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::SignatureMismatch` if the recomputed
    /// signature does not equal `signature_key`.
    pub fn verify(&self, notification: &GatewayNotification) -> Result<(), WebhookError> {
        // 1. Recompute the expected signature over the raw wire fields
        let expected = compute_signature(
            &notification.order_id,
            &notification.status_code,
            &notification.gross_amount,
            &self.server_key,
        );

        // 2. Compare constant-time against the vendor-supplied value
        if !constant_time_compare(expected.as_bytes(), notification.signature_key.as_bytes()) {
            return Err(WebhookError::signature_mismatch(
                expected,
                notification.signature_key.clone(),
            ));
        }

        Ok(())
    }
}

/// Performs constant-time comparison of two byte slices.
///
/// This prevents timing attacks that could leak information about the expected signature.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
