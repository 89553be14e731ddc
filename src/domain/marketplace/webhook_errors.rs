//! Webhook error types for gateway notification handling.
//!
//! Defines all error conditions that can occur during webhook
//! reconciliation, with HTTP status code mapping and retryability
//! semantics. The status code drives the acknowledgement contract:
//! the gateway redelivers on 5xx and drops on 4xx.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that occur during webhook reconciliation.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Notification body failed schema validation.
    #[error("Malformed notification: {0}")]
    MalformedPayload(String),

    /// Recomputed signature does not match the vendor-supplied value.
    ///
    /// Both signatures are carried for audit logging only; the Display
    /// impl deliberately omits them so they can never leak into a
    /// response body.
    #[error("Invalid signature")]
    SignatureMismatch { expected: String, received: String },

    /// Order id matches no Payment row.
    ///
    /// Usually a race where the notification arrived before the
    /// initiation unit of work committed; returning 5xx makes the
    /// gateway retry after the insert lands.
    #[error("Unknown order: {0}")]
    UnknownOrder(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(String),
}

impl WebhookError {
    /// Creates a malformed payload error from a parse failure.
    pub fn malformed(reason: impl Into<String>) -> Self {
        WebhookError::MalformedPayload(reason.into())
    }

    /// Creates a signature mismatch error.
    pub fn signature_mismatch(expected: impl Into<String>, received: impl Into<String>) -> Self {
        WebhookError::SignatureMismatch {
            expected: expected.into(),
            received: received.into(),
        }
    }

    /// Creates an unknown order error.
    pub fn unknown_order(order_id: impl Into<String>) -> Self {
        WebhookError::UnknownOrder(order_id.into())
    }

    /// Creates a database error.
    pub fn database(message: impl Into<String>) -> Self {
        WebhookError::Database(message.into())
    }

    /// Returns true if the gateway should retry delivering this webhook.
    ///
    /// Retryable errors indicate temporary failures that may succeed
    /// later; non-retryable errors will fail identically on redelivery.
    pub fn is_retryable(&self) -> bool {
        match self {
            WebhookError::MalformedPayload(_) => false,
            WebhookError::SignatureMismatch { .. } => false,
            WebhookError::UnknownOrder(_) => true,
            WebhookError::Database(_) => true,
        }
    }

    /// Returns the HTTP status code for the acknowledgement.
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::MalformedPayload(_) => StatusCode::BAD_REQUEST,
            WebhookError::SignatureMismatch { .. } => StatusCode::UNAUTHORIZED,
            WebhookError::UnknownOrder(_) | WebhookError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
