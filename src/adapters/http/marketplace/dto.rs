//! HTTP DTOs (Data Transfer Objects) for marketplace purchase endpoints.
//!
//! These types define the JSON request/response structure for the purchase
//! API. They serve as the boundary between HTTP and the application layer.

use crate::application::{InitiatePurchaseResult, ReconcileWebhookResult};
use crate::domain::marketplace::{PaymentMethod, PaymentStatus};
use crate::ports::PaymentStatusView;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to initiate a purchase.
#[derive(Debug, Clone, Deserialize)]
pub struct InitiatePurchaseRequest {
    /// Listing to buy.
    pub listing_id: Uuid,

    /// Settlement route ("DIRECT" or "GATEWAY").
    pub payment_method: PaymentMethod,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response for a created purchase.
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseCreatedResponse {
    /// Transaction ID.
    pub transaction_id: String,

    /// Payment ID.
    pub payment_id: String,

    /// Snap checkout token (gateway route only).
    pub snap_token: Option<String>,

    /// Hosted checkout URL (gateway route only).
    pub redirect_url: Option<String>,

    /// Whether the buyer chose the direct (off-platform) route.
    pub is_direct: bool,
}

impl From<InitiatePurchaseResult> for PurchaseCreatedResponse {
    fn from(result: InitiatePurchaseResult) -> Self {
        Self {
            transaction_id: result.transaction.id.to_string(),
            payment_id: result.payment.id.to_string(),
            snap_token: result.payment.gateway_token,
            redirect_url: result.payment.redirect_url,
            is_direct: result.transaction.payment_method == PaymentMethod::Direct,
        }
    }
}

/// Response for a payment status poll.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentStatusResponse {
    /// Current payment status.
    pub status: PaymentStatus,

    /// Amount due, in the smallest currency unit.
    pub amount: i64,

    /// When the payment was last reconciled or created (ISO 8601).
    pub updated_at: String,
}

impl From<PaymentStatusView> for PaymentStatusResponse {
    fn from(view: PaymentStatusView) -> Self {
        Self {
            status: view.payment_status,
            amount: view.amount,
            updated_at: view.updated_at.as_datetime().to_rfc3339(),
        }
    }
}

/// Acknowledgement for a processed webhook notification.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookAckResponse {
    /// Always true on the success path.
    pub success: bool,

    /// Human-readable outcome description.
    pub message: String,

    /// Order the notification applied to.
    pub order_id: String,
}

impl From<ReconcileWebhookResult> for WebhookAckResponse {
    fn from(result: ReconcileWebhookResult) -> Self {
        Self {
            success: true,
            message: format!(
                "Payment status updated to {}",
                result.payment_status.as_str()
            ),
            order_id: result.order_id.as_str().to_string(),
        }
    }
}

/// Error body for rejected webhook deliveries.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookErrorResponse {
    /// Error description. Never carries signature material.
    pub error: String,
}

/// Standard error response for API errors.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,

    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}
