//! Payment gateway port for external payment processing.
//!
//! Defines the contract for hosted-checkout gateway integrations
//! (e.g., Midtrans Snap). Implementations create a checkout session
//! for an order; settlement results arrive separately through the
//! webhook endpoint, never through this port.
//!
//! # Design
//!
//! - **Session-focused**: One call per purchase, returning a token the
//!   client feeds to the gateway's checkout widget
//! - **No status reads**: Reconciliation is webhook-driven, so the
//!   port deliberately has no status query

use crate::domain::foundation::{DomainError, ErrorCode, ListingId, UserId};
use crate::domain::marketplace::{MarketplaceError, OrderId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for payment gateway integrations.
///
/// Implementations must be safe to call concurrently and should map
/// vendor failures onto [`GatewayError`] without leaking credentials.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a hosted checkout session for an order.
    ///
    /// Returns the session token and redirect URL on success.
    async fn create_transaction(
        &self,
        request: CreateSnapTransactionRequest,
    ) -> Result<SnapSession, GatewayError>;
}

/// Request to create a checkout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSnapTransactionRequest {
    /// Gateway-visible order id, derived from the transaction id.
    pub order_id: OrderId,

    /// Listing being purchased, forwarded as the line item reference.
    pub listing_id: ListingId,

    /// Amount due, in minor currency units.
    pub gross_amount: i64,

    /// Listing title shown on the checkout page.
    pub item_name: String,

    /// Buyer's platform identity, passed as the customer reference.
    pub buyer_id: UserId,
}

/// Checkout session returned by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapSession {
    /// Session token the client feeds to the checkout widget.
    pub token: String,

    /// Hosted checkout URL for redirect-based flows.
    pub redirect_url: String,
}

/// Errors from payment gateway operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayError {
    /// Error code for categorization.
    pub code: GatewayErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Vendor's error code (if available).
    pub provider_code: Option<String>,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl GatewayError {
    /// Create a new gateway error.
    pub fn new(code: GatewayErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
            retryable: code.is_retryable(),
        }
    }

    /// Attach the vendor's error code.
    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::NetworkError, message)
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::AuthenticationError, message)
    }

    /// Create an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::InvalidRequest, message)
    }

    /// Create a vendor-side error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(GatewayErrorCode::ProviderError, message)
    }
}

impl std::fmt::Display for GatewayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for GatewayError {}

impl From<GatewayError> for DomainError {
    fn from(err: GatewayError) -> Self {
        DomainError::new(ErrorCode::GatewayError, err.message)
    }
}

impl From<GatewayError> for MarketplaceError {
    fn from(err: GatewayError) -> Self {
        MarketplaceError::gateway_failed(err.to_string())
    }
}

/// Gateway error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// API authentication failed.
    AuthenticationError,

    /// Request rejected as invalid.
    InvalidRequest,

    /// Rate limit exceeded.
    RateLimited,

    /// Vendor API error.
    ProviderError,

    /// Unknown error.
    Unknown,
}

impl GatewayErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GatewayErrorCode::NetworkError | GatewayErrorCode::RateLimited
        )
    }
}

impl std::fmt::Display for GatewayErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GatewayErrorCode::NetworkError => "network_error",
            GatewayErrorCode::AuthenticationError => "authentication_error",
            GatewayErrorCode::InvalidRequest => "invalid_request",
            GatewayErrorCode::RateLimited => "rate_limited",
            GatewayErrorCode::ProviderError => "provider_error",
            GatewayErrorCode::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}
