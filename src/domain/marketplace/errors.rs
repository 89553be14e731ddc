//! Marketplace-specific error types.
//!
//! Errors related to purchase initiation, payment processing, and
//! status queries.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | ListingNotFound | 404 |
//! | TransactionNotFound | 404 |
//! | PaymentNotFound | 404 |
//! | ListingNotAvailable | 409 |
//! | SelfPurchase | 400 |
//! | GatewayFailed | 502 |
//! | InvalidState | 409 |
//! | ValidationFailed | 400 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{DomainError, ErrorCode, ListingId, TransactionId};

/// Marketplace-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarketplaceError {
    /// Listing was not found.
    ListingNotFound(ListingId),

    /// Transaction was not found.
    TransactionNotFound(TransactionId),

    /// No payment exists for this transaction.
    PaymentNotFound(TransactionId),

    /// Listing exists but cannot be purchased in its current state.
    ListingNotAvailable {
        listing_id: ListingId,
        status: String,
    },

    /// Buyer attempted to purchase their own listing.
    SelfPurchase(ListingId),

    /// Payment gateway call failed.
    GatewayFailed {
        reason: String,
    },

    /// Invalid state for the requested operation.
    InvalidState {
        current: String,
        attempted: String,
    },

    /// Validation failed.
    ValidationFailed {
        field: String,
        message: String,
    },

    /// Infrastructure error.
    Infrastructure(String),
}

impl MarketplaceError {
    // Constructor functions for cleaner error creation

    pub fn listing_not_found(id: ListingId) -> Self {
        MarketplaceError::ListingNotFound(id)
    }

    pub fn transaction_not_found(id: TransactionId) -> Self {
        MarketplaceError::TransactionNotFound(id)
    }

    pub fn payment_not_found(transaction_id: TransactionId) -> Self {
        MarketplaceError::PaymentNotFound(transaction_id)
    }

    pub fn listing_not_available(listing_id: ListingId, status: impl Into<String>) -> Self {
        MarketplaceError::ListingNotAvailable {
            listing_id,
            status: status.into(),
        }
    }

    pub fn self_purchase(listing_id: ListingId) -> Self {
        MarketplaceError::SelfPurchase(listing_id)
    }

    pub fn gateway_failed(reason: impl Into<String>) -> Self {
        MarketplaceError::GatewayFailed {
            reason: reason.into(),
        }
    }

    pub fn invalid_state(current: impl Into<String>, attempted: impl Into<String>) -> Self {
        MarketplaceError::InvalidState {
            current: current.into(),
            attempted: attempted.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        MarketplaceError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        MarketplaceError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            MarketplaceError::ListingNotFound(_) => ErrorCode::ListingNotFound,
            MarketplaceError::TransactionNotFound(_) => ErrorCode::TransactionNotFound,
            MarketplaceError::PaymentNotFound(_) => ErrorCode::PaymentNotFound,
            MarketplaceError::ListingNotAvailable { .. } => ErrorCode::ListingNotAvailable,
            MarketplaceError::SelfPurchase(_) => ErrorCode::SelfPurchase,
            MarketplaceError::GatewayFailed { .. } => ErrorCode::GatewayError,
            MarketplaceError::InvalidState { .. } => ErrorCode::InvalidStateTransition,
            MarketplaceError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            MarketplaceError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            MarketplaceError::ListingNotFound(id) => format!("Listing not found: {}", id),
            MarketplaceError::TransactionNotFound(id) => {
                format!("Transaction not found: {}", id)
            }
            MarketplaceError::PaymentNotFound(transaction_id) => {
                format!("No payment found for transaction: {}", transaction_id)
            }
            MarketplaceError::ListingNotAvailable { listing_id, status } => {
                format!("Listing {} is not available for purchase ({})", listing_id, status)
            }
            MarketplaceError::SelfPurchase(listing_id) => {
                format!("Cannot purchase own listing: {}", listing_id)
            }
            MarketplaceError::GatewayFailed { reason } => {
                format!("Payment gateway error: {}", reason)
            }
            MarketplaceError::InvalidState { current, attempted } => {
                format!("Cannot {} in {} state", attempted, current)
            }
            MarketplaceError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            MarketplaceError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true if this error should trigger a retry.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MarketplaceError::Infrastructure(_) | MarketplaceError::GatewayFailed { .. }
        )
    }
}

impl std::fmt::Display for MarketplaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for MarketplaceError {}

impl From<DomainError> for MarketplaceError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::GatewayError => MarketplaceError::GatewayFailed {
                reason: err.message,
            },
            ErrorCode::InvalidStateTransition => MarketplaceError::InvalidState {
                current: "unknown".to_string(),
                attempted: err.message,
            },
            ErrorCode::ValidationFailed
            | ErrorCode::EmptyField
            | ErrorCode::OutOfRange
            | ErrorCode::InvalidFormat => MarketplaceError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => MarketplaceError::Infrastructure(err.to_string()),
        }
    }
}

impl From<MarketplaceError> for DomainError {
    fn from(err: MarketplaceError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
