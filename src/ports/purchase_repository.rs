//! Purchase repository port (write side).
//!
//! Defines the contract for the two transactional units of work in the
//! payment lifecycle: recording a new purchase and applying a
//! reconciled status outcome.
//!
//! # Design
//!
//! - **Unit of work**: Each method is one atomic transaction; partial
//!   writes must never be visible
//! - **Guarded holds**: Listing holds are conditional updates so a
//!   concurrent purchase of the same listing loses cleanly
//! - **Overwrite semantics**: `apply_outcome` writes statuses without
//!   transition validation, so webhook redelivery and out-of-order
//!   delivery converge on the latest notification

use crate::domain::foundation::{DomainError, ListingId, TransactionId};
use crate::domain::marketplace::{
    Listing, ListingAction, OrderId, Payment, PaymentStatus, StatusOutcome, Transaction,
    TransactionStatus,
};
use async_trait::async_trait;

/// Repository port for purchase persistence.
///
/// Implementations must ensure:
/// - `create_purchase` inserts the transaction, inserts the payment,
///   and places the listing hold (when required) atomically
/// - `apply_outcome` resolves the order id, overwrites both statuses,
///   and applies the listing action atomically
#[async_trait]
pub trait PurchaseRepository: Send + Sync {
    /// Load a listing for purchase eligibility checks.
    ///
    /// Returns `None` if not found.
    async fn find_listing(&self, id: &ListingId) -> Result<Option<Listing>, DomainError>;

    /// Persist a new transaction and its payment in one unit of work.
    ///
    /// When the transaction's payment method holds the listing, the
    /// implementation must also move the listing from ACTIVE to
    /// ON_HOLD with a guarded conditional update. If the guard matches
    /// no row (the listing was taken concurrently), the whole unit of
    /// work is aborted.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the listing hold guard fails
    /// - `DatabaseError` on persistence failure
    async fn create_purchase(
        &self,
        transaction: &Transaction,
        payment: &Payment,
    ) -> Result<(), DomainError>;

    /// Apply a reconciled status outcome in one unit of work.
    ///
    /// Resolves the payment by gateway order id, overwrites the
    /// payment and transaction statuses, and applies the derived
    /// listing action. Returns `None` when no payment matches the
    /// order id so the caller can signal a retryable failure.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn apply_outcome(
        &self,
        order_id: &OrderId,
        outcome: &StatusOutcome,
    ) -> Result<Option<AppliedReconciliation>, DomainError>;
}

/// Record of what a reconciliation unit of work actually wrote.
///
/// Returned so the caller can log the applied statuses without a
/// second read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedReconciliation {
    /// Transaction the order id resolved to.
    pub transaction_id: TransactionId,

    /// Payment status written.
    pub payment_status: PaymentStatus,

    /// Transaction status written.
    pub transaction_status: TransactionStatus,

    /// Listing action applied.
    pub listing_action: ListingAction,
}
