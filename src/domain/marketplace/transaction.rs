//! Transaction aggregate entity.
//!
//! A Transaction is a buyer-seller agreement to exchange one Listing for
//! its price, independent of payment mechanics. It is created together
//! with its Payment in one atomic unit of work and its status is mutated
//! only by webhook reconciliation.

use crate::domain::foundation::{ListingId, StateMachine, Timestamp, TransactionId, UserId};
use serde::{Deserialize, Serialize};

use super::Listing;

/// How the buyer intends to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Off-platform settlement; the platform only facilitates contact
    /// exchange and never auto-confirms payment.
    Direct,

    /// Hosted checkout through the external payment gateway.
    Gateway,
}

impl PaymentMethod {
    /// Returns true for off-platform settlement.
    pub fn is_direct(&self) -> bool {
        matches!(self, PaymentMethod::Direct)
    }

    /// Returns true if initiation places a checkout hold on the listing.
    ///
    /// Only gateway-routed purchases hold the listing: a direct purchase
    /// is human-mediated and the listing stays visible to other buyers.
    pub fn holds_listing(&self) -> bool {
        matches!(self, PaymentMethod::Gateway)
    }
}

/// Transaction lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    /// Created, awaiting payment confirmation.
    Pending,

    /// Payment confirmed by the gateway.
    Paid,

    /// Seller handed the item over (fulfillment, outside this core).
    Shipped,

    /// Buyer confirmed receipt (fulfillment, outside this core).
    Completed,

    /// Payment failed, expired, was refunded, or the purchase was
    /// abandoned.
    Cancelled,
}

impl TransactionStatus {
    /// Canonical string form, matching the stored column value.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Paid => "PAID",
            TransactionStatus::Shipped => "SHIPPED",
            TransactionStatus::Completed => "COMPLETED",
            TransactionStatus::Cancelled => "CANCELLED",
        }
    }
}

impl StateMachine for TransactionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use TransactionStatus::*;
        matches!(
            (self, target),
            // From PENDING
            (Pending, Paid)
                | (Pending, Cancelled)
                | (Pending, Pending) // vendor re-notification
            // From PAID
                | (Paid, Shipped)
                | (Paid, Completed)
                | (Paid, Cancelled) // refund
            // From SHIPPED
                | (Shipped, Completed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use TransactionStatus::*;
        match self {
            Pending => vec![Paid, Cancelled, Pending],
            Paid => vec![Shipped, Completed, Cancelled],
            Shipped => vec![Completed],
            Completed => vec![],
            Cancelled => vec![],
        }
    }
}

/// Transaction aggregate - one purchase attempt against one listing.
///
/// # Invariants
///
/// - `buyer_id != seller_id`
/// - `amount` equals the listing price at creation and is immutable
/// - Always paired with exactly one Payment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier for this transaction.
    pub id: TransactionId,

    /// User purchasing the item.
    pub buyer_id: UserId,

    /// User selling the item (copied from the listing).
    pub seller_id: UserId,

    /// Listing being purchased.
    pub listing_id: ListingId,

    /// Agreed amount in the smallest currency unit.
    /// Copied from the listing price at creation; never changes.
    pub amount: i64,

    /// Current lifecycle status.
    pub status: TransactionStatus,

    /// Settlement route chosen by the buyer.
    pub payment_method: PaymentMethod,

    /// When the transaction was created.
    pub created_at: Timestamp,

    /// When the transaction was last updated.
    pub updated_at: Timestamp,
}

impl Transaction {
    /// Create a pending transaction for a purchase of the given listing.
    ///
    /// The seller and amount are copied from the listing so they cannot
    /// diverge from it. Purchase eligibility (listing active, buyer is
    /// not the seller) is checked by the initiation handler before this
    /// is called.
    pub fn create(
        id: TransactionId,
        buyer_id: UserId,
        listing: &Listing,
        payment_method: PaymentMethod,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            buyer_id,
            seller_id: listing.seller_id.clone(),
            listing_id: listing.id,
            amount: listing.price,
            status: TransactionStatus::Pending,
            payment_method,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite the status from a reconciled gateway notification.
    ///
    /// Reconciliation is last-write-wins by design: redelivered
    /// notifications re-apply the same status, and no ordering across
    /// deliveries is enforced.
    pub fn apply_status(&mut self, status: TransactionStatus) {
        self.status = status;
        self.updated_at = Timestamp::now();
    }
}
