//! Vendor status mapping table.
//!
//! Maps the gateway's status vocabulary onto the internal
//! (Payment, Transaction, optional Listing) status triple. This table is
//! the heart of webhook reconciliation and is matched exhaustively over
//! the closed vendor enums: adding a vendor status without extending the
//! table is a compile error, never a silent fall-through.
//!
//! | vendor         | fraud              | Payment  | Transaction | Listing |
//! |----------------|--------------------|----------|-------------|---------|
//! | capture        | accept             | SUCCESS  | PAID        | SOLD    |
//! | capture        | challenge          | PENDING  | PENDING     | -       |
//! | capture        | deny/other/missing | FAILED   | CANCELLED   | -       |
//! | settlement     | -                  | SUCCESS  | PAID        | SOLD    |
//! | pending        | -                  | PENDING  | PENDING     | -       |
//! | deny           | -                  | FAILED   | CANCELLED   | -       |
//! | cancel         | -                  | FAILED   | CANCELLED   | -       |
//! | expire         | -                  | EXPIRED  | CANCELLED   | -       |
//! | refund         | -                  | REFUNDED | CANCELLED   | -       |
//! | partial_refund | -                  | REFUNDED | CANCELLED   | -       |
//! | authorize      | -                  | PENDING  | PENDING     | -       |

use super::{
    FraudStatus, ListingStatus, PaymentStatus, TransactionStatus, VendorTransactionStatus,
};

/// The status triple a notification resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusOutcome {
    /// Status to overwrite onto the Payment row.
    pub payment_status: PaymentStatus,

    /// Status to overwrite onto the Transaction row.
    pub transaction_status: TransactionStatus,

    /// Listing status named by the table; only ever `Some(Sold)`.
    pub listing_status: Option<ListingStatus>,
}

/// What reconciliation does to the listing row, derived from the triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingAction {
    /// Guarded update to Sold (from Active or OnHold).
    MarkSold,

    /// Guarded release of a checkout hold (OnHold back to Active),
    /// leaving Sold and Deleted rows untouched.
    ReleaseHold,

    /// Listing row is not touched.
    NoChange,
}

impl StatusOutcome {
    fn new(
        payment_status: PaymentStatus,
        transaction_status: TransactionStatus,
        listing_status: Option<ListingStatus>,
    ) -> Self {
        Self {
            payment_status,
            transaction_status,
            listing_status,
        }
    }

    /// Derives the listing side effect.
    ///
    /// The table only ever names Sold explicitly. A cancel-class outcome
    /// (transaction cancelled, no listing status named) releases any
    /// checkout hold so the item becomes purchasable again.
    pub fn listing_action(&self) -> ListingAction {
        match self.listing_status {
            Some(ListingStatus::Sold) => ListingAction::MarkSold,
            Some(_) => ListingAction::NoChange,
            None if self.transaction_status == TransactionStatus::Cancelled => {
                ListingAction::ReleaseHold
            }
            None => ListingAction::NoChange,
        }
    }
}

/// Resolves a (vendor status, fraud status) pair to the internal triple.
pub fn map_vendor_status(
    status: VendorTransactionStatus,
    fraud_status: Option<FraudStatus>,
) -> StatusOutcome {
    use ListingStatus as L;
    use PaymentStatus as P;
    use TransactionStatus as T;
    use VendorTransactionStatus as V;

    match status {
        V::Capture => match fraud_status {
            Some(FraudStatus::Accept) => StatusOutcome::new(P::Success, T::Paid, Some(L::Sold)),
            Some(FraudStatus::Challenge) => StatusOutcome::new(P::Pending, T::Pending, None),
            // deny, unrecognized, or missing fraud verdict
            Some(FraudStatus::Deny) | Some(FraudStatus::Other) | None => {
                StatusOutcome::new(P::Failed, T::Cancelled, None)
            }
        },
        V::Settlement => StatusOutcome::new(P::Success, T::Paid, Some(L::Sold)),
        V::Pending => StatusOutcome::new(P::Pending, T::Pending, None),
        V::Deny => StatusOutcome::new(P::Failed, T::Cancelled, None),
        V::Cancel => StatusOutcome::new(P::Failed, T::Cancelled, None),
        V::Expire => StatusOutcome::new(P::Expired, T::Cancelled, None),
        V::Refund => StatusOutcome::new(P::Refunded, T::Cancelled, None),
        V::PartialRefund => StatusOutcome::new(P::Refunded, T::Cancelled, None),
        V::Authorize => StatusOutcome::new(P::Pending, T::Pending, None),
    }
}
