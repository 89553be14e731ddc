//! Payment aggregate entity.
//!
//! A Payment is the gateway-facing record tracking money movement for one
//! Transaction. The gateway never sees internal identifiers; it correlates
//! notifications back to us through the [`OrderId`] derived from the
//! transaction id at initiation time.

use crate::domain::foundation::{PaymentId, StateMachine, Timestamp, TransactionId};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::Transaction;

/// Prefix for gateway-visible order identifiers.
pub const ORDER_ID_PREFIX: &str = "ORDER-";

/// Gateway-visible order identifier, derived deterministically from the
/// transaction id (`"ORDER-" + transaction_id`).
///
/// Determinism gives webhook idempotency for free: every redelivered
/// notification for the same transaction carries the same order id and
/// resolves to the same Payment row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Derives the order id for a transaction.
    pub fn for_transaction(transaction_id: &TransactionId) -> Self {
        Self(format!("{}{}", ORDER_ID_PREFIX, transaction_id))
    }

    /// Rehydrates an order id from storage or a webhook payload.
    ///
    /// No shape validation: an unknown order id is handled at lookup
    /// time, not parse time.
    pub fn from_string(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payment lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Awaiting a terminal notification from the gateway.
    Pending,

    /// Funds captured or settled.
    Success,

    /// Denied or cancelled by the gateway.
    Failed,

    /// The checkout session expired before the buyer paid.
    Expired,

    /// Fully or partially refunded after settlement.
    Refunded,
}

impl PaymentStatus {
    /// Returns true once the payment has left Pending.
    ///
    /// The polling client stops polling when it observes a final status.
    pub fn is_final(&self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }

    /// Canonical string form, matching the stored column value.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Success => "SUCCESS",
            PaymentStatus::Failed => "FAILED",
            PaymentStatus::Expired => "EXPIRED",
            PaymentStatus::Refunded => "REFUNDED",
        }
    }
}

impl StateMachine for PaymentStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use PaymentStatus::*;
        matches!(
            (self, target),
            // From PENDING
            (Pending, Pending) // authorize/challenge re-notification
                | (Pending, Success)
                | (Pending, Failed)
                | (Pending, Expired)
            // From SUCCESS
                | (Success, Refunded)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use PaymentStatus::*;
        match self {
            Pending => vec![Pending, Success, Failed, Expired],
            Success => vec![Refunded],
            Failed => vec![],
            Expired => vec![],
            Refunded => vec![],
        }
    }
}

/// Payment aggregate - money movement for one transaction.
///
/// # Invariants
///
/// - One-to-one with its owning Transaction; created in the same atomic
///   unit of work and never exists independently
/// - `external_order_id` is globally unique (derived from the unique
///   transaction id)
/// - `amount` mirrors the transaction amount
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier for this payment.
    pub id: PaymentId,

    /// Owning transaction.
    pub transaction_id: TransactionId,

    /// Amount in the smallest currency unit.
    pub amount: i64,

    /// Current lifecycle status.
    pub status: PaymentStatus,

    /// Gateway-visible order identifier.
    pub external_order_id: OrderId,

    /// Opaque checkout token returned by the gateway (gateway route only).
    pub gateway_token: Option<String>,

    /// Hosted checkout URL returned by the gateway (gateway route only).
    pub redirect_url: Option<String>,

    /// When the payment was created.
    pub created_at: Timestamp,

    /// When the payment was last updated.
    pub updated_at: Timestamp,
}

impl Payment {
    /// Create a pending payment for a transaction.
    ///
    /// Gateway session fields start empty; the gateway route fills them
    /// via [`Payment::attach_gateway_session`] before anything persists.
    pub fn create(id: PaymentId, transaction: &Transaction) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            transaction_id: transaction.id,
            amount: transaction.amount,
            status: PaymentStatus::Pending,
            external_order_id: OrderId::for_transaction(&transaction.id),
            gateway_token: None,
            redirect_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record the checkout session returned by the gateway.
    pub fn attach_gateway_session(&mut self, token: String, redirect_url: String) {
        self.gateway_token = Some(token);
        self.redirect_url = Some(redirect_url);
        self.updated_at = Timestamp::now();
    }

    /// Overwrite the status from a reconciled gateway notification.
    ///
    /// Last-write-wins, matching [`Transaction::apply_status`].
    pub fn apply_status(&mut self, status: PaymentStatus) {
        self.status = status;
        self.updated_at = Timestamp::now();
    }
}
