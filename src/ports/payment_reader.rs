//! Payment reader port (read side / CQRS queries).
//!
//! Defines the contract for payment status queries. Buyers poll this
//! after returning from the gateway checkout page, because the webhook
//! lands out of band and the redirect alone says nothing about the
//! final payment state.
//!
//! # Design
//!
//! - **Read-optimized**: One denormalized view per transaction
//! - **Separated from write**: CQRS pattern, matching the repository
//!   split on the write side

use crate::domain::foundation::{DomainError, Timestamp, TransactionId};
use crate::domain::marketplace::{OrderId, PaymentStatus, TransactionStatus};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Reader port for payment status queries.
#[async_trait]
pub trait PaymentReader: Send + Sync {
    /// Get the payment status view for a transaction.
    ///
    /// Returns `None` if the transaction has no payment.
    async fn find_by_transaction(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<Option<PaymentStatusView>, DomainError>;
}

/// Denormalized payment status for polling clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentStatusView {
    /// Transaction this payment belongs to.
    pub transaction_id: TransactionId,

    /// Gateway-visible order id.
    pub order_id: OrderId,

    /// Current payment status.
    pub payment_status: PaymentStatus,

    /// Current transaction status.
    pub transaction_status: TransactionStatus,

    /// Amount due, in minor currency units.
    pub amount: i64,

    /// When the payment was last reconciled or created.
    pub updated_at: Timestamp,
}

impl PaymentStatusView {
    /// Whether the payment has reached a final status.
    ///
    /// Clients stop polling once this is true.
    pub fn is_final(&self) -> bool {
        self.payment_status.is_final()
    }
}
