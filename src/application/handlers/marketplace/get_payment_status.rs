//! GetPaymentStatusHandler - Query handler for polling payment status.

use std::sync::Arc;

use crate::domain::foundation::TransactionId;
use crate::domain::marketplace::MarketplaceError;
use crate::ports::{PaymentReader, PaymentStatusView};

/// Query to get the payment status for a transaction.
#[derive(Debug, Clone)]
pub struct GetPaymentStatusQuery {
    pub transaction_id: TransactionId,
}

/// Handler for retrieving payment status.
///
/// Buyers poll this after returning from the gateway checkout page;
/// clients stop polling once the view reports a final status.
pub struct GetPaymentStatusHandler {
    reader: Arc<dyn PaymentReader>,
}

impl GetPaymentStatusHandler {
    pub fn new(reader: Arc<dyn PaymentReader>) -> Self {
        Self { reader }
    }

    pub async fn handle(
        &self,
        query: GetPaymentStatusQuery,
    ) -> Result<PaymentStatusView, MarketplaceError> {
        self.reader
            .find_by_transaction(&query.transaction_id)
            .await
            .map_err(|e| MarketplaceError::infrastructure(e.to_string()))?
            .ok_or_else(|| MarketplaceError::payment_not_found(query.transaction_id))
    }
}
