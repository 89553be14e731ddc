//! ReconcileWebhookHandler - Command handler for gateway payment notifications.

use std::sync::Arc;

use crate::domain::foundation::TransactionId;
use crate::domain::marketplace::{
    map_vendor_status, GatewayNotification, ListingAction, OrderId, PaymentStatus,
    SignatureVerifier, TransactionStatus, WebhookError,
};
use crate::ports::PurchaseRepository;

/// Command to reconcile one webhook delivery.
#[derive(Debug, Clone)]
pub struct ReconcileWebhookCommand {
    /// Raw request body, exactly as delivered.
    pub payload: Vec<u8>,
}

/// Result of a successfully applied notification.
#[derive(Debug, Clone)]
pub struct ReconcileWebhookResult {
    pub order_id: OrderId,
    pub transaction_id: TransactionId,
    pub payment_status: PaymentStatus,
    pub transaction_status: TransactionStatus,
    pub listing_action: ListingAction,
}

impl ReconcileWebhookResult {
    /// Whether the payment reached a final status with this delivery.
    pub fn is_final(&self) -> bool {
        self.payment_status.is_final()
    }
}

/// Handler for reconciling gateway payment notifications.
///
/// Runs the strictly ordered pipeline: schema validation, signature
/// verification, status mapping, atomic application. The first two
/// steps never touch the database, so forged or garbled deliveries are
/// rejected without I/O.
pub struct ReconcileWebhookHandler {
    repository: Arc<dyn PurchaseRepository>,
    verifier: SignatureVerifier,
}

impl ReconcileWebhookHandler {
    pub fn new(repository: Arc<dyn PurchaseRepository>, verifier: SignatureVerifier) -> Self {
        Self {
            repository,
            verifier,
        }
    }

    pub async fn handle(
        &self,
        cmd: ReconcileWebhookCommand,
    ) -> Result<ReconcileWebhookResult, WebhookError> {
        // 1. Schema validation. An unrecognized vendor status fails
        //    here, before any signature work.
        let notification: GatewayNotification = serde_json::from_slice(&cmd.payload)
            .map_err(|e| WebhookError::malformed(e.to_string()))?;

        // 2. Signature verification. The mismatch details go to the
        //    log, never to the caller.
        if let Err(err) = self.verifier.verify(&notification) {
            if let WebhookError::SignatureMismatch { expected, received } = &err {
                tracing::warn!(
                    order_id = %notification.order_id,
                    expected_signature = %expected,
                    received_signature = %received,
                    "Webhook signature verification failed"
                );
            }
            return Err(err);
        }

        // 3. Status mapping
        let outcome = map_vendor_status(notification.transaction_status, notification.fraud_status);

        // 4. Atomic application. An unknown order id is answered as
        //    retryable so the gateway redelivers after the initiation
        //    unit of work commits.
        let order_id = OrderId::from_string(&notification.order_id);
        let applied = self
            .repository
            .apply_outcome(&order_id, &outcome)
            .await
            .map_err(|e| WebhookError::database(e.to_string()))?
            .ok_or_else(|| WebhookError::unknown_order(order_id.as_str()))?;

        let result = ReconcileWebhookResult {
            order_id,
            transaction_id: applied.transaction_id,
            payment_status: applied.payment_status,
            transaction_status: applied.transaction_status,
            listing_action: applied.listing_action,
        };

        tracing::info!(
            order_id = %result.order_id,
            vendor_status = notification.transaction_status.as_str(),
            payment_status = result.payment_status.as_str(),
            transaction_status = result.transaction_status.as_str(),
            listing_action = ?result.listing_action,
            is_final = result.is_final(),
            "Webhook notification reconciled"
        );

        Ok(result)
    }
}
