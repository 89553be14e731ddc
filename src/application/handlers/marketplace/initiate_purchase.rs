//! InitiatePurchaseHandler - Command handler for starting a purchase.

use std::sync::Arc;

use crate::domain::foundation::{ListingId, PaymentId, TransactionId, UserId};
use crate::domain::marketplace::{MarketplaceError, Payment, PaymentMethod, Transaction};
use crate::ports::{CreateSnapTransactionRequest, PaymentGateway, PurchaseRepository};

/// Command to initiate a purchase of a listing.
#[derive(Debug, Clone)]
pub struct InitiatePurchaseCommand {
    pub buyer_id: UserId,
    pub listing_id: ListingId,
    pub payment_method: PaymentMethod,
}

/// Result of successful purchase initiation.
#[derive(Debug, Clone)]
pub struct InitiatePurchaseResult {
    pub transaction: Transaction,
    pub payment: Payment,
}

/// Handler for initiating a purchase.
///
/// For the gateway route this creates a hosted checkout session and
/// places a hold on the listing; the payment is settled later by
/// webhook reconciliation. For the direct route it only records the
/// pending transaction, leaving settlement to the buyer and seller.
pub struct InitiatePurchaseHandler {
    repository: Arc<dyn PurchaseRepository>,
    payment_gateway: Arc<dyn PaymentGateway>,
}

impl InitiatePurchaseHandler {
    pub fn new(
        repository: Arc<dyn PurchaseRepository>,
        payment_gateway: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            repository,
            payment_gateway,
        }
    }

    pub async fn handle(
        &self,
        cmd: InitiatePurchaseCommand,
    ) -> Result<InitiatePurchaseResult, MarketplaceError> {
        // 1. Load the listing
        let listing = self
            .repository
            .find_listing(&cmd.listing_id)
            .await?
            .ok_or_else(|| MarketplaceError::listing_not_found(cmd.listing_id))?;

        // 2. Reject listings that are not open for purchase
        if !listing.is_purchasable() {
            return Err(MarketplaceError::listing_not_available(
                listing.id,
                listing.status.as_str(),
            ));
        }

        // 3. Reject self-purchase
        if listing.is_owned_by(&cmd.buyer_id) {
            return Err(MarketplaceError::self_purchase(listing.id));
        }

        // 4. Build the transaction and payment pair in memory. The
        //    gateway order id derives from the transaction id, so it is
        //    known before any I/O happens.
        let transaction = Transaction::create(
            TransactionId::new(),
            cmd.buyer_id.clone(),
            &listing,
            cmd.payment_method,
        );
        let mut payment = Payment::create(PaymentId::new(), &transaction);

        // 5. Gateway route: create the checkout session first, so a
        //    gateway failure leaves no rows behind
        if cmd.payment_method.holds_listing() {
            let session = self
                .payment_gateway
                .create_transaction(CreateSnapTransactionRequest {
                    order_id: payment.external_order_id.clone(),
                    listing_id: listing.id,
                    gross_amount: transaction.amount,
                    item_name: listing.title.clone(),
                    buyer_id: cmd.buyer_id,
                })
                .await?;
            payment.attach_gateway_session(session.token, session.redirect_url);
        }

        // 6. Persist both rows (and the listing hold, when the method
        //    requires one) in a single unit of work
        self.repository.create_purchase(&transaction, &payment).await?;

        Ok(InitiatePurchaseResult {
            transaction,
            payment,
        })
    }
}
