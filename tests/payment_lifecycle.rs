//! Integration tests for the payment lifecycle.
//!
//! These tests drive the full reconciliation loop end-to-end:
//! 1. InitiatePurchaseHandler creates the transaction/payment pair
//!    (holding the listing on the gateway route)
//! 2. ReconcileWebhookHandler applies a signed gateway notification
//! 3. GetPaymentStatusHandler serves the buyer's polling view
//!
//! Uses an in-memory store so the loop runs without Postgres. The store
//! mirrors the guarded-update semantics of the SQL repository: a hold
//! only applies to an ACTIVE listing inside the purchase unit of work,
//! and reconciliation listing updates are silent no-ops when the guard
//! does not match.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use unithrift::adapters::MockPaymentGateway;
use unithrift::application::{
    GetPaymentStatusHandler, GetPaymentStatusQuery, InitiatePurchaseCommand,
    InitiatePurchaseHandler, InitiatePurchaseResult, ReconcileWebhookCommand,
    ReconcileWebhookHandler, ReconcileWebhookResult,
};
use unithrift::domain::foundation::{
    DomainError, ErrorCode, ListingId, TransactionId, UniversityId, UserId,
};
use unithrift::domain::marketplace::{
    compute_signature, Listing, ListingAction, ListingCategory, ListingCondition, ListingStatus,
    MarketplaceError, OrderId, Payment, PaymentMethod, PaymentStatus, SignatureVerifier,
    StatusOutcome, Transaction, TransactionStatus, WebhookError,
};
use unithrift::ports::{
    AppliedReconciliation, PaymentReader, PaymentStatusView, PurchaseRepository,
};

const SERVER_KEY: &str = "SB-Mid-server-integrationkey";

// =============================================================================
// Test Infrastructure
// =============================================================================

/// In-memory store standing in for Postgres, shared by the write and
/// read ports so reconciliation results are immediately visible to the
/// polling view.
struct InMemoryMarket {
    listings: RwLock<HashMap<ListingId, Listing>>,
    transactions: RwLock<HashMap<TransactionId, Transaction>>,
    payments: RwLock<Vec<Payment>>,
}

impl InMemoryMarket {
    fn new() -> Self {
        Self {
            listings: RwLock::new(HashMap::new()),
            transactions: RwLock::new(HashMap::new()),
            payments: RwLock::new(Vec::new()),
        }
    }

    async fn insert_listing(&self, listing: Listing) {
        self.listings.write().await.insert(listing.id, listing);
    }

    async fn listing_status(&self, id: &ListingId) -> ListingStatus {
        self.listings.read().await.get(id).expect("listing row").status
    }

    async fn payment_count(&self) -> usize {
        self.payments.read().await.len()
    }
}

#[async_trait]
impl PurchaseRepository for InMemoryMarket {
    async fn find_listing(&self, id: &ListingId) -> Result<Option<Listing>, DomainError> {
        Ok(self.listings.read().await.get(id).cloned())
    }

    async fn create_purchase(
        &self,
        transaction: &Transaction,
        payment: &Payment,
    ) -> Result<(), DomainError> {
        // Gateway purchases hold the listing; the guard only matches an
        // ACTIVE row, and a miss aborts the whole unit of work.
        if transaction.payment_method.holds_listing() {
            let mut listings = self.listings.write().await;
            let listing = listings.get_mut(&transaction.listing_id).ok_or_else(|| {
                DomainError::new(
                    ErrorCode::InvalidStateTransition,
                    "Listing is not available for purchase",
                )
            })?;
            if listing.status != ListingStatus::Active {
                return Err(DomainError::new(
                    ErrorCode::InvalidStateTransition,
                    "Listing is not available for purchase",
                ));
            }
            listing.hold().expect("hold from ACTIVE");
        }

        self.transactions
            .write()
            .await
            .insert(transaction.id, transaction.clone());
        self.payments.write().await.push(payment.clone());
        Ok(())
    }

    async fn apply_outcome(
        &self,
        order_id: &OrderId,
        outcome: &StatusOutcome,
    ) -> Result<Option<AppliedReconciliation>, DomainError> {
        // Plain overwrites, matching the SQL adapter: the gateway's
        // view wins whatever was there.
        let transaction_id = {
            let mut payments = self.payments.write().await;
            let Some(payment) = payments
                .iter_mut()
                .find(|p| &p.external_order_id == order_id)
            else {
                return Ok(None);
            };
            payment.apply_status(outcome.payment_status);
            payment.transaction_id
        };

        let listing_id = {
            let mut transactions = self.transactions.write().await;
            let transaction = transactions.get_mut(&transaction_id).expect("transaction row");
            transaction.apply_status(outcome.transaction_status);
            transaction.listing_id
        };

        let listing_action = outcome.listing_action();
        {
            let mut listings = self.listings.write().await;
            if let Some(listing) = listings.get_mut(&listing_id) {
                match listing_action {
                    ListingAction::MarkSold => {
                        if matches!(
                            listing.status,
                            ListingStatus::Active | ListingStatus::OnHold
                        ) {
                            listing.mark_sold().expect("sell from ACTIVE/ON_HOLD");
                        }
                    }
                    ListingAction::ReleaseHold => {
                        if listing.status == ListingStatus::OnHold {
                            listing.release_hold().expect("release from ON_HOLD");
                        }
                    }
                    ListingAction::NoChange => {}
                }
            }
        }

        Ok(Some(AppliedReconciliation {
            transaction_id,
            payment_status: outcome.payment_status,
            transaction_status: outcome.transaction_status,
            listing_action,
        }))
    }
}

#[async_trait]
impl PaymentReader for InMemoryMarket {
    async fn find_by_transaction(
        &self,
        transaction_id: &TransactionId,
    ) -> Result<Option<PaymentStatusView>, DomainError> {
        let payments = self.payments.read().await;
        let Some(payment) = payments.iter().find(|p| &p.transaction_id == transaction_id)
        else {
            return Ok(None);
        };
        let transactions = self.transactions.read().await;
        let transaction = transactions.get(transaction_id).expect("transaction row");

        Ok(Some(PaymentStatusView {
            transaction_id: *transaction_id,
            order_id: payment.external_order_id.clone(),
            payment_status: payment.status,
            transaction_status: transaction.status,
            amount: payment.amount,
            updated_at: payment.updated_at,
        }))
    }
}

// =============================================================================
// Test Helpers
// =============================================================================

/// The three handlers wired over one shared in-memory store.
struct Lifecycle {
    market: Arc<InMemoryMarket>,
    gateway: Arc<MockPaymentGateway>,
    initiate: InitiatePurchaseHandler,
    reconcile: ReconcileWebhookHandler,
    status: GetPaymentStatusHandler,
}

fn lifecycle() -> Lifecycle {
    let market = Arc::new(InMemoryMarket::new());
    let gateway = Arc::new(MockPaymentGateway::new());
    Lifecycle {
        initiate: InitiatePurchaseHandler::new(market.clone(), gateway.clone()),
        reconcile: ReconcileWebhookHandler::new(
            market.clone(),
            SignatureVerifier::new(SERVER_KEY),
        ),
        status: GetPaymentStatusHandler::new(market.clone()),
        market,
        gateway,
    }
}

impl Lifecycle {
    async fn seed_active_listing(&self, price: i64) -> Listing {
        let listing = Listing::new(
            ListingId::new(),
            UserId::new("seller-7").unwrap(),
            UniversityId::new(),
            "Dorm desk lamp",
            "Warm LED, barely used",
            price,
            ListingCategory::Furniture,
            ListingCondition::LikeNew,
        )
        .unwrap();
        self.market.insert_listing(listing.clone()).await;
        listing
    }

    async fn buy(
        &self,
        buyer: &str,
        listing: &Listing,
        method: PaymentMethod,
    ) -> Result<InitiatePurchaseResult, MarketplaceError> {
        self.initiate
            .handle(InitiatePurchaseCommand {
                buyer_id: UserId::new(buyer).unwrap(),
                listing_id: listing.id,
                payment_method: method,
            })
            .await
    }

    async fn deliver(
        &self,
        payload: Vec<u8>,
    ) -> Result<ReconcileWebhookResult, WebhookError> {
        self.reconcile
            .handle(ReconcileWebhookCommand { payload })
            .await
    }

    async fn poll(&self, transaction_id: TransactionId) -> PaymentStatusView {
        self.status
            .handle(GetPaymentStatusQuery { transaction_id })
            .await
            .unwrap()
    }
}

/// Builds a notification body whose signature is valid for SERVER_KEY.
fn signed_payload(order_id: &str, vendor_status: &str, gross_amount: &str) -> Vec<u8> {
    signed_payload_with_fraud(order_id, vendor_status, gross_amount, None)
}

fn signed_payload_with_fraud(
    order_id: &str,
    vendor_status: &str,
    gross_amount: &str,
    fraud_status: Option<&str>,
) -> Vec<u8> {
    let status_code = "200";
    let sig = compute_signature(order_id, status_code, gross_amount, SERVER_KEY);
    let mut body = serde_json::json!({
        "transaction_time": "2024-03-01 14:02:17",
        "transaction_status": vendor_status,
        "transaction_id": "midtrans-ref-1",
        "status_message": "midtrans transaction notification",
        "status_code": status_code,
        "signature_key": sig,
        "payment_type": "qris",
        "order_id": order_id,
        "merchant_id": "G123456789",
        "gross_amount": gross_amount
    });
    if let Some(fraud) = fraud_status {
        body["fraud_status"] = serde_json::json!(fraud);
    }
    serde_json::to_vec(&body).unwrap()
}

/// Gateway gross_amount rendering of a minor-unit price.
fn gross(amount: i64) -> String {
    format!("{}.00", amount)
}

// =============================================================================
// Integration Tests
// =============================================================================

/// Tests the happy path: gateway checkout, settlement webhook, buyer
/// polling the final status.
#[tokio::test]
async fn gateway_checkout_settles_end_to_end() {
    let flow = lifecycle();
    let listing = flow.seed_active_listing(150_000).await;

    // Initiation attaches a checkout session and holds the listing.
    let purchase = flow
        .buy("buyer-1", &listing, PaymentMethod::Gateway)
        .await
        .unwrap();
    assert!(purchase.payment.gateway_token.is_some());
    assert!(purchase.payment.redirect_url.is_some());
    assert_eq!(
        flow.market.listing_status(&listing.id).await,
        ListingStatus::OnHold
    );

    // The order id the gateway saw is derivable from the transaction id.
    assert_eq!(
        purchase.payment.external_order_id,
        OrderId::for_transaction(&purchase.transaction.id)
    );

    // Settlement notification marks the payment settled and the listing sold.
    let order_id = purchase.payment.external_order_id.as_str().to_string();
    let applied = flow
        .deliver(signed_payload(&order_id, "settlement", &gross(150_000)))
        .await
        .unwrap();
    assert_eq!(applied.payment_status, PaymentStatus::Success);
    assert_eq!(applied.transaction_status, TransactionStatus::Paid);
    assert_eq!(applied.listing_action, ListingAction::MarkSold);
    assert!(applied.is_final());
    assert_eq!(
        flow.market.listing_status(&listing.id).await,
        ListingStatus::Sold
    );

    // The buyer's polling view reflects the settled state.
    let view = flow.poll(purchase.transaction.id).await;
    assert_eq!(view.payment_status, PaymentStatus::Success);
    assert_eq!(view.transaction_status, TransactionStatus::Paid);
    assert_eq!(view.amount, 150_000);
    assert!(view.is_final());
}

/// Tests that the direct route records the pending pair without a
/// checkout session or a listing hold.
#[tokio::test]
async fn direct_purchase_skips_gateway_and_hold() {
    let flow = lifecycle();
    let listing = flow.seed_active_listing(80_000).await;

    let purchase = flow
        .buy("buyer-1", &listing, PaymentMethod::Direct)
        .await
        .unwrap();

    assert!(flow.gateway.calls().is_empty());
    assert!(purchase.payment.gateway_token.is_none());
    assert_eq!(
        flow.market.listing_status(&listing.id).await,
        ListingStatus::Active
    );

    let view = flow.poll(purchase.transaction.id).await;
    assert_eq!(view.payment_status, PaymentStatus::Pending);
    assert_eq!(view.transaction_status, TransactionStatus::Pending);
    assert!(!view.is_final());
}

/// Tests that a held listing rejects a second buyer until the hold is
/// released.
#[tokio::test]
async fn held_listing_rejects_second_buyer() {
    let flow = lifecycle();
    let listing = flow.seed_active_listing(95_000).await;

    flow.buy("buyer-1", &listing, PaymentMethod::Gateway)
        .await
        .unwrap();

    let second = flow.buy("buyer-2", &listing, PaymentMethod::Gateway).await;
    assert!(matches!(
        second,
        Err(MarketplaceError::ListingNotAvailable { ref status, .. }) if status == "ON_HOLD"
    ));
    assert_eq!(flow.market.payment_count().await, 1);
}

/// Tests that a denied payment releases the hold so another buyer can
/// purchase the listing.
#[tokio::test]
async fn denied_payment_releases_hold_for_resale() {
    let flow = lifecycle();
    let listing = flow.seed_active_listing(120_000).await;

    let purchase = flow
        .buy("buyer-1", &listing, PaymentMethod::Gateway)
        .await
        .unwrap();
    let order_id = purchase.payment.external_order_id.as_str().to_string();

    let applied = flow
        .deliver(signed_payload(&order_id, "deny", &gross(120_000)))
        .await
        .unwrap();
    assert_eq!(applied.payment_status, PaymentStatus::Failed);
    assert_eq!(applied.transaction_status, TransactionStatus::Cancelled);
    assert_eq!(applied.listing_action, ListingAction::ReleaseHold);
    assert_eq!(
        flow.market.listing_status(&listing.id).await,
        ListingStatus::Active
    );

    // The released listing accepts a new checkout.
    let retry = flow.buy("buyer-2", &listing, PaymentMethod::Gateway).await;
    assert!(retry.is_ok());
    assert_eq!(
        flow.market.listing_status(&listing.id).await,
        ListingStatus::OnHold
    );
}

/// Tests that an expired checkout window cancels the transaction and
/// frees the listing.
#[tokio::test]
async fn expired_checkout_releases_hold() {
    let flow = lifecycle();
    let listing = flow.seed_active_listing(60_000).await;

    let purchase = flow
        .buy("buyer-1", &listing, PaymentMethod::Gateway)
        .await
        .unwrap();
    let order_id = purchase.payment.external_order_id.as_str().to_string();

    flow.deliver(signed_payload(&order_id, "expire", &gross(60_000)))
        .await
        .unwrap();

    let view = flow.poll(purchase.transaction.id).await;
    assert_eq!(view.payment_status, PaymentStatus::Expired);
    assert_eq!(view.transaction_status, TransactionStatus::Cancelled);
    assert!(view.is_final());
    assert_eq!(
        flow.market.listing_status(&listing.id).await,
        ListingStatus::Active
    );
}

/// Tests that redelivering a settlement notification converges on the
/// same state instead of failing.
#[tokio::test]
async fn settlement_redelivery_is_idempotent() {
    let flow = lifecycle();
    let listing = flow.seed_active_listing(150_000).await;

    let purchase = flow
        .buy("buyer-1", &listing, PaymentMethod::Gateway)
        .await
        .unwrap();
    let order_id = purchase.payment.external_order_id.as_str().to_string();
    let payload = signed_payload(&order_id, "settlement", &gross(150_000));

    let first = flow.deliver(payload.clone()).await.unwrap();
    let second = flow.deliver(payload).await.unwrap();

    assert_eq!(second.payment_status, first.payment_status);
    assert_eq!(second.transaction_status, first.transaction_status);
    assert_eq!(
        flow.market.listing_status(&listing.id).await,
        ListingStatus::Sold
    );
    assert_eq!(flow.market.payment_count().await, 1);
}

/// Tests that a refund after settlement overwrites the payment but
/// leaves the sold listing sold.
#[tokio::test]
async fn refund_after_settlement_keeps_listing_sold() {
    let flow = lifecycle();
    let listing = flow.seed_active_listing(200_000).await;

    let purchase = flow
        .buy("buyer-1", &listing, PaymentMethod::Gateway)
        .await
        .unwrap();
    let order_id = purchase.payment.external_order_id.as_str().to_string();

    flow.deliver(signed_payload(&order_id, "settlement", &gross(200_000)))
        .await
        .unwrap();
    let refunded = flow
        .deliver(signed_payload(&order_id, "refund", &gross(200_000)))
        .await
        .unwrap();

    assert_eq!(refunded.payment_status, PaymentStatus::Refunded);
    assert_eq!(refunded.transaction_status, TransactionStatus::Cancelled);
    // ReleaseHold only matches ON_HOLD; the sold row is untouched.
    assert_eq!(
        flow.market.listing_status(&listing.id).await,
        ListingStatus::Sold
    );

    let view = flow.poll(purchase.transaction.id).await;
    assert_eq!(view.payment_status, PaymentStatus::Refunded);
}

/// Tests that capture/challenge keeps everything pending until a later
/// delivery resolves it, with the latest notification winning.
#[tokio::test]
async fn challenge_then_settlement_tracks_latest_delivery() {
    let flow = lifecycle();
    let listing = flow.seed_active_listing(175_000).await;

    let purchase = flow
        .buy("buyer-1", &listing, PaymentMethod::Gateway)
        .await
        .unwrap();
    let order_id = purchase.payment.external_order_id.as_str().to_string();

    let challenged = flow
        .deliver(signed_payload_with_fraud(
            &order_id,
            "capture",
            &gross(175_000),
            Some("challenge"),
        ))
        .await
        .unwrap();
    assert_eq!(challenged.payment_status, PaymentStatus::Pending);
    assert!(!challenged.is_final());
    assert_eq!(
        flow.market.listing_status(&listing.id).await,
        ListingStatus::OnHold
    );

    flow.deliver(signed_payload(&order_id, "settlement", &gross(175_000)))
        .await
        .unwrap();

    let view = flow.poll(purchase.transaction.id).await;
    assert_eq!(view.payment_status, PaymentStatus::Success);
    assert_eq!(
        flow.market.listing_status(&listing.id).await,
        ListingStatus::Sold
    );
}

/// Tests that a notification for an order id we never issued asks the
/// gateway to retry instead of acking.
#[tokio::test]
async fn unknown_order_is_answered_as_retryable() {
    let flow = lifecycle();

    let stray = OrderId::for_transaction(&TransactionId::new());
    let result = flow
        .deliver(signed_payload(stray.as_str(), "settlement", "50000.00"))
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, WebhookError::UnknownOrder(_)));
    assert!(err.is_retryable());
    assert_eq!(err.status_code().as_u16(), 500);
}

/// Tests that a tampered amount fails signature verification and leaves
/// every row untouched.
#[tokio::test]
async fn tampered_amount_is_rejected_without_state_change() {
    let flow = lifecycle();
    let listing = flow.seed_active_listing(150_000).await;

    let purchase = flow
        .buy("buyer-1", &listing, PaymentMethod::Gateway)
        .await
        .unwrap();
    let order_id = purchase.payment.external_order_id.as_str().to_string();

    let tampered = String::from_utf8(signed_payload(&order_id, "settlement", "150000.00"))
        .unwrap()
        .replace("150000.00", "1.00")
        .into_bytes();

    let err = flow.deliver(tampered).await.unwrap_err();
    assert!(matches!(err, WebhookError::SignatureMismatch { .. }));
    assert!(!err.is_retryable());
    assert_eq!(err.status_code().as_u16(), 401);

    // Nothing moved: the hold stands and the payment is still pending.
    assert_eq!(
        flow.market.listing_status(&listing.id).await,
        ListingStatus::OnHold
    );
    let view = flow.poll(purchase.transaction.id).await;
    assert_eq!(view.payment_status, PaymentStatus::Pending);
}

/// Tests that garbage bytes are rejected before any verification work.
#[tokio::test]
async fn malformed_payload_is_rejected() {
    let flow = lifecycle();

    let err = flow.deliver(b"not json".to_vec()).await.unwrap_err();
    assert!(matches!(err, WebhookError::MalformedPayload(_)));
    assert_eq!(err.status_code().as_u16(), 400);
}
