//! HTTP handlers for marketplace purchase endpoints.
//!
//! These handlers connect Axum routes to application layer command/query
//! handlers. The webhook endpoint builds its response directly instead of
//! going through [`MarketplaceApiError`], because the gateway
//! acknowledgement contract has its own status and body shape.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::application::handlers::marketplace::{
    GetPaymentStatusHandler, GetPaymentStatusQuery, InitiatePurchaseCommand,
    InitiatePurchaseHandler, ReconcileWebhookCommand, ReconcileWebhookHandler,
};
use crate::domain::foundation::{ListingId, TransactionId, UserId};
use crate::domain::marketplace::{MarketplaceError, SignatureVerifier};
use crate::ports::{PaymentGateway, PaymentReader, PurchaseRepository};

use super::dto::{
    ErrorResponse, InitiatePurchaseRequest, PaymentStatusResponse, PurchaseCreatedResponse,
    WebhookAckResponse, WebhookErrorResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// This struct is cloned for each request and contains Arc-wrapped dependencies
/// for efficient sharing across handlers.
#[derive(Clone)]
pub struct MarketplaceAppState {
    pub purchase_repository: Arc<dyn PurchaseRepository>,
    pub payment_reader: Arc<dyn PaymentReader>,
    pub payment_gateway: Arc<dyn PaymentGateway>,
    pub signature_verifier: SignatureVerifier,
}

impl MarketplaceAppState {
    /// Create handlers on demand from the shared state.
    pub fn initiate_purchase_handler(&self) -> InitiatePurchaseHandler {
        InitiatePurchaseHandler::new(
            self.purchase_repository.clone(),
            self.payment_gateway.clone(),
        )
    }

    pub fn payment_status_handler(&self) -> GetPaymentStatusHandler {
        GetPaymentStatusHandler::new(self.payment_reader.clone())
    }

    pub fn webhook_handler(&self) -> ReconcileWebhookHandler {
        ReconcileWebhookHandler::new(
            self.purchase_repository.clone(),
            self.signature_verifier.clone(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// User Context (would come from auth middleware in production)
// ════════════════════════════════════════════════════════════════════════════════

/// Authenticated user context extracted from request.
///
/// In production, this would be extracted from JWT/session by auth middleware.
/// For now, uses a header-based extraction for development/testing.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}

/// Rejection type for AuthenticatedUser extraction.
pub struct AuthenticationRequired;

impl IntoResponse for AuthenticationRequired {
    fn into_response(self) -> axum::response::Response {
        let error = ErrorResponse::new("AUTHENTICATION_REQUIRED", "Authentication is required");
        (StatusCode::UNAUTHORIZED, Json(error)).into_response()
    }
}

impl<S> axum::extract::FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthenticationRequired;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            // In production, this would validate JWT token from Authorization header
            // For development, we accept an X-User-Id header
            let user_id = parts
                .headers
                .get("X-User-Id")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| UserId::new(s).ok())
                .ok_or(AuthenticationRequired)?;

            Ok(AuthenticatedUser { user_id })
        })
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/purchases/:transaction_id/payment - Poll payment status
pub async fn get_payment_status(
    State(state): State<MarketplaceAppState>,
    _user: AuthenticatedUser,
    Path(transaction_id): Path<Uuid>,
) -> Result<impl IntoResponse, MarketplaceApiError> {
    let handler = state.payment_status_handler();
    let query = GetPaymentStatusQuery {
        transaction_id: TransactionId::from_uuid(transaction_id),
    };

    let view = handler.handle(query).await?;

    Ok(Json(PaymentStatusResponse::from(view)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/purchases - Initiate a purchase
pub async fn initiate_purchase(
    State(state): State<MarketplaceAppState>,
    user: AuthenticatedUser,
    Json(request): Json<InitiatePurchaseRequest>,
) -> Result<impl IntoResponse, MarketplaceApiError> {
    let handler = state.initiate_purchase_handler();
    let cmd = InitiatePurchaseCommand {
        buyer_id: user.user_id,
        listing_id: ListingId::from_uuid(request.listing_id),
        payment_method: request.payment_method,
    };

    let result = handler.handle(cmd).await?;

    let response = PurchaseCreatedResponse::from(result);
    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/webhooks/midtrans - Handle Midtrans payment notifications
///
/// The response status drives redelivery: Midtrans drops the
/// notification on 4xx and retries on 5xx. Rejections therefore map to
/// 400/401 while processing failures map to 500.
pub async fn handle_midtrans_webhook(
    State(state): State<MarketplaceAppState>,
    body: axum::body::Bytes,
) -> axum::response::Response {
    let handler = state.webhook_handler();
    let cmd = ReconcileWebhookCommand {
        payload: body.to_vec(),
    };

    match handler.handle(cmd).await {
        Ok(result) => {
            let ack = WebhookAckResponse::from(result);
            (StatusCode::OK, Json(ack)).into_response()
        }
        Err(err) => {
            // Display for WebhookError never carries signature material,
            // so the body cannot leak what the log records.
            let body = WebhookErrorResponse {
                error: err.to_string(),
            };
            (err.status_code(), Json(body)).into_response()
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts domain errors to HTTP responses.
pub struct MarketplaceApiError(MarketplaceError);

impl From<MarketplaceError> for MarketplaceApiError {
    fn from(err: MarketplaceError) -> Self {
        Self(err)
    }
}

impl From<crate::domain::foundation::DomainError> for MarketplaceApiError {
    fn from(err: crate::domain::foundation::DomainError) -> Self {
        Self(MarketplaceError::from(err))
    }
}

impl IntoResponse for MarketplaceApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code) = match &self.0 {
            MarketplaceError::ListingNotFound(_) => (StatusCode::NOT_FOUND, "LISTING_NOT_FOUND"),
            MarketplaceError::TransactionNotFound(_) => {
                (StatusCode::NOT_FOUND, "TRANSACTION_NOT_FOUND")
            }
            MarketplaceError::PaymentNotFound(_) => (StatusCode::NOT_FOUND, "PAYMENT_NOT_FOUND"),
            MarketplaceError::ListingNotAvailable { .. } => {
                (StatusCode::CONFLICT, "LISTING_NOT_AVAILABLE")
            }
            MarketplaceError::SelfPurchase(_) => (StatusCode::BAD_REQUEST, "SELF_PURCHASE"),
            MarketplaceError::GatewayFailed { .. } => (StatusCode::BAD_GATEWAY, "GATEWAY_FAILED"),
            MarketplaceError::InvalidState { .. } => {
                (StatusCode::CONFLICT, "INVALID_STATE_TRANSITION")
            }
            MarketplaceError::ValidationFailed { .. } => {
                (StatusCode::BAD_REQUEST, "VALIDATION_FAILED")
            }
            MarketplaceError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        // Use the error's built-in message() method for consistent messaging
        let message = self.0.message();
        let body = ErrorResponse::new(error_code, message);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::midtrans::MockPaymentGateway;
    use crate::domain::foundation::{DomainError, Timestamp, UniversityId};
    use crate::domain::marketplace::{
        compute_signature, Listing, ListingCategory, ListingCondition, OrderId, Payment,
        PaymentMethod, PaymentStatus, StatusOutcome, Transaction, TransactionStatus,
    };
    use crate::ports::{AppliedReconciliation, PaymentStatusView};
    use async_trait::async_trait;
    use axum::body::Bytes;
    use std::sync::Mutex;

    const SERVER_KEY: &str = "SB-Mid-server-testkey";

    // ════════════════════════════════════════════════════════════════════════════
    // Mock Implementations
    // ════════════════════════════════════════════════════════════════════════════

    struct MockPurchaseRepository {
        listing: Option<Listing>,
        known_order: Option<(OrderId, TransactionId)>,
        created: Mutex<Vec<(Transaction, Payment)>>,
    }

    impl MockPurchaseRepository {
        fn new() -> Self {
            Self {
                listing: None,
                known_order: None,
                created: Mutex::new(Vec::new()),
            }
        }

        fn with_listing(listing: Listing) -> Self {
            Self {
                listing: Some(listing),
                known_order: None,
                created: Mutex::new(Vec::new()),
            }
        }

        fn with_order(order_id: OrderId, transaction_id: TransactionId) -> Self {
            Self {
                listing: None,
                known_order: Some((order_id, transaction_id)),
                created: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PurchaseRepository for MockPurchaseRepository {
        async fn find_listing(&self, id: &ListingId) -> Result<Option<Listing>, DomainError> {
            Ok(self.listing.clone().filter(|l| &l.id == id))
        }

        async fn create_purchase(
            &self,
            transaction: &Transaction,
            payment: &Payment,
        ) -> Result<(), DomainError> {
            self.created
                .lock()
                .unwrap()
                .push((transaction.clone(), payment.clone()));
            Ok(())
        }

        async fn apply_outcome(
            &self,
            order_id: &OrderId,
            outcome: &StatusOutcome,
        ) -> Result<Option<AppliedReconciliation>, DomainError> {
            match &self.known_order {
                Some((known, transaction_id)) if known == order_id => {
                    Ok(Some(AppliedReconciliation {
                        transaction_id: *transaction_id,
                        payment_status: outcome.payment_status,
                        transaction_status: outcome.transaction_status,
                        listing_action: outcome.listing_action(),
                    }))
                }
                _ => Ok(None),
            }
        }
    }

    struct MockPaymentReader {
        view: Option<PaymentStatusView>,
    }

    impl MockPaymentReader {
        fn new() -> Self {
            Self { view: None }
        }

        fn with_view(view: PaymentStatusView) -> Self {
            Self { view: Some(view) }
        }
    }

    #[async_trait]
    impl PaymentReader for MockPaymentReader {
        async fn find_by_transaction(
            &self,
            transaction_id: &TransactionId,
        ) -> Result<Option<PaymentStatusView>, DomainError> {
            Ok(self
                .view
                .clone()
                .filter(|v| &v.transaction_id == transaction_id))
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Test Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn test_user_id() -> UserId {
        UserId::new("buyer-42").unwrap()
    }

    fn test_user() -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: test_user_id(),
        }
    }

    fn test_listing() -> Listing {
        Listing::new(
            ListingId::new(),
            UserId::new("seller-7").unwrap(),
            UniversityId::new(),
            "Calculus textbook",
            "Ninth edition, barely used",
            220_000,
            ListingCategory::Books,
            ListingCondition::LikeNew,
        )
        .unwrap()
    }

    fn test_state() -> MarketplaceAppState {
        MarketplaceAppState {
            purchase_repository: Arc::new(MockPurchaseRepository::new()),
            payment_reader: Arc::new(MockPaymentReader::new()),
            payment_gateway: Arc::new(MockPaymentGateway::new()),
            signature_verifier: SignatureVerifier::new(SERVER_KEY),
        }
    }

    fn signed_payload(order_id: &str, vendor_status: &str) -> Vec<u8> {
        let status_code = "200";
        let gross_amount = "220000.00";
        let sig = compute_signature(order_id, status_code, gross_amount, SERVER_KEY);
        format!(
            r#"{{
                "transaction_time": "2024-03-01 14:02:17",
                "transaction_status": "{vendor_status}",
                "transaction_id": "midtrans-uuid-1",
                "status_message": "midtrans transaction notification",
                "status_code": "{status_code}",
                "signature_key": "{sig}",
                "payment_type": "qris",
                "order_id": "{order_id}",
                "merchant_id": "G123456789",
                "gross_amount": "{gross_amount}"
            }}"#
        )
        .into_bytes()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Handler Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn initiate_purchase_returns_201() {
        let listing = test_listing();
        let listing_id = *listing.id.as_uuid();
        let state = MarketplaceAppState {
            purchase_repository: Arc::new(MockPurchaseRepository::with_listing(listing)),
            ..test_state()
        };
        let request = InitiatePurchaseRequest {
            listing_id,
            payment_method: PaymentMethod::Gateway,
        };

        let response = initiate_purchase(State(state), test_user(), Json(request))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn initiate_purchase_for_unknown_listing_returns_404() {
        let state = test_state();
        let request = InitiatePurchaseRequest {
            listing_id: Uuid::new_v4(),
            payment_method: PaymentMethod::Direct,
        };

        let response = initiate_purchase(State(state), test_user(), Json(request))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn initiate_purchase_own_listing_returns_400() {
        let mut listing = test_listing();
        listing.seller_id = test_user_id();
        let listing_id = *listing.id.as_uuid();
        let state = MarketplaceAppState {
            purchase_repository: Arc::new(MockPurchaseRepository::with_listing(listing)),
            ..test_state()
        };
        let request = InitiatePurchaseRequest {
            listing_id,
            payment_method: PaymentMethod::Direct,
        };

        let response = initiate_purchase(State(state), test_user(), Json(request))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn get_payment_status_returns_view() {
        let transaction_id = TransactionId::new();
        let view = PaymentStatusView {
            transaction_id,
            order_id: OrderId::for_transaction(&transaction_id),
            payment_status: PaymentStatus::Pending,
            transaction_status: TransactionStatus::Pending,
            amount: 220_000,
            updated_at: Timestamp::now(),
        };
        let state = MarketplaceAppState {
            payment_reader: Arc::new(MockPaymentReader::with_view(view)),
            ..test_state()
        };

        let result = get_payment_status(
            State(state),
            test_user(),
            Path(*transaction_id.as_uuid()),
        )
        .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn get_payment_status_for_unknown_transaction_returns_404() {
        let state = test_state();

        let response = get_payment_status(State(state), test_user(), Path(Uuid::new_v4()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Webhook Acknowledgement Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn webhook_settlement_returns_200_with_ack() {
        let transaction_id = TransactionId::new();
        let order_id = OrderId::for_transaction(&transaction_id);
        let state = MarketplaceAppState {
            purchase_repository: Arc::new(MockPurchaseRepository::with_order(
                order_id.clone(),
                transaction_id,
            )),
            ..test_state()
        };

        let payload = signed_payload(order_id.as_str(), "settlement");
        let response = handle_midtrans_webhook(State(state), Bytes::from(payload)).await;

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let ack: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(ack["success"], true);
        assert_eq!(ack["order_id"], order_id.as_str());
    }

    #[tokio::test]
    async fn webhook_tampered_payload_returns_401_without_signatures() {
        let state = test_state();

        // Alter the signed amount so the recomputed signature no longer matches.
        let payload = String::from_utf8(signed_payload("ORDER-x", "settlement"))
            .unwrap()
            .replace("220000.00", "1.00");
        let response = handle_midtrans_webhook(State(state), Bytes::from(payload)).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], br#"{"error":"Invalid signature"}"#);
    }

    #[tokio::test]
    async fn webhook_malformed_payload_returns_400() {
        let state = test_state();

        let response =
            handle_midtrans_webhook(State(state), Bytes::from_static(b"not json")).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn webhook_unknown_order_returns_500_for_redelivery() {
        let state = test_state();

        let payload = signed_payload("ORDER-unknown", "settlement");
        let response = handle_midtrans_webhook(State(state), Bytes::from(payload)).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Error Mapping Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn api_error_maps_listing_not_found_to_404() {
        let err = MarketplaceApiError(MarketplaceError::listing_not_found(ListingId::new()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn api_error_maps_transaction_not_found_to_404() {
        let err =
            MarketplaceApiError(MarketplaceError::transaction_not_found(TransactionId::new()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn api_error_maps_payment_not_found_to_404() {
        let err = MarketplaceApiError(MarketplaceError::payment_not_found(TransactionId::new()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn api_error_maps_listing_not_available_to_409() {
        let err = MarketplaceApiError(MarketplaceError::listing_not_available(
            ListingId::new(),
            "SOLD",
        ));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn api_error_maps_self_purchase_to_400() {
        let err = MarketplaceApiError(MarketplaceError::self_purchase(ListingId::new()));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn api_error_maps_gateway_failed_to_502() {
        let err = MarketplaceApiError(MarketplaceError::gateway_failed("connection refused"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn api_error_maps_invalid_state_to_409() {
        let err = MarketplaceApiError(MarketplaceError::invalid_state("SOLD", "hold"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn api_error_maps_validation_failed_to_400() {
        let err = MarketplaceApiError(MarketplaceError::validation("listing_id", "invalid"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn api_error_maps_infrastructure_to_500() {
        let err = MarketplaceApiError(MarketplaceError::infrastructure("Database error"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
