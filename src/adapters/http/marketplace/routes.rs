//! Axum router configuration for marketplace purchase endpoints.
//!
//! This module defines the route structure for purchase-related API endpoints
//! and wires them to their corresponding handlers.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    get_payment_status, handle_midtrans_webhook, initiate_purchase, MarketplaceAppState,
};

/// Create the purchase API router.
///
/// # Routes
///
/// ## User Endpoints (require authentication)
/// - `POST /` - Initiate a purchase of a listing
/// - `GET /:transaction_id/payment` - Poll the payment status
pub fn purchase_routes() -> Router<MarketplaceAppState> {
    Router::new()
        .route("/", post(initiate_purchase))
        .route("/:transaction_id/payment", get(get_payment_status))
}

/// Create the Midtrans webhook router.
///
/// This is separate from the purchase routes because webhooks don't
/// require user authentication (they're verified via signature).
///
/// # Routes
/// - `POST /midtrans` - Handle Midtrans payment notifications
pub fn webhook_routes() -> Router<MarketplaceAppState> {
    Router::new().route("/midtrans", post(handle_midtrans_webhook))
}

/// Create the complete marketplace module router.
///
/// Combines purchase routes and webhook routes into a single router
/// suitable for mounting at `/api`.
///
/// # Example
///
/// ```ignore
/// use axum::Router;
/// use crate::adapters::http::marketplace::{marketplace_router, MarketplaceAppState};
///
/// let app_state = MarketplaceAppState { /* ... */ };
/// let app = Router::new()
///     .nest("/api", marketplace_router())
///     .with_state(app_state);
/// ```
pub fn marketplace_router() -> Router<MarketplaceAppState> {
    Router::new()
        .nest("/purchases", purchase_routes())
        .nest("/webhooks", webhook_routes())
}
