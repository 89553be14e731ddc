//! HTTP adapter for marketplace purchase endpoints.
//!
//! Exposes the payment lifecycle via REST API:
//! - `POST /api/purchases` - Initiate a purchase of a listing
//! - `GET /api/purchases/:transaction_id/payment` - Poll the payment status
//! - `POST /api/webhooks/midtrans` - Handle Midtrans payment notifications

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{AuthenticatedUser, MarketplaceAppState};
pub use routes::{marketplace_router, purchase_routes, webhook_routes};
