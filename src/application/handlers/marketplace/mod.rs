//! Marketplace handlers.
//!
//! Command and query handlers for the payment lifecycle:
//!
//! ## Commands
//! - Initiating a purchase (direct or gateway route)
//! - Reconciling gateway webhook notifications
//!
//! ## Queries
//! - Polling payment status for a transaction

mod get_payment_status;
mod initiate_purchase;
mod reconcile_webhook;

// Commands
pub use initiate_purchase::{
    InitiatePurchaseCommand, InitiatePurchaseHandler, InitiatePurchaseResult,
};
pub use reconcile_webhook::{
    ReconcileWebhookCommand, ReconcileWebhookHandler, ReconcileWebhookResult,
};

// Queries
pub use get_payment_status::{GetPaymentStatusHandler, GetPaymentStatusQuery};
