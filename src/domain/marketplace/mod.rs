//! Marketplace domain module.
//!
//! Handles the payment lifecycle of secondhand listings: purchase
//! initiation, gateway webhook reconciliation, and payment status.
//!
//! # Module Structure
//!
//! - `listing` - Listing aggregate and its availability state machine
//! - `transaction` - Transaction aggregate and payment method
//! - `payment` - Payment aggregate and gateway order id
//! - `notification` - Wire format of gateway webhook notifications
//! - `status_mapping` - Vendor status to domain status mapping table
//! - `signature` - SHA-512 webhook signature verification
//! - `errors` - Marketplace error types
//! - `webhook_errors` - Webhook-specific errors with HTTP semantics

mod errors;
mod listing;
mod notification;
mod payment;
mod signature;
mod status_mapping;
mod transaction;
mod webhook_errors;

pub use errors::MarketplaceError;
pub use listing::{Listing, ListingCategory, ListingCondition, ListingStatus, MAX_LISTING_PRICE};
pub use notification::{FraudStatus, GatewayNotification, VendorTransactionStatus};
pub use payment::{OrderId, Payment, PaymentStatus, ORDER_ID_PREFIX};
pub use signature::{compute_signature, SignatureVerifier};
pub use status_mapping::{map_vendor_status, ListingAction, StatusOutcome};
pub use transaction::{PaymentMethod, Transaction, TransactionStatus};
pub use webhook_errors::WebhookError;
