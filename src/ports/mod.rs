//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `PurchaseRepository` - Transactional units of work for the purchase lifecycle
//! - `PaymentReader` - Read-side payment status queries
//!
//! ## Gateway Ports
//!
//! - `PaymentGateway` - Hosted checkout session creation

mod payment_gateway;
mod payment_reader;
mod purchase_repository;

pub use payment_gateway::{
    CreateSnapTransactionRequest, GatewayError, GatewayErrorCode, PaymentGateway, SnapSession,
};
pub use payment_reader::{PaymentReader, PaymentStatusView};
pub use purchase_repository::{AppliedReconciliation, PurchaseRepository};
