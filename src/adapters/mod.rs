//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - Axum REST API exposing the purchase lifecycle
//! - `midtrans` - Midtrans Snap payment gateway client
//! - `postgres` - PostgreSQL persistence for listings, transactions, and payments

pub mod http;
pub mod midtrans;
pub mod postgres;

pub use midtrans::{MidtransSnapClient, MockPaymentGateway, SnapClientConfig};
pub use postgres::{PostgresPaymentReader, PostgresPurchaseRepository};
