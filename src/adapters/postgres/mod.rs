//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresPurchaseRepository` - Purchase creation and webhook reconciliation
//! - `PostgresPaymentReader` - Read-optimized payment status queries

mod payment_reader;
mod purchase_repository;

pub use payment_reader::PostgresPaymentReader;
pub use purchase_repository::PostgresPurchaseRepository;
