//! HTTP adapters - REST API implementations.
//!
//! Each domain module has its own HTTP adapter for endpoint exposure.

pub mod marketplace;

// Re-export key types for convenience
pub use marketplace::marketplace_router;
pub use marketplace::MarketplaceAppState;
