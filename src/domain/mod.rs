//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `marketplace` - Listing, transaction, and payment lifecycle

pub mod foundation;
pub mod marketplace;
