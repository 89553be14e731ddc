//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, enums, and error types
//! that form the vocabulary of the Unithrift domain.

mod ids;
mod timestamp;
mod state_machine;
mod errors;

pub use ids::{ListingId, PaymentId, TransactionId, UniversityId, UserId};
pub use timestamp::Timestamp;
pub use state_machine::StateMachine;
pub use errors::{DomainError, ErrorCode, ValidationError};
