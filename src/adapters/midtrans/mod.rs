//! Midtrans payment gateway adapter.
//!
//! Implements the `PaymentGateway` port for Midtrans Snap hosted
//! checkout, including:
//! - Snap transaction (checkout session) creation
//! - Sandbox/production host selection
//! - A configurable mock for tests
//!
//! # Security
//!
//! - The server key authenticates API calls via HTTP Basic auth and is
//!   handled via `secrecy::SecretString`
//! - Webhook signature verification lives in the domain layer, not
//!   here: notifications are authenticated by payload signature, so the
//!   check belongs with the mapping logic it protects
//!
//! # Configuration
//!
//! Required environment variables:
//! - `UNITHRIFT__MIDTRANS__SERVER_KEY`: Midtrans server key
//! - `UNITHRIFT__MIDTRANS__IS_PRODUCTION`: selects live vs sandbox host

mod mock_gateway;
mod snap_client;
mod snap_types;

pub use mock_gateway::MockPaymentGateway;
pub use snap_client::{MidtransSnapClient, SnapClientConfig};
pub use snap_types::{
    SnapCustomerDetails, SnapErrorResponse, SnapItemDetail, SnapTransactionDetails,
    SnapTransactionRequest, SnapTransactionResponse,
};
