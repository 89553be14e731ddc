//! Midtrans Snap API wire types.
//!
//! These types mirror the Snap transaction endpoint's JSON contract
//! exactly as it appears on the wire. They carry no domain logic; the
//! client converts between them and the gateway port's types.

use serde::{Deserialize, Serialize};

/// Request body for `POST /snap/v1/transactions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapTransactionRequest {
    /// Order reference and amount.
    pub transaction_details: SnapTransactionDetails,

    /// Line items shown on the checkout page.
    pub item_details: Vec<SnapItemDetail>,

    /// Buyer reference passed to the gateway.
    pub customer_details: SnapCustomerDetails,
}

/// Order reference and total amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapTransactionDetails {
    /// Gateway-visible order id (`ORDER-<transaction uuid>`).
    pub order_id: String,

    /// Total amount in whole rupiah.
    pub gross_amount: i64,
}

/// Single checkout line item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapItemDetail {
    /// Item reference (the listing id).
    pub id: String,

    /// Unit price in whole rupiah.
    pub price: i64,

    /// Quantity (always 1 for secondhand listings).
    pub quantity: u32,

    /// Item name shown to the buyer.
    pub name: String,
}

/// Buyer reference.
///
/// The platform identifies buyers internally, so only the opaque user
/// id is forwarded. No email or phone number leaves the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapCustomerDetails {
    /// Buyer's platform user id.
    pub first_name: String,
}

/// Successful response from the Snap transaction endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapTransactionResponse {
    /// Session token the client feeds to the Snap widget.
    pub token: String,

    /// Hosted checkout URL.
    pub redirect_url: String,
}

/// Error response from the Snap API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapErrorResponse {
    /// Human-readable error messages.
    #[serde(default)]
    pub error_messages: Vec<String>,
}

impl SnapErrorResponse {
    /// Join the vendor's error messages into a single line.
    pub fn message(&self) -> String {
        if self.error_messages.is_empty() {
            "unknown gateway error".to_string()
        } else {
            self.error_messages.join("; ")
        }
    }
}
