//! Gateway notification schema.
//!
//! The shape of the JSON document the payment gateway POSTs to the
//! webhook endpoint. Parsing is strict about the vendor status
//! vocabulary: an unrecognized `transaction_status` fails
//! deserialization, so a new vendor status can never silently fall
//! through a default mapping arm. `fraud_status` is deliberately
//! tolerant because the mapping table routes every unrecognized fraud
//! value to the failure outcome.
//!
//! `status_code` and `gross_amount` are carried as strings exactly as
//! delivered: the payload signature is computed over their raw text.

use serde::Deserialize;

/// Vendor transaction status vocabulary (closed set).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VendorTransactionStatus {
    Capture,
    Settlement,
    Pending,
    Deny,
    Cancel,
    Expire,
    Refund,
    PartialRefund,
    Authorize,
}

impl VendorTransactionStatus {
    /// Returns the vendor wire spelling, for logs and acknowledgements.
    pub fn as_str(&self) -> &'static str {
        match self {
            VendorTransactionStatus::Capture => "capture",
            VendorTransactionStatus::Settlement => "settlement",
            VendorTransactionStatus::Pending => "pending",
            VendorTransactionStatus::Deny => "deny",
            VendorTransactionStatus::Cancel => "cancel",
            VendorTransactionStatus::Expire => "expire",
            VendorTransactionStatus::Refund => "refund",
            VendorTransactionStatus::PartialRefund => "partial_refund",
            VendorTransactionStatus::Authorize => "authorize",
        }
    }
}

/// Fraud screening verdict attached to card captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FraudStatus {
    Accept,
    Challenge,
    Deny,
    /// Any vendor value outside the documented set. Treated like Deny
    /// by the mapping table.
    #[serde(other)]
    Other,
}

/// One asynchronous status notification from the gateway.
///
/// Field names follow the vendor wire format.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayNotification {
    /// When the vendor recorded the transaction (vendor-local format).
    pub transaction_time: String,

    /// Vendor status driving the mapping table.
    pub transaction_status: VendorTransactionStatus,

    /// Vendor-side transaction identifier (opaque to us).
    pub transaction_id: String,

    /// Human-readable vendor status message.
    pub status_message: String,

    /// Vendor status code as raw text (signature input).
    pub status_code: String,

    /// SHA-512 payload signature supplied by the vendor.
    pub signature_key: String,

    /// Payment instrument, e.g. "qris" or "credit_card".
    pub payment_type: String,

    /// Echo of the order id we generated at initiation.
    pub order_id: String,

    /// Vendor merchant account identifier.
    pub merchant_id: String,

    /// Gross amount as raw text (signature input), e.g. "150000.00".
    pub gross_amount: String,

    /// Fraud screening verdict; only present for card captures.
    #[serde(default)]
    pub fraud_status: Option<FraudStatus>,

    /// ISO currency code, when the vendor includes it.
    #[serde(default)]
    pub currency: Option<String>,

    /// Settlement time, present once funds settle.
    #[serde(default)]
    pub settlement_time: Option<String>,

    /// Expiry deadline for the checkout session.
    #[serde(default)]
    pub expiry_time: Option<String>,
}
