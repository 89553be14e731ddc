//! Midtrans Snap API client.
//!
//! Implements the `PaymentGateway` port against the Snap hosted-checkout
//! endpoint (`POST /snap/v1/transactions`).
//!
//! # Security
//!
//! - The server key authenticates requests via HTTP Basic auth (key as
//!   username, empty password) and is handled via `secrecy::SecretString`
//! - The key never appears in logs or error messages
//!
//! # Configuration
//!
//! ```ignore
//! let config = SnapClientConfig::new(server_key, is_production);
//! let client = MidtransSnapClient::new(config);
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::ports::{CreateSnapTransactionRequest, GatewayError, PaymentGateway, SnapSession};

use super::snap_types::{
    SnapCustomerDetails, SnapErrorResponse, SnapItemDetail, SnapTransactionDetails,
    SnapTransactionRequest, SnapTransactionResponse,
};

/// Production Snap API base URL.
const PRODUCTION_BASE_URL: &str = "https://app.midtrans.com";

/// Sandbox Snap API base URL.
const SANDBOX_BASE_URL: &str = "https://app.sandbox.midtrans.com";

/// Snap API client configuration.
#[derive(Clone)]
pub struct SnapClientConfig {
    /// Midtrans server key (Mid-server-... or SB-Mid-server-...).
    server_key: SecretString,

    /// Base URL for the Snap API, selected by environment.
    api_base_url: String,
}

impl SnapClientConfig {
    /// Create a new Snap client configuration.
    ///
    /// `is_production` selects between the live and sandbox API hosts.
    pub fn new(server_key: impl Into<String>, is_production: bool) -> Self {
        let api_base_url = if is_production {
            PRODUCTION_BASE_URL
        } else {
            SANDBOX_BASE_URL
        };

        Self {
            server_key: SecretString::new(server_key.into()),
            api_base_url: api_base_url.to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

/// Midtrans Snap payment gateway client.
///
/// Implements `PaymentGateway` for hosted-checkout session creation.
pub struct MidtransSnapClient {
    config: SnapClientConfig,
    http_client: reqwest::Client,
}

impl MidtransSnapClient {
    /// Create a new Snap client with the given configuration.
    pub fn new(config: SnapClientConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Build the Snap request body from a port-level request.
    fn build_body(request: &CreateSnapTransactionRequest) -> SnapTransactionRequest {
        SnapTransactionRequest {
            transaction_details: SnapTransactionDetails {
                order_id: request.order_id.as_str().to_string(),
                gross_amount: request.gross_amount,
            },
            item_details: vec![SnapItemDetail {
                id: request.listing_id.to_string(),
                price: request.gross_amount,
                quantity: 1,
                name: request.item_name.clone(),
            }],
            customer_details: SnapCustomerDetails {
                first_name: request.buyer_id.to_string(),
            },
        }
    }

    /// Map a non-success HTTP status onto a gateway error.
    fn classify_rejection(status: reqwest::StatusCode, message: String) -> GatewayError {
        let provider_code = status.as_u16().to_string();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            GatewayError::authentication(message).with_provider_code(provider_code)
        } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            GatewayError::new(crate::ports::GatewayErrorCode::RateLimited, message)
                .with_provider_code(provider_code)
        } else if status.is_client_error() {
            GatewayError::invalid_request(message).with_provider_code(provider_code)
        } else {
            GatewayError::provider(message).with_provider_code(provider_code)
        }
    }
}

#[async_trait]
impl PaymentGateway for MidtransSnapClient {
    async fn create_transaction(
        &self,
        request: CreateSnapTransactionRequest,
    ) -> Result<SnapSession, GatewayError> {
        let url = format!("{}/snap/v1/transactions", self.config.api_base_url);
        let body = Self::build_body(&request);
        let started = std::time::Instant::now();

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.server_key.expose_secret(), Option::<&str>::None)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(
                    order_id = %request.order_id,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    error = %e,
                    "Snap transaction request failed"
                );
                GatewayError::network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<SnapErrorResponse>(&error_text)
                .map(|e| e.message())
                .unwrap_or(error_text);

            tracing::error!(
                order_id = %request.order_id,
                status = %status,
                elapsed_ms = started.elapsed().as_millis() as u64,
                error = %message,
                "Snap transaction creation rejected"
            );

            return Err(Self::classify_rejection(status, message));
        }

        let snap: SnapTransactionResponse = response.json().await.map_err(|e| {
            GatewayError::provider(format!("Failed to parse Snap response: {}", e))
        })?;

        tracing::info!(
            order_id = %request.order_id,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Snap transaction created"
        );

        Ok(SnapSession {
            token: snap.token,
            redirect_url: snap.redirect_url,
        })
    }
}
