//! Midtrans gateway configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Midtrans gateway configuration
///
/// The server key authenticates Snap API calls and signs webhook
/// notifications; it is held as a [`SecretString`] so it never appears
/// in debug output. `is_production` selects between the live and
/// sandbox Snap environments.
#[derive(Debug, Clone, Deserialize)]
pub struct MidtransConfig {
    /// Server key (Basic auth for Snap, webhook signature secret)
    pub server_key: SecretString,

    /// Client key (embedded by the frontend Snap widget)
    pub client_key: String,

    /// Use the production Snap environment
    #[serde(default)]
    pub is_production: bool,
}

impl MidtransConfig {
    /// Validate Midtrans configuration
    ///
    /// Midtrans issues environment-scoped keys: production keys start
    /// with `Mid-server-`/`Mid-client-` and sandbox keys with
    /// `SB-Mid-server-`/`SB-Mid-client-`. Rejecting a mismatch here
    /// stops a sandbox key from silently signing production traffic.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let server_key = self.server_key.expose_secret();
        if server_key.is_empty() {
            return Err(ValidationError::MissingRequired("MIDTRANS_SERVER_KEY"));
        }
        if self.client_key.is_empty() {
            return Err(ValidationError::MissingRequired("MIDTRANS_CLIENT_KEY"));
        }

        let (server_prefix, client_prefix) = if self.is_production {
            ("Mid-server-", "Mid-client-")
        } else {
            ("SB-Mid-server-", "SB-Mid-client-")
        };
        if !server_key.starts_with(server_prefix) {
            return Err(ValidationError::InvalidMidtransServerKey);
        }
        if !self.client_key.starts_with(client_prefix) {
            return Err(ValidationError::InvalidMidtransClientKey);
        }

        Ok(())
    }
}

impl Default for MidtransConfig {
    fn default() -> Self {
        Self {
            server_key: SecretString::new(String::new()),
            client_key: String::new(),
            is_production: false,
        }
    }
}
