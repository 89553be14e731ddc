//! HTTP listener and runtime environment settings.

use serde::Deserialize;

use super::error::ValidationError;

/// Settings for the HTTP listener and runtime environment.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind, all interfaces unless overridden.
    #[serde(default = "default_bind_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_bind_port")]
    pub port: u16,

    /// Deployment environment; production switches log output to JSON.
    #[serde(default)]
    pub environment: Environment,

    /// Tracing filter applied when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_level: String,

    /// Per-request deadline enforced by the timeout layer, in seconds.
    #[serde(default = "default_request_deadline")]
    pub request_timeout_secs: u64,

    /// Comma-separated list of allowed CORS origins.
    pub cors_origins: Option<String>,
}

/// Deployment environment.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl ServerConfig {
    /// Address string for the TCP listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// True in the `production` environment.
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Split `cors_origins` into trimmed entries, dropping empty ones.
    pub fn cors_origins_list(&self) -> Vec<String> {
        match self.cors_origins.as_deref() {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(String::from)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Reject settings the server cannot start with.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if !(1..=300).contains(&self.request_timeout_secs) {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_bind_host(),
            port: default_bind_port(),
            environment: Environment::default(),
            log_level: default_log_filter(),
            request_timeout_secs: default_request_deadline(),
            cors_origins: None,
        }
    }
}

fn default_bind_host() -> String {
    "0.0.0.0".to_string()
}

fn default_bind_port() -> u16 {
    8080
}

fn default_log_filter() -> String {
    "info,unithrift=debug,sqlx=warn".to_string()
}

fn default_request_deadline() -> u64 {
    30
}
