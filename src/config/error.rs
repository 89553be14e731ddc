//! Error types for configuration loading and validation.

use thiserror::Error;

/// Failure while assembling the application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Configuration rejected: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// A setting that fails validation before startup.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required setting: {0}")]
    MissingRequired(&'static str),

    #[error("Server port must be non-zero")]
    InvalidPort,

    #[error("Request timeout must be between 1 and 300 seconds")]
    InvalidTimeout,

    #[error("Database URL must use the postgres:// or postgresql:// scheme")]
    InvalidDatabaseUrl,

    #[error("min_connections cannot exceed max_connections")]
    InvalidPoolSize,

    #[error("max_connections cannot exceed 100")]
    PoolSizeTooLarge,

    #[error("Midtrans server key does not match the selected environment")]
    InvalidMidtransServerKey,

    #[error("Midtrans client key does not match the selected environment")]
    InvalidMidtransClientKey,
}
