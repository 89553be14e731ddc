//! Typed application configuration.
//!
//! Settings come from the process environment (with `.env` support in
//! development) via the `config` and `dotenvy` crates. Every variable is
//! prefixed with `UNITHRIFT` and nested fields are addressed with double
//! underscores, e.g. `UNITHRIFT__MIDTRANS__SERVER_KEY`.
//!
//! ```no_run
//! use unithrift::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Listening on {}", config.server.bind_addr());
//! ```

mod database;
mod error;
mod midtrans;
mod server;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use midtrans::MidtransConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root configuration for the payment core.
///
/// The `server` section falls back to defaults when absent; `database`
/// and `midtrans` must be provided.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// HTTP listener and runtime environment.
    #[serde(default)]
    pub server: ServerConfig,

    /// PostgreSQL pool.
    pub database: DatabaseConfig,

    /// Midtrans Snap credentials and environment selection.
    pub midtrans: MidtransConfig,
}

impl AppConfig {
    /// Read configuration from the environment.
    ///
    /// A `.env` file in the working directory is merged in first when
    /// present, so local development does not need exported variables.
    /// Missing required sections or unparseable values surface as
    /// [`ConfigError::LoadError`].
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("UNITHRIFT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Run the per-section semantic checks.
    ///
    /// Loading only proves the values parse; this proves they make sense
    /// together: URL schemes, pool bounds, and Midtrans key prefixes
    /// against the selected gateway environment.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.midtrans.validate()?;
        Ok(())
    }

    /// True in the `production` environment.
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
