//! Application configuration schemas.
//!
//! All configuration structs are deserialized via the `config` crate from an
//! optional TOML file merged with `VAULT__`-prefixed environment variables.
//! Each sub-module represents a logical configuration section.

pub mod cache;
pub mod logging;
pub mod storage;

use serde::{Deserialize, Serialize};

pub use self::cache::{CacheConfig, MemoryCacheConfig};
pub use self::logging::LoggingConfig;
pub use self::storage::StorageConfig;

use crate::error::AppError;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version and backup storage settings.
    #[serde(default)]
    pub storage: StorageConfig,
    /// History cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from an optional TOML file.
    ///
    /// The file (when given) must exist. It is merged with environment
    /// variables prefixed with `VAULT`, using `__` as the section separator,
    /// e.g. `VAULT__STORAGE__MAX_VERSIONS_PER_ARTIFACT=5`.
    pub fn load(path: Option<&str>) -> Result<Self, AppError> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("VAULT")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let app: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        app.validate()?;
        tracing::debug!(path = ?path, "Loaded configuration");
        Ok(app)
    }

    /// Reject settings the vault cannot operate with.
    pub fn validate(&self) -> Result<(), AppError> {
        self.storage.validate()?;
        self.cache.validate()
    }
}
