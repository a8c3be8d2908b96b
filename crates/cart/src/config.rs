//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `GOMARKET_STORAGE_KEY` - Key the serialized cart is stored under
//!   (default: `cart:lineitems:v1`)
//! - `GOMARKET_DATA_DIR` - Base directory for the JSON-file backend
//!   (default: `./data`)
//! - `GOMARKET_DATABASE_URL` - `PostgreSQL` connection string for the
//!   `postgres` backend (only read when that backend is used)

use std::env;
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;

/// Default key the serialized cart list is stored under.
pub const DEFAULT_STORAGE_KEY: &str = "cart:lineitems:v1";

/// Default base directory for the JSON-file backend.
pub const DEFAULT_DATA_DIR: &str = "./data";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart store configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Key the full serialized cart is stored under.
    pub storage_key: String,
    /// Base directory for the JSON-file backend.
    pub data_dir: PathBuf,
    /// `PostgreSQL` connection string (contains password), if configured.
    pub database_url: Option<SecretString>,
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// All variables are optional; missing ones fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] if a variable is present but
    /// not valid UTF-8.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            storage_key: optional_var("GOMARKET_STORAGE_KEY")?
                .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_owned()),
            data_dir: optional_var("GOMARKET_DATA_DIR")?
                .map_or_else(|| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from),
            database_url: optional_var("GOMARKET_DATABASE_URL")?.map(SecretString::from),
        })
    }
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            database_url: None,
        }
    }
}

/// Read an optional environment variable.
fn optional_var(name: &str) -> Result<Option<String>, ConfigError> {
    match env::var(name) {
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ConfigError::InvalidEnvVar(
            name.to_owned(),
            "not valid UTF-8".to_owned(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_versioned_key() {
        let config = CartConfig::default();
        assert_eq!(config.storage_key, "cart:lineitems:v1");
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert!(config.database_url.is_none());
    }

    #[test]
    #[allow(unsafe_code)] // env::set_var is unsafe in edition 2024
    fn from_env_overrides_take_precedence() {
        unsafe {
            env::set_var("GOMARKET_STORAGE_KEY", "cart:staging:v1");
            env::set_var("GOMARKET_DATA_DIR", "/var/lib/gomarket");
            env::set_var("GOMARKET_DATABASE_URL", "postgres://cart@localhost/cart");
        }

        let config = CartConfig::from_env().expect("load config");
        assert_eq!(config.storage_key, "cart:staging:v1");
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/gomarket"));
        assert!(config.database_url.is_some());

        unsafe {
            env::remove_var("GOMARKET_STORAGE_KEY");
            env::remove_var("GOMARKET_DATA_DIR");
            env::remove_var("GOMARKET_DATABASE_URL");
        }

        let config = CartConfig::from_env().expect("load config");
        assert_eq!(config.storage_key, DEFAULT_STORAGE_KEY);
    }
}
