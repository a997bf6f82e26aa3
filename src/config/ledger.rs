//! Ledger settings loaded from config.toml
//!
//! Every field is optional in the file; anything left out falls back to the
//! defaults below. A missing config.toml is not an error.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Storage key the record collection is written under
pub const DEFAULT_STORAGE_KEY: &str = "billingRecords";
/// Currency symbol used for amounts
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";
/// Maximum number of records listed per `/bills` reply
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Ledger section
    #[serde(default)]
    pub ledger: LedgerSettings,
}

/// Runtime settings for the ledger and its display
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LedgerSettings {
    /// Key in the key-value store holding the JSON record array
    pub storage_key: String,
    /// Currency symbol prefixed to formatted amounts
    pub currency_symbol: String,
    /// Maximum rows shown in one listing
    pub page_size: usize,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Parses ledger configuration from TOML text.
///
/// # Errors
/// Returns an error if the TOML syntax is invalid or a field has the wrong type.
pub fn parse_config(contents: &str) -> Result<Config> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads ledger configuration from a TOML file, using defaults if the file is absent.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::info!(?path, "No config file found, using default ledger settings");
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;
    parse_config(&contents)
}

/// Loads ledger configuration from the default location (./config.toml)
pub fn load_default_config() -> Result<Config> {
    load_config("config.toml")
}
