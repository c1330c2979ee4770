//! Configuration management
//!
//! Settings live in `settings.json` inside the bank directory:
//! ```json
//! {
//!   "app": {
//!     "currencySymbol": "₱",
//!     "historyLimit": 200,
//!     "auditLimit": 200,
//!     "passwordHashing": { "memoryCost": 19456, "timeCost": 2, "parallelism": 1 }
//!   }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::result::Error;

/// Default number of rows returned by history and audit listings
pub const DEFAULT_LIST_LIMIT: usize = 200;

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    currency_symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    history_limit: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    audit_limit: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    password_hashing: Option<PasswordHashing>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Argon2id cost parameters for customer and staff passwords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordHashing {
    /// Memory cost in KiB
    pub memory_cost: u32,
    pub time_cost: u32,
    pub parallelism: u32,
}

impl Default for PasswordHashing {
    fn default() -> Self {
        // argon2 crate defaults (OWASP minimum for Argon2id)
        Self {
            memory_cost: 19456,
            time_cost: 2,
            parallelism: 1,
        }
    }
}

/// Banko configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub currency_symbol: String,
    pub history_limit: usize,
    pub audit_limit: usize,
    pub password_hashing: PasswordHashing,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: "₱".to_string(),
            history_limit: DEFAULT_LIST_LIMIT,
            audit_limit: DEFAULT_LIST_LIMIT,
            password_hashing: PasswordHashing::default(),
            _raw_settings: SettingsFile::default(),
        }
    }
}

impl Config {
    /// Load config from the bank directory
    ///
    /// The history limit can be overridden with BANKO_HISTORY_LIMIT.
    pub fn load(bank_dir: &Path) -> Result<Self> {
        let settings_path = bank_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)
                .with_context(|| format!("Failed to read {}", settings_path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Invalid settings file {}", settings_path.display()))?
        } else {
            SettingsFile::default()
        };

        let defaults = Config::default();

        let history_limit = match std::env::var("BANKO_HISTORY_LIMIT").ok() {
            Some(value) => parse_history_limit(&value)?,
            None => raw.app.history_limit.unwrap_or(defaults.history_limit),
        };

        Ok(Self {
            currency_symbol: raw
                .app
                .currency_symbol
                .clone()
                .unwrap_or(defaults.currency_symbol),
            history_limit,
            audit_limit: raw.app.audit_limit.unwrap_or(defaults.audit_limit),
            password_hashing: raw.app.password_hashing.unwrap_or_default(),
            _raw_settings: raw,
        })
    }

    /// Save config to the bank directory
    /// Preserves other settings that banko doesn't manage
    pub fn save(&self, bank_dir: &Path) -> Result<()> {
        let settings_path = bank_dir.join("settings.json");

        let mut settings = self._raw_settings.clone();
        settings.app.currency_symbol = Some(self.currency_symbol.clone());
        settings.app.history_limit = Some(self.history_limit);
        settings.app.audit_limit = Some(self.audit_limit);
        settings.app.password_hashing = Some(self.password_hashing);

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }
}

/// Parse a BANKO_HISTORY_LIMIT value: a positive row count
fn parse_history_limit(value: &str) -> std::result::Result<usize, Error> {
    match value.trim().parse::<usize>() {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => Err(Error::Config(format!(
            "BANKO_HISTORY_LIMIT must be a positive number, got {:?}",
            value
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_settings_file() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.currency_symbol, "₱");
        assert_eq!(config.audit_limit, DEFAULT_LIST_LIMIT);
        assert_eq!(config.password_hashing, PasswordHashing::default());
    }

    #[test]
    fn test_reads_app_settings() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"app": {"currencySymbol": "$", "auditLimit": 25,
                "passwordHashing": {"memoryCost": 1024, "timeCost": 1, "parallelism": 1}}}"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.audit_limit, 25);
        assert_eq!(config.password_hashing.memory_cost, 1024);
    }

    #[test]
    fn test_save_preserves_unmanaged_keys() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"app": {"theme": "dark"}, "branch": {"code": "MNL-01"}}"#,
        )
        .unwrap();

        let mut config = Config::load(dir.path()).unwrap();
        config.currency_symbol = "€".to_string();
        config.save(dir.path()).unwrap();

        let saved: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("settings.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(saved["app"]["theme"], "dark");
        assert_eq!(saved["app"]["currencySymbol"], "€");
        assert_eq!(saved["branch"]["code"], "MNL-01");
    }

    #[test]
    fn test_history_limit_override_parsing() {
        assert_eq!(parse_history_limit(" 50 ").unwrap(), 50);
        for bad in ["0", "-3", "lots", ""] {
            assert!(matches!(parse_history_limit(bad), Err(Error::Config(_))));
        }
    }

    #[test]
    fn test_invalid_settings_file_is_an_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{not json").unwrap();
        assert!(Config::load(dir.path()).is_err());
    }
}
