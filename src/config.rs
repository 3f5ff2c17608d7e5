//! Console configuration
//!
//! Loaded from a JSON file; every field has a default so a partial (or
//! missing) file is fine.

use crate::ledger::Environment;
use crate::multisig::CollectionMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Ledgers a transaction stays valid for after it is built
pub const DEFAULT_VALIDITY_WINDOW: u32 = 20;

/// File name of the persisted signer store inside the data directory
pub const STORE_FILE: &str = "signers.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Validity window must be at least 1 ledger")]
    ZeroValidityWindow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ConsoleConfig {
    pub environment: Environment,
    /// Added to the last validated ledger index to form `LastLedgerSequence`
    pub validity_window: u32,
    pub collection_mode: CollectionMode,
    pub store_path: PathBuf,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            validity_window: DEFAULT_VALIDITY_WINDOW,
            collection_mode: CollectionMode::default(),
            store_path: PathBuf::from("data").join(STORE_FILE),
        }
    }
}

impl ConsoleConfig {
    /// Read `path`, falling back to defaults when it does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let data = fs::read_to_string(path)?;
        let config: ConsoleConfig = serde_json::from_str(&data)?;
        config.check()?;

        log::info!("Loaded config from {:?} ({})", path, config.environment);
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Place the signer store inside `data_dir`
    pub fn with_data_dir(mut self, data_dir: &Path) -> Self {
        self.store_path = data_dir.join(STORE_FILE);
        self
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.validity_window == 0 {
            return Err(ConfigError::ZeroValidityWindow);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = ConsoleConfig::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, ConsoleConfig::default());
        assert_eq!(config.validity_window, 20);
        assert_eq!(config.environment, Environment::Testnet);
    }

    #[test]
    fn test_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "environment": "devnet", "collection_mode": "sequential" }"#,
        )
        .unwrap();

        let config = ConsoleConfig::load(&path).unwrap();
        assert_eq!(config.environment, Environment::Devnet);
        assert_eq!(config.collection_mode, CollectionMode::Sequential);
        assert_eq!(config.validity_window, DEFAULT_VALIDITY_WINDOW);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = ConsoleConfig {
            validity_window: 5,
            ..Default::default()
        }
        .with_data_dir(dir.path());

        config.save(&path).unwrap();
        assert_eq!(ConsoleConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_rejects_bad_input() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");

        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(ConsoleConfig::load(&path), Err(ConfigError::Parse(_))));

        fs::write(&path, r#"{ "validity_window": 0 }"#).unwrap();
        assert!(matches!(
            ConsoleConfig::load(&path),
            Err(ConfigError::ZeroValidityWindow)
        ));
    }
}
