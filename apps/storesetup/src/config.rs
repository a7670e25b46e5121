//! # Application Configuration
//!
//! Optional TOML file (default `storesetup.toml`):
//!
//! ```toml
//! database = "shop.redb"
//!
//! [[wizard.steps]]
//! kind = "address"
//!
//! [[wizard.steps]]
//! kind = "products"
//!
//! [[wizard.steps]]
//! kind = "config_flag"
//! key = "store.legal_terms"
//! label = "Legal terms"
//! ```
//!
//! A missing file yields the defaults. Command-line flags override the file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use storesetup_core::{StoreSetupError, WizardPlan};

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "storesetup.toml";

/// Database used when neither the config file nor `--database` names one.
pub const DEFAULT_DATABASE_PATH: &str = "storesetup.redb";

/// Maximum config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Path of the redb catalog database.
    pub database: PathBuf,
    /// Wizard steps, in evaluation order.
    pub wizard: WizardPlan,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE_PATH),
            wizard: WizardPlan::default(),
        }
    }
}

impl AppConfig {
    /// Load the config file, falling back to defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self, StoreSetupError> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let metadata = std::fs::metadata(path)
            .map_err(|e| StoreSetupError::IoError(format!("Cannot read config metadata: {}", e)))?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(StoreSetupError::InvalidInput(format!(
                "Config file {} exceeds {} bytes",
                path.display(),
                MAX_CONFIG_FILE_SIZE
            )));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| StoreSetupError::IoError(format!("Read config: {}", e)))?;
        let config = Self::from_toml_str(&content)?;
        tracing::info!(
            "Loaded config from {} ({} wizard steps)",
            path.display(),
            config.wizard.steps.len()
        );
        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self, StoreSetupError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| StoreSetupError::SerializationError(format!("Config: {}", e)))?;
        config.wizard.validate()?;
        Ok(config)
    }
}
