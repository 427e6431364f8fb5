//! Store configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use keyledger_storage::DEFAULT_QUOTA_BYTES;

use crate::{Error, Result};

/// Slot key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "accounts";

/// Storage file name used when none is configured.
pub const DEFAULT_FILE_NAME: &str = "storage.json";

/// Where and how the account store persists its collection.
///
/// Every field is optional in the configuration file; missing ones take
/// their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Slot key holding the serialized collection.
    pub storage_key: String,
    /// Directory of the storage file.
    pub data_dir: PathBuf,
    /// Storage file name inside `data_dir`.
    pub file_name: String,
    /// Storage quota in bytes; `None` disables the limit.
    pub quota_bytes: Option<usize>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            data_dir: default_data_dir(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            quota_bytes: Some(DEFAULT_QUOTA_BYTES),
        }
    }
}

impl StoreConfig {
    /// Load configuration from a JSON file.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file is not valid configuration, or
    /// an I/O error if it exists but cannot be read.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Full path of the storage file.
    #[must_use]
    pub fn storage_path(&self) -> PathBuf {
        self.data_dir.join(&self.file_name)
    }

    fn validate(&self) -> Result<()> {
        if self.storage_key.is_empty() {
            return Err(Error::Config("storage_key must not be empty".to_string()));
        }
        if self.file_name.is_empty() {
            return Err(Error::Config("file_name must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Per-user data directory for keyledger.
fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("keyledger")
}
