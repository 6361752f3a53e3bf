//! Local storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where the device keeps its session list
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one document per storage key
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Key of the session list document
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

impl StorageConfig {
    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE__DATA_DIR"));
        }
        if self.storage_key.is_empty() {
            return Err(ValidationError::MissingRequired("STORAGE__STORAGE_KEY"));
        }
        let valid = !self.storage_key.starts_with('.')
            && self
                .storage_key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !valid {
            return Err(ValidationError::InvalidStorageKey);
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            storage_key: default_storage_key(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_storage_key() -> String {
    crate::adapters::local::DEFAULT_STORAGE_KEY.to_string()
}
