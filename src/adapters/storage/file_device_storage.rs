//! File-based Device Storage Adapter
//!
//! Stores each key as one JSON file under a base directory. Writes go to a
//! temporary sibling first and are renamed into place, so a crash mid-write
//! never leaves a truncated document behind.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::ports::{DeviceStorage, StorageError};

/// File-backed document storage.
#[derive(Debug, Clone)]
pub struct FileDeviceStorage {
    base_path: PathBuf,
}

impl FileDeviceStorage {
    /// Create a new file storage rooted at `base_path`.
    ///
    /// The directory is created on first write.
    ///
    /// # Example
    /// ```ignore
    /// let storage = FileDeviceStorage::new("./data");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    /// Path of the document stored under `key`.
    pub fn file_path(&self, key: &str) -> PathBuf {
        self.base_path.join(format!("{}.json", key))
    }

    fn check_key(key: &str) -> Result<(), StorageError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if valid {
            Ok(())
        } else {
            Err(StorageError::Io(format!("invalid storage key '{}'", key)))
        }
    }
}

impl DeviceStorage for FileDeviceStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::check_key(key)?;
        match fs::read_to_string(self.file_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::check_key(key)?;
        fs::create_dir_all(&self.base_path)?;

        let target = self.file_path(key);
        let temp = self.base_path.join(format!("{}.json.tmp", key));
        fs::write(&temp, value)?;
        fs::rename(&temp, &target)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_key_reads_as_none() {
        let dir = tempdir().unwrap();
        let storage = FileDeviceStorage::new(dir.path());
        assert_eq!(storage.read("core-framework-sessions").unwrap(), None);
    }

    #[test]
    fn write_then_read_returns_document() {
        let dir = tempdir().unwrap();
        let storage = FileDeviceStorage::new(dir.path().join("nested"));

        storage.write("core-framework-sessions", "[1]").unwrap();
        storage.write("core-framework-sessions", "[2]").unwrap();

        assert_eq!(
            storage.read("core-framework-sessions").unwrap().as_deref(),
            Some("[2]")
        );
        assert!(!dir.path().join("nested/core-framework-sessions.json.tmp").exists());
    }

    #[test]
    fn rejects_keys_that_escape_the_directory() {
        let dir = tempdir().unwrap();
        let storage = FileDeviceStorage::new(dir.path());
        assert!(matches!(storage.write("../evil", "x"), Err(StorageError::Io(_))));
        assert!(matches!(storage.read(""), Err(StorageError::Io(_))));
    }
}
