use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{StorageBackend, StorageError};

/// File-per-key backend: each key maps to one file under a root directory.
///
/// Writes go through a temp file in the same directory and are persisted with
/// a rename, so readers never observe a partially-written blob. Concurrent
/// writers still race at whole-value granularity (last write wins).
#[derive(Debug)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Open (creating if needed) a storage root.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| StorageError::Write {
            key: root.display().to_string(),
            reason: format!("failed to create storage root: {e}"),
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() {
            return Err(StorageError::InvalidKey {
                key: key.to_string(),
                reason: "empty".to_string(),
            });
        }
        let safe = key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
        if !safe || key.starts_with('.') {
            return Err(StorageError::InvalidKey {
                key: key.to_string(),
                reason: "keys are limited to alphanumerics, `-`, `_`, and `.`".to_string(),
            });
        }
        Ok(self.root.join(key))
    }
}

impl StorageBackend for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Read {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.key_path(key)?;
        let write_error = |reason: String| StorageError::Write {
            key: key.to_string(),
            reason,
        };

        let temp = tempfile::NamedTempFile::new_in(&self.root)
            .map_err(|e| write_error(format!("failed to create temp file: {e}")))?;
        fs::write(temp.path(), value)
            .map_err(|e| write_error(format!("failed to write temp file: {e}")))?;
        temp.persist(&path)
            .map_err(|e| write_error(format!("failed to persist {}: {e}", path.display())))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.key_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Remove {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}
