//! File-backed shared store: one file per key in the group directory.

use std::path::PathBuf;

use super::{data_dir, KeyValueStore, GROUP_ID};
use crate::error::StoreError;

/// Shared store backed by one file per key.
///
/// Writes go to a temp file in the same directory followed by a rename,
/// so readers in the widget process see either the previous blob or the
/// new one in full.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open the store in the shared group directory.
    ///
    /// # Errors
    /// Returns an error if the group directory cannot be created.
    pub fn open() -> Result<Self, StoreError> {
        Self::open_at(data_dir()?.join(GROUP_ID))
    }

    /// Open the store rooted at an explicit directory.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn open_at(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| StoreError::CreateDir {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        std::fs::read(self.path_for(key)).ok()
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        let tmp = self.dir.join(format!(".{key}.tmp"));
        let write_failed = |source| StoreError::WriteFailed {
            key: key.to_string(),
            source,
        };
        std::fs::write(&tmp, value).map_err(write_failed)?;
        // Rename is atomic within one filesystem; readers never see a
        // partially written blob.
        std::fs::rename(&tmp, self.path_for(key)).map_err(write_failed)?;
        Ok(())
    }
}
