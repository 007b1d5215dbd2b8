use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::DurableStore;
use crate::error::StorageError;

/// Filesystem adapter: one file per key under a root directory. Writes go
/// to a temp file then rename, so a reader never observes a partial value.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl DurableStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::ReadFailed {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| write_err(key, e))?;
        }

        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value.as_bytes()).map_err(|e| write_err(key, e))?;
        fs::rename(&tmp, &path).map_err(|e| write_err(key, e))?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::RemoveFailed {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

fn write_err(key: &str, e: std::io::Error) -> StorageError {
    StorageError::WriteFailed {
        key: key.to_string(),
        reason: e.to_string(),
    }
}
