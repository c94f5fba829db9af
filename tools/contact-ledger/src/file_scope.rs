//! Storage scope backed by a directory of text files, one per key.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use contact_ledger_common::{StorageError, StorageScope};

/// Each key `k` lives at `<dir>/k.json`. Writes go to a temporary file
/// and are renamed into place, so a crash never leaves a half-written
/// blob behind.
#[derive(Debug, Clone)]
pub struct FileScope {
    dir: PathBuf,
}

impl FileScope {
    /// Open (and create if needed) the scope directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            StorageError::Unavailable(format!("cannot create {}: {e}", dir.display()))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(io_error(key, "key must be alphanumeric"));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn io_error(key: &str, reason: impl ToString) -> StorageError {
    StorageError::Io {
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

impl StorageScope for FileScope {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        fs::write(&tmp, value).map_err(|e| io_error(key, e))?;
        fs::rename(&tmp, &path).map_err(|e| io_error(key, e))?;
        tracing::trace!(key, bytes = value.len(), "wrote blob");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key, e)),
        }
    }
}
