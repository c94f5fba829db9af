//! Key-value storage scopes the ledger persists into.

use std::collections::HashMap;
use std::sync::RwLock;

/// Errors from a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The backing store cannot be reached at all (no window, disabled
    /// storage, missing directory permissions).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A read or write against an available store failed.
    #[error("storage I/O failed for key {key}: {reason}")]
    Io { key: String, reason: String },
}

/// A persistent scope of named text blobs.
///
/// Methods take `&self` so one scope can be shared by reference between
/// the store and any UI code that reads other keys. Implementations give
/// no isolation between concurrent read-modify-write sequences: the last
/// `set` wins.
pub trait StorageScope {
    /// Read a blob. `Ok(None)` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the blob stored under `key`.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a blob. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: StorageScope + ?Sized> StorageScope for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// In-memory scope, used by tests and as a fallback when no persistent
/// storage exists.
#[derive(Debug, Default)]
pub struct MemoryScope {
    blobs: RwLock<HashMap<String, String>>,
}

impl MemoryScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.blobs
            .read()
            .map(|blobs| blobs.contains_key(key))
            .unwrap_or(false)
    }

    fn poisoned(key: &str) -> StorageError {
        StorageError::Io {
            key: key.to_string(),
            reason: "lock poisoned".into(),
        }
    }
}

impl StorageScope for MemoryScope {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let blobs = self.blobs.read().map_err(|_| Self::poisoned(key))?;
        Ok(blobs.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut blobs = self.blobs.write().map_err(|_| Self::poisoned(key))?;
        blobs.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut blobs = self.blobs.write().map_err(|_| Self::poisoned(key))?;
        blobs.remove(key);
        Ok(())
    }
}

#[cfg(target_family = "wasm")]
pub use local::LocalStorageScope;

#[cfg(target_family = "wasm")]
mod local {
    use super::{StorageError, StorageScope};

    /// Browser `localStorage` for the current origin.
    pub struct LocalStorageScope {
        storage: web_sys::Storage,
    }

    impl LocalStorageScope {
        pub fn open() -> Result<Self, StorageError> {
            let window =
                web_sys::window().ok_or_else(|| StorageError::Unavailable("no window".into()))?;
            let storage = window
                .local_storage()
                .map_err(|e| StorageError::Unavailable(format!("{e:?}")))?
                .ok_or_else(|| StorageError::Unavailable("localStorage disabled".into()))?;
            Ok(Self { storage })
        }
    }

    fn io(key: &str, err: wasm_bindgen::JsValue) -> StorageError {
        StorageError::Io {
            key: key.to_string(),
            reason: format!("{err:?}"),
        }
    }

    impl StorageScope for LocalStorageScope {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.storage.get_item(key).map_err(|e| io(key, e))
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.storage.set_item(key, value).map_err(|e| io(key, e))
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.storage.remove_item(key).map_err(|e| io(key, e))
        }
    }
}
