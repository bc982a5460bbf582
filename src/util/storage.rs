//! Durable key/value storage for session and redirect state.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser build persists through `window.localStorage`; SSR and tests use
//! an in-memory map with the same interface so the auth store never touches
//! web-sys glue directly.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("storage is unavailable")]
    Unavailable,
    #[error("storage operation on '{key}' failed: {reason}")]
    Operation { key: String, reason: String },
    #[error("value for '{key}' could not be serialized: {reason}")]
    Serialize { key: String, reason: String },
}

/// A string-keyed, string-valued durable store.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value for `key`, `Ok(None)` when absent.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Shared handle to whichever storage medium the current build has.
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Serialize `value` as JSON text under `key`.
pub fn save_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|e| StorageError::Serialize {
        key: key.to_owned(),
        reason: e.to_string(),
    })?;
    store.set(key, &raw)
}

/// Load and deserialize the JSON value under `key`.
///
/// Parse failures come back as [`JsonLoad::Corrupt`] so callers can decide
/// whether to clear the entry.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> JsonLoad<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return JsonLoad::Missing,
        Err(e) => return JsonLoad::Unreadable(e),
    };
    match serde_json::from_str(&raw) {
        Ok(value) => JsonLoad::Loaded(value),
        Err(e) => JsonLoad::Corrupt(e.to_string()),
    }
}

/// Outcome of [`load_json`].
#[derive(Debug)]
pub enum JsonLoad<T> {
    Loaded(T),
    Missing,
    /// The stored text was not valid JSON for `T`.
    Corrupt(String),
    /// The medium itself failed.
    Unreadable(StorageError),
}

// =============================================================================
// IN-MEMORY STORE
// =============================================================================

/// In-memory store shared between clones.
///
/// Two stores built from the same clone see each other's writes, which is how
/// tests simulate a page reload over the same durable medium.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

// =============================================================================
// BROWSER STORE
// =============================================================================

/// `window.localStorage`, looked up on every call.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    /// The browser's local storage, or `None` when no medium exists
    /// (server rendering, private mode with storage disabled, tests).
    #[must_use]
    pub fn local() -> Option<SharedStore> {
        #[cfg(feature = "hydrate")]
        {
            let available = web_sys::window()
                .and_then(|w| w.local_storage().ok().flatten())
                .is_some();
            if available {
                return Some(Arc::new(BrowserStorage));
            }
            None
        }
        #[cfg(not(feature = "hydrate"))]
        {
            None
        }
    }

    #[cfg(feature = "hydrate")]
    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or(StorageError::Unavailable)
    }
}

#[cfg(feature = "hydrate")]
fn js_failure(key: &str, err: &wasm_bindgen::JsValue) -> StorageError {
    StorageError::Operation {
        key: key.to_owned(),
        reason: err.as_string().unwrap_or_else(|| format!("{err:?}")),
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        #[cfg(feature = "hydrate")]
        {
            Self::storage()?.get_item(key).map_err(|e| js_failure(key, &e))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            Err(StorageError::Unavailable)
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        #[cfg(feature = "hydrate")]
        {
            Self::storage()?.set_item(key, value).map_err(|e| js_failure(key, &e))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (key, value);
            Err(StorageError::Unavailable)
        }
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        #[cfg(feature = "hydrate")]
        {
            Self::storage()?.remove_item(key).map_err(|e| js_failure(key, &e))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            Err(StorageError::Unavailable)
        }
    }
}
