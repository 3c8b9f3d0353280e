//! Persisted string-keyed store abstraction.
//!
//! The cart is kept as a single JSON string under [`CART_KEY`]. A store only
//! needs to get and set whole string values; the storefront backs it with the
//! visitor's session and the CLI with a JSON file.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Key under which the cart JSON is stored.
pub const CART_KEY: &str = "cart";

/// Errors reported by a [`CartStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading a value failed.
    #[error("store read failed: {0}")]
    Read(String),

    /// Writing a value failed.
    #[error("store write failed: {0}")]
    Write(String),
}

/// A durable key-value store of string values.
pub trait CartStore: Send + Sync {
    /// Fetch the value stored under `key`, if any.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StoreError>> + Send;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// In-process store, mainly for tests.
///
/// Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with `value` under `key`.
    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        store
    }

    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::Read(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::Write(e.to_string()))?;
        entries.insert(key.to_string(), value);
        Ok(())
    }
}

impl CartStore for MemoryStore {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StoreError>> + Send {
        std::future::ready(self.read(key))
    }

    fn set(&self, key: &str, value: String) -> impl Future<Output = Result<(), StoreError>> + Send {
        std::future::ready(self.write(key, value))
    }
}
