//! JSON file-backed cart store.
//!
//! The file holds one JSON object mapping keys to string values, the same
//! shape a browser's key-value storage would have:
//!
//! ```json
//! { "cart": "[{\"name\":\"Algebra I\",\"price\":49.99,\"image\":\"\",\"quantity\":1}]" }
//! ```

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use coursecart_core::{CartStore, StoreError};

/// A [`CartStore`] persisted to a JSON file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every entry. A missing file is an empty store.
    async fn entries(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(StoreError::Read(format!("{}: {e}", self.path.display()))),
        };

        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&raw)
            .map_err(|e| StoreError::Read(format!("{}: {e}", self.path.display())))
    }
}

impl CartStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries().await?.remove(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        // An unreadable file is left as it is rather than losing its other keys.
        let mut entries = self
            .entries()
            .await
            .map_err(|e| StoreError::Write(format!("refusing to overwrite: {e}")))?;
        entries.insert(key.to_owned(), value);

        let json = serde_json::to_string_pretty(&entries)
            .map_err(|e| StoreError::Write(e.to_string()))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| StoreError::Write(format!("{}: {e}", self.path.display())))
    }
}
