pub mod gateway;
pub mod json_store;
pub mod memory_store;
pub mod schema;

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use gateway::Storage;
pub use json_store::JsonStore;
pub use memory_store::MemoryStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Flat key-value backend. Every call stands alone; there are no
/// transactions spanning several keys.
pub trait KeyValueStore {
    fn name(&self) -> &'static str;
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Memory,
}

/// Pick the backend once at startup. A data directory that cannot be
/// created degrades to an in-memory store for the rest of the run.
pub fn open_backend(backend: StorageBackend, data_dir: &Path) -> Box<dyn KeyValueStore> {
    match backend {
        StorageBackend::Memory => {
            tracing::info!("using in-memory storage; progress will not be saved");
            Box::new(MemoryStore::new())
        }
        StorageBackend::File => match JsonStore::with_base_dir(data_dir.to_path_buf()) {
            Ok(store) => {
                tracing::info!(dir = %data_dir.display(), "using file storage");
                Box::new(store)
            }
            Err(e) => {
                tracing::warn!(
                    dir = %data_dir.display(),
                    error = %e,
                    "data directory unavailable, falling back to in-memory storage"
                );
                Box::new(MemoryStore::new())
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_backend_opens_in_writable_dir() {
        let dir = TempDir::new().unwrap();
        let store = open_backend(StorageBackend::File, &dir.path().join("data"));
        assert_eq!(store.name(), "file");
    }

    #[test]
    fn unwritable_dir_falls_back_to_memory() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "x").unwrap();
        let store = open_backend(StorageBackend::File, &blocker.join("data"));
        assert_eq!(store.name(), "memory");
    }

    #[test]
    fn memory_backend_is_explicit() {
        let dir = TempDir::new().unwrap();
        let store = open_backend(StorageBackend::Memory, dir.path());
        assert_eq!(store.name(), "memory");
    }
}
