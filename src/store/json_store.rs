use std::fs;
use std::io::Write;
use std::path::PathBuf;

use serde_json::Value;

use crate::store::{KeyValueStore, StoreError};

/// One pretty-printed JSON file per key under `base_dir`.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn default_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mathdrill")
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self, StoreError> {
        fs::create_dir_all(&base_dir)?;
        let store = Self { base_dir };
        let stale = store.clean_stale_temp_files();
        if stale > 0 {
            tracing::warn!(count = stale, "removed temp files left by an interrupted write");
        }
        Ok(store)
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }

    /// Remove `.tmp` files left behind by a write that never reached its rename.
    pub fn clean_stale_temp_files(&self) -> usize {
        let Ok(entries) = fs::read_dir(&self.base_dir) else {
            return 0;
        };
        let mut removed = 0;
        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            if path.extension().and_then(|x| x.to_str()) == Some("tmp")
                && fs::remove_file(&path).is_ok()
            {
                removed += 1;
            }
        }
        removed
    }
}

impl KeyValueStore for JsonStore {
    fn name(&self) -> &'static str {
        "file"
    }

    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let path = self.file_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        let path = self.file_path(key);
        let tmp_path = path.with_extension("json.tmp");

        let json = serde_json::to_string_pretty(&value)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let path = self.file_path(key);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}
