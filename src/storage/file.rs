//! JsonFileStore - durable store kept as a single JSON object on disk.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use super::KeyValueStore;
use crate::error::StoreError;

/// File-backed key-value store.
///
/// The whole map is held in memory and rewritten on every mutation through a
/// temp file renamed into place, so a crash mid-write leaves the previous
/// contents intact.
#[derive(Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    storage: Arc<RwLock<BTreeMap<String, String>>>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file opens as an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let storage = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| StoreError::Decode {
                key: path.display().to_string(),
                message: e.to_string(),
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StoreError::Io(format!("{}: {}", path.display(), e))),
        };
        tracing::debug!(path = %path.display(), keys = storage.len(), "opened durable store");
        Ok(Self {
            path,
            storage: Arc::new(RwLock::new(storage)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, snapshot: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| StoreError::Io(format!("failed to prepare store directory: {e}")))?;
        }
        let payload = serde_json::to_vec_pretty(snapshot).map_err(|e| StoreError::Encode {
            key: self.path.display().to_string(),
            message: e.to_string(),
        })?;
        let temp_path = self.path.with_extension("json.tmp");
        fs::write(&temp_path, payload)
            .map_err(|e| StoreError::Io(format!("failed to write store payload: {e}")))?;
        fs::rename(&temp_path, &self.path)
            .map_err(|e| StoreError::Io(format!("failed to finalize store payload: {e}")))?;
        Ok(())
    }

    fn mutate<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(&mut BTreeMap<String, String>) -> T,
    ) -> Result<T, StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned(operation))?;
        // Memory only changes once the new contents are on disk.
        let mut next = storage.clone();
        let result = f(&mut next);
        self.persist(&next)?;
        *storage = next;
        Ok(result)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_raw(&self, key: &str) -> Result<Option<String>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        Ok(storage.get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.mutate("write", |storage| {
            storage.insert(key.to_string(), value);
        })
    }

    fn remove(&self, key: &str) -> Result<bool, StoreError> {
        let existed = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?
            .contains_key(key);
        if !existed {
            return Ok(false);
        }
        self.mutate("remove", |storage| storage.remove(key).is_some())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        Ok(storage.keys().cloned().collect())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.mutate("clear", |storage| storage.clear())
    }
}
