//! JSON-file storage adapter.
//!
//! Stores every key in a single JSON object (`{"key": "value", ...}`). The
//! file is read once on first access; every mutation rewrites it atomically.
//! A missing file is an empty store. This adapter has no change notification.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use super::traits::StorageAdapter;
use crate::error::AdapterResult;
use crate::fs::write_atomic;

/// File-backed adapter holding a string-to-string map.
pub struct JsonFileAdapter {
    path: PathBuf,
    cache: Mutex<Option<BTreeMap<String, String>>>,
}

impl JsonFileAdapter {
    /// Create an adapter for `path`. Nothing is read until first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cache: Mutex::new(None),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> AdapterResult<BTreeMap<String, String>> {
        match fs::read_to_string(path) {
            Ok(contents) if contents.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(contents) => {
                let items: BTreeMap<String, String> = serde_json::from_str(&contents)
                    .map_err(|e| format!("Invalid store file {}: {}", path.display(), e))?;
                debug!(path = %path.display(), keys = items.len(), "loaded store file");
                Ok(items)
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(format!("Failed to read store {}: {}", path.display(), err).into()),
        }
    }

    fn persist(&self, items: &BTreeMap<String, String>) -> AdapterResult<()> {
        let contents = serde_json::to_vec_pretty(items)?;
        write_atomic(&self.path, &contents)
            .map_err(|e| format!("Failed to write store {}: {}", self.path.display(), e))?;
        Ok(())
    }

    /// Run `f` against the loaded map, loading it first if needed.
    fn with_items<R>(&self, f: impl FnOnce(&BTreeMap<String, String>) -> R) -> AdapterResult<R> {
        let mut guard = self.lock()?;
        Ok(f(Self::loaded(&self.path, &mut guard)?))
    }

    /// Apply `f` to a copy of the map and persist it. The cache only takes
    /// the new map once the write succeeded. `f` returns `false` when
    /// nothing changed and no write is needed.
    fn commit(&self, f: impl FnOnce(&mut BTreeMap<String, String>) -> bool) -> AdapterResult<()> {
        let mut guard = self.lock()?;
        let mut next = Self::loaded(&self.path, &mut guard)?.clone();
        if !f(&mut next) {
            return Ok(());
        }
        self.persist(&next)?;
        *guard = Some(next);
        Ok(())
    }

    fn lock(&self) -> AdapterResult<MutexGuard<'_, Option<BTreeMap<String, String>>>> {
        Ok(self
            .cache
            .lock()
            .map_err(|_| "json file adapter lock poisoned")?)
    }

    fn loaded<'a>(
        path: &Path,
        slot: &'a mut Option<BTreeMap<String, String>>,
    ) -> AdapterResult<&'a BTreeMap<String, String>> {
        if slot.is_none() {
            *slot = Some(Self::load(path)?);
        }
        slot.as_ref()
            .ok_or_else(|| "json file adapter cache missing".into())
    }
}

impl StorageAdapter for JsonFileAdapter {
    fn get_item(&self, key: &str) -> AdapterResult<Option<String>> {
        self.with_items(|items| items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> AdapterResult<()> {
        self.commit(|items| {
            items.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn delete_item(&self, key: &str) -> AdapterResult<()> {
        self.commit(|items| items.remove(key).is_some())
    }

    fn get_all_keys(&self) -> AdapterResult<Vec<String>> {
        self.with_items(|items| items.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let adapter = JsonFileAdapter::new(dir.path().join("store.json"));
        assert_eq!(adapter.get_item("a").unwrap(), None);
        assert!(adapter.get_all_keys().unwrap().is_empty());
        assert!(!adapter.path().exists());
    }

    #[test]
    fn test_values_persist_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");

        let adapter = JsonFileAdapter::new(&path);
        adapter.set_item("ns-token", "t1").unwrap();
        adapter.set_item("ns-n", "7").unwrap();
        adapter.delete_item("ns-n").unwrap();

        let reopened = JsonFileAdapter::new(&path);
        assert_eq!(reopened.get_item("ns-token").unwrap(), Some("t1".to_string()));
        assert_eq!(reopened.get_all_keys().unwrap(), vec!["ns-token"]);
        assert!(reopened.notifier().is_none());
    }

    #[test]
    fn test_invalid_file_is_adapter_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "not json").unwrap();

        let adapter = JsonFileAdapter::new(&path);
        let err = adapter.get_item("a").unwrap_err();
        assert!(err.to_string().contains("Invalid store file"));
    }

    #[test]
    fn test_failed_write_leaves_cache_unchanged() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        let adapter = JsonFileAdapter::new(&path);
        adapter.set_item("kept", "1").unwrap();

        // A directory in the temp file's place makes the atomic write fail.
        let blocker = dir
            .path()
            .join(format!("store.json.tmp-{}", std::process::id()));
        fs::create_dir(&blocker).unwrap();

        assert!(adapter.set_item("k", "v").is_err());
        assert!(adapter.delete_item("kept").is_err());
        assert_eq!(adapter.get_item("k").unwrap(), None);
        assert_eq!(adapter.get_item("kept").unwrap(), Some("1".to_string()));
        assert_eq!(adapter.get_all_keys().unwrap(), vec!["kept"]);

        fs::remove_dir(&blocker).unwrap();
        adapter.set_item("other", "2").unwrap();
        let reopened = JsonFileAdapter::new(&path);
        assert_eq!(reopened.get_all_keys().unwrap(), vec!["kept", "other"]);
    }
}
