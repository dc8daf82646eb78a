//! In-memory storage adapter.
//!
//! Backed by a `BTreeMap` behind a mutex. Notifying by default: `set_item`
//! and `delete_item` invoke the listeners subscribed to the affected key.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::trace;

use super::traits::{ChangeNotifier, RawListener, StorageAdapter};
use crate::error::{AdapterError, AdapterResult};

/// In-memory adapter, mainly for tests and ephemeral state.
#[derive(Default)]
pub struct MemoryAdapter {
    items: Mutex<BTreeMap<String, String>>,
    listeners: Mutex<HashMap<String, Vec<RawListener>>>,
    notifications: bool,
}

impl MemoryAdapter {
    /// Create an empty adapter with change notification enabled.
    pub fn new() -> Self {
        Self {
            notifications: true,
            ..Self::default()
        }
    }

    /// Create an empty adapter that exposes no notifier.
    pub fn without_notifications() -> Self {
        Self::default()
    }

    /// Number of listeners currently subscribed to `key`.
    pub fn listener_count(&self, key: &str) -> AdapterResult<usize> {
        Ok(self.listeners()?.get(key).map_or(0, Vec::len))
    }

    fn items(&self) -> AdapterResult<MutexGuard<'_, BTreeMap<String, String>>> {
        self.items.lock().map_err(|_| poisoned("items"))
    }

    fn listeners(&self) -> AdapterResult<MutexGuard<'_, HashMap<String, Vec<RawListener>>>> {
        self.listeners.lock().map_err(|_| poisoned("listeners"))
    }

    fn notify(&self, key: &str, value: Option<&str>) -> AdapterResult<()> {
        if !self.notifications {
            return Ok(());
        }
        // Snapshot so callbacks can re-enter the adapter.
        let subscribed: Vec<RawListener> = match self.listeners()?.get(key) {
            Some(list) => list.clone(),
            None => return Ok(()),
        };
        trace!(key, count = subscribed.len(), "notifying listeners");
        for listener in subscribed {
            listener(value);
        }
        Ok(())
    }
}

fn poisoned(what: &str) -> AdapterError {
    format!("memory adapter {} lock poisoned", what).into()
}

impl StorageAdapter for MemoryAdapter {
    fn get_item(&self, key: &str) -> AdapterResult<Option<String>> {
        Ok(self.items()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> AdapterResult<()> {
        self.items()?.insert(key.to_string(), value.to_string());
        self.notify(key, Some(value))
    }

    fn delete_item(&self, key: &str) -> AdapterResult<()> {
        let removed = self.items()?.remove(key).is_some();
        if removed {
            self.notify(key, None)?;
        }
        Ok(())
    }

    fn get_all_keys(&self) -> AdapterResult<Vec<String>> {
        Ok(self.items()?.keys().cloned().collect())
    }

    fn notifier(&self) -> Option<&dyn ChangeNotifier> {
        if self.notifications {
            Some(self as &dyn ChangeNotifier)
        } else {
            None
        }
    }
}

impl ChangeNotifier for MemoryAdapter {
    fn add_listener(&self, key: &str, listener: RawListener) -> AdapterResult<()> {
        self.listeners()?
            .entry(key.to_string())
            .or_default()
            .push(listener);
        Ok(())
    }

    fn remove_listener(&self, key: &str, listener: &RawListener) -> AdapterResult<()> {
        let mut listeners = self.listeners()?;
        if let Some(list) = listeners.get_mut(key) {
            if let Some(pos) = list.iter().position(|l| Arc::ptr_eq(l, listener)) {
                list.remove(pos);
            }
            if list.is_empty() {
                listeners.remove(key);
            }
        }
        Ok(())
    }
}
