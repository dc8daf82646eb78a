//! Typed storage façade.
//!
//! [`TypedStorage`] composes a [`Schema`] with a [`StorageAdapter`]. Typed
//! reads and writes are checked against the schema, encoded through the
//! field's codec, and sent to the adapter under the physical key
//! `namespace-key` (or just `key` without a namespace).
//!
//! The façade keeps no stored-value state. Its only state is the listener
//! table, which maps each physical key to the callbacks registered for it
//! and the decoding wrappers handed to the adapter.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::adapter::{RawListener, StorageAdapter};
use crate::error::{Result, StoreError};
use crate::schema::Schema;

/// Separator between namespace and logical key in physical keys.
pub const NAMESPACE_SEPARATOR: &str = "-";

/// Typed change callback. Receives the decoded value, or `None` when the
/// value was deleted.
pub type Listener<T> = Arc<dyn Fn(Option<T>) + Send + Sync>;

struct Registration {
    /// Address of the user callback; stable while `wrapper` holds a clone of it.
    identity: usize,
    wrapper: RawListener,
}

fn identity_of<T>(callback: &Listener<T>) -> usize {
    Arc::as_ptr(callback) as *const () as usize
}

/// Schema-driven typed façade over a raw string adapter.
pub struct TypedStorage<A: StorageAdapter> {
    adapter: A,
    schema: Schema,
    namespace: Option<String>,
    listeners: HashMap<String, Vec<Registration>>,
}

impl<A: StorageAdapter> TypedStorage<A> {
    /// Create a façade without a namespace; physical keys equal logical keys.
    pub fn new(adapter: A, schema: Schema) -> Self {
        Self {
            adapter,
            schema,
            namespace: None,
            listeners: HashMap::new(),
        }
    }

    /// Create a façade whose physical keys are prefixed with `namespace-`.
    pub fn with_namespace(adapter: A, schema: Schema, namespace: impl Into<String>) -> Self {
        Self {
            adapter,
            schema,
            namespace: Some(namespace.into()),
            listeners: HashMap::new(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Whether the adapter exposes change notification.
    pub fn supports_listeners(&self) -> bool {
        self.adapter.notifier().is_some()
    }

    /// Physical key used for `key` under this façade's namespace.
    pub fn physical_key(&self, key: &str) -> String {
        match &self.namespace {
            Some(ns) => format!("{}{}{}", ns, NAMESPACE_SEPARATOR, key),
            None => key.to_string(),
        }
    }

    /// Read and decode the value stored under `key`.
    ///
    /// # Returns
    ///
    /// Returns `Ok(None)` if nothing is stored, or if the codec maps the
    /// stored text to "no value" (e.g. a malformed boolean).
    ///
    /// # Errors
    ///
    /// - `StoreError::UnknownKey` if `key` is not in the schema
    /// - `StoreError::TypeMismatch` if `T` is not the field's value type
    /// - `StoreError::Decode` if the codec rejects the stored text
    /// - `StoreError::Adapter` if the adapter fails
    pub fn get<T: 'static>(&self, key: &str) -> Result<Option<T>> {
        let field = self.schema.require(key)?;
        field.check_type::<T>()?;
        let physical = self.physical_key(key);
        let raw = self.adapter.get_item(&physical)?;
        trace!(key = %physical, present = raw.is_some(), "get");
        field.decode(raw.as_deref())
    }

    /// Like [`get`](Self::get), but falls back to the field's declared
    /// default when nothing is stored.
    pub fn get_or_default<T: 'static>(&self, key: &str) -> Result<Option<T>> {
        let field = self.schema.require(key)?;
        match self.get::<T>(key)? {
            Some(value) => Ok(Some(value)),
            None => match field.default_raw() {
                Some(raw) => field.decode(Some(raw)),
                None => Ok(None),
            },
        }
    }

    /// Encode `value` and store it under `key`.
    ///
    /// # Errors
    ///
    /// - `StoreError::UnknownKey` if `key` is not in the schema
    /// - `StoreError::TypeMismatch` if `T` is not the field's value type
    /// - `StoreError::Encode` if the codec cannot encode the value
    /// - `StoreError::Adapter` if the adapter fails
    pub fn set<T: 'static>(&self, key: &str, value: T) -> Result<()> {
        let field = self.schema.require(key)?;
        let encoded = field.encode(&value)?;
        let physical = self.physical_key(key);
        trace!(key = %physical, "set");
        self.adapter.set_item(&physical, &encoded)?;
        Ok(())
    }

    /// Delete the value stored under `key`.
    ///
    /// Not checked against the schema: removing an undeclared key is passed
    /// to the adapter like any other.
    pub fn remove(&self, key: &str) -> Result<()> {
        let physical = self.physical_key(key);
        trace!(key = %physical, "remove");
        self.adapter.delete_item(&physical)?;
        Ok(())
    }

    /// Logical keys currently stored under this façade's namespace.
    ///
    /// Physical keys outside the namespace are excluded. Without a
    /// namespace every stored key is returned.
    pub fn keys(&self) -> Result<Vec<String>> {
        let all = self.adapter.get_all_keys()?;
        let keys = match &self.namespace {
            Some(ns) => {
                let prefix = format!("{}{}", ns, NAMESPACE_SEPARATOR);
                all.into_iter()
                    .filter_map(|k| k.strip_prefix(&prefix).map(str::to_string))
                    .collect()
            }
            None => all,
        };
        Ok(keys)
    }

    /// Remove every field declared in the schema.
    ///
    /// Keys in the store that the schema does not declare are left alone.
    /// Removals are independent; an adapter error stops the sweep and leaves
    /// the remaining fields in place.
    pub fn clear_all(&self) -> Result<()> {
        debug!(
            namespace = self.namespace.as_deref().unwrap_or(""),
            fields = self.schema.len(),
            "clearing schema fields"
        );
        for name in self.schema.field_names() {
            self.remove(name)?;
        }
        Ok(())
    }

    /// Register `callback` for changes to `key`.
    ///
    /// The adapter receives a wrapper that decodes the raw value through the
    /// field's codec before calling `callback`. Registering the same callback
    /// (by `Arc` identity) for the same key again replaces the earlier
    /// registration, so it is never subscribed twice.
    ///
    /// # Errors
    ///
    /// - `StoreError::UnknownKey` if `key` is not in the schema
    /// - `StoreError::TypeMismatch` if `T` is not the field's value type
    /// - `StoreError::ListenersUnsupported` if the adapter has no notifier
    pub fn add_listener<T: 'static>(&mut self, key: &str, callback: Listener<T>) -> Result<()> {
        let field = self.schema.require(key)?;
        field.check_type::<T>()?;
        let notifier = self
            .adapter
            .notifier()
            .ok_or(StoreError::ListenersUnsupported)?;

        let physical = self.physical_key(key);
        let identity = identity_of(&callback);
        let schema = self.schema.clone();
        let field_name = key.to_string();
        let wrapper: RawListener = Arc::new(move |raw: Option<&str>| {
            let Some(field) = schema.field(&field_name) else {
                return;
            };
            match field.decode::<T>(raw) {
                Ok(value) => callback(value),
                Err(err) => warn!(key = %field_name, error = %err, "dropping undecodable notification"),
            }
        });

        if let Some(registrations) = self.listeners.get_mut(&physical) {
            if let Some(pos) = registrations.iter().position(|r| r.identity == identity) {
                let previous = registrations.remove(pos);
                if registrations.is_empty() {
                    self.listeners.remove(&physical);
                }
                notifier.remove_listener(&physical, &previous.wrapper)?;
                debug!(key = %physical, "replacing existing listener registration");
            }
        }
        notifier.add_listener(&physical, Arc::clone(&wrapper))?;
        let registrations = self.listeners.entry(physical.clone()).or_default();
        registrations.push(Registration { identity, wrapper });
        debug!(key = %physical, count = registrations.len(), "listener added");
        Ok(())
    }

    /// Unregister a callback previously passed to [`add_listener`](Self::add_listener).
    ///
    /// A callback that is not registered for `key` is ignored.
    ///
    /// # Errors
    ///
    /// - `StoreError::ListenersUnsupported` if the adapter has no notifier
    /// - `StoreError::Adapter` if the adapter fails to unsubscribe
    pub fn remove_listener<T: 'static>(&mut self, key: &str, callback: &Listener<T>) -> Result<()> {
        let notifier = self
            .adapter
            .notifier()
            .ok_or(StoreError::ListenersUnsupported)?;
        let physical = self.physical_key(key);
        let identity = identity_of(callback);

        let Some(registrations) = self.listeners.get_mut(&physical) else {
            return Ok(());
        };
        let Some(pos) = registrations.iter().position(|r| r.identity == identity) else {
            return Ok(());
        };
        let registration = registrations.remove(pos);
        if registrations.is_empty() {
            self.listeners.remove(&physical);
        }
        notifier.remove_listener(&physical, &registration.wrapper)?;
        debug!(key = %physical, "listener removed");
        Ok(())
    }

    /// Number of listener registrations currently held by this façade.
    pub fn listener_count(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }
}

impl<A: StorageAdapter> Drop for TypedStorage<A> {
    /// Unsubscribes every wrapper this façade handed to the adapter.
    fn drop(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        let Some(notifier) = self.adapter.notifier() else {
            return;
        };
        for (physical, registrations) in self.listeners.drain() {
            for registration in registrations {
                if let Err(err) = notifier.remove_listener(&physical, &registration.wrapper) {
                    warn!(key = %physical, error = %err, "failed to unsubscribe listener on drop");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::{ChangeNotifier, MemoryAdapter};
    use crate::codec::{NumberCodec, StringCodec};

    fn schema() -> Schema {
        Schema::builder()
            .field("token", StringCodec)
            .field("n", NumberCodec)
            .build()
            .unwrap()
    }

    #[test]
    fn test_physical_key() {
        let plain = TypedStorage::new(MemoryAdapter::new(), schema());
        assert_eq!(plain.physical_key("token"), "token");

        let namespaced = TypedStorage::with_namespace(MemoryAdapter::new(), schema(), "ns");
        assert_eq!(namespaced.physical_key("token"), "ns-token");
        assert_eq!(namespaced.namespace(), Some("ns"));
    }

    #[test]
    fn test_get_checks_type_before_reading() {
        let storage = TypedStorage::new(MemoryAdapter::new(), schema());
        assert!(matches!(
            storage.get::<bool>("token"),
            Err(StoreError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_remove_does_not_check_schema() {
        let storage = TypedStorage::new(MemoryAdapter::new(), schema());
        storage.adapter().set_item("stray", "x").unwrap();
        storage.remove("stray").unwrap();
        assert_eq!(storage.adapter().get_item("stray").unwrap(), None);
    }

    #[test]
    fn test_keys_without_namespace_lists_everything() {
        let storage = TypedStorage::new(MemoryAdapter::new(), schema());
        storage.set("token", "a".to_string()).unwrap();
        storage.adapter().set_item("ns-token", "b").unwrap();
        let mut keys = storage.keys().unwrap();
        keys.sort();
        assert_eq!(keys, vec!["ns-token", "token"]);
    }

    #[test]
    fn test_listener_table_shrinks_on_remove() {
        let mut storage = TypedStorage::new(MemoryAdapter::new(), schema());
        let callback: Listener<String> = Arc::new(|_: Option<String>| {});
        storage.add_listener("token", Arc::clone(&callback)).unwrap();
        assert_eq!(storage.listener_count(), 1);
        storage.remove_listener("token", &callback).unwrap();
        assert_eq!(storage.listener_count(), 0);
        assert!(storage.listeners.is_empty());
    }

    struct RejectingNotifier(MemoryAdapter);

    impl StorageAdapter for RejectingNotifier {
        fn get_item(&self, key: &str) -> crate::error::AdapterResult<Option<String>> {
            self.0.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> crate::error::AdapterResult<()> {
            self.0.set_item(key, value)
        }

        fn delete_item(&self, key: &str) -> crate::error::AdapterResult<()> {
            self.0.delete_item(key)
        }

        fn get_all_keys(&self) -> crate::error::AdapterResult<Vec<String>> {
            self.0.get_all_keys()
        }

        fn notifier(&self) -> Option<&dyn ChangeNotifier> {
            Some(self as &dyn ChangeNotifier)
        }
    }

    impl ChangeNotifier for RejectingNotifier {
        fn add_listener(&self, _key: &str, _listener: RawListener) -> crate::error::AdapterResult<()> {
            Err("subscription refused".into())
        }

        fn remove_listener(&self, key: &str, listener: &RawListener) -> crate::error::AdapterResult<()> {
            self.0.remove_listener(key, listener)
        }
    }

    #[test]
    fn test_rejected_subscription_leaves_no_bookkeeping() {
        let mut storage = TypedStorage::new(RejectingNotifier(MemoryAdapter::new()), schema());
        let callback: Listener<String> = Arc::new(|_: Option<String>| {});
        assert!(matches!(
            storage.add_listener("token", callback),
            Err(StoreError::Adapter(_))
        ));
        assert_eq!(storage.listener_count(), 0);
        assert!(storage.listeners.is_empty());
    }
}
