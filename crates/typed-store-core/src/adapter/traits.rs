//! Storage adapter trait definitions.
//!
//! The `StorageAdapter` trait is the raw, string-keyed interface every
//! backend must implement. Change notification is an optional capability
//! exposed through [`StorageAdapter::notifier`]; callers must check for it
//! before use.

use std::sync::Arc;

use crate::error::AdapterResult;

/// Raw change callback registered with an adapter.
///
/// Receives the new stored value, or `None` when the key was deleted.
/// Listeners are identified by `Arc` pointer identity.
pub type RawListener = Arc<dyn Fn(Option<&str>) + Send + Sync>;

/// Raw string-keyed storage backend.
///
/// All implementations must ensure:
/// - Operations complete before returning (no deferred work)
/// - Keys and values are stored verbatim
/// - Errors are reported through the returned `Result`, never by panicking
///
/// Methods take `&self`; backends manage their own interior mutability so a
/// single adapter can be shared by several façades.
pub trait StorageAdapter {
    /// Read the value stored under `key`.
    ///
    /// # Returns
    ///
    /// Returns `Ok(Some(value))` if present, `Ok(None)` if not.
    fn get_item(&self, key: &str) -> AdapterResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> AdapterResult<()>;

    /// Delete `key`. Deleting an absent key is not an error.
    fn delete_item(&self, key: &str) -> AdapterResult<()>;

    /// List every stored key. Order is unspecified.
    fn get_all_keys(&self) -> AdapterResult<Vec<String>>;

    /// Change-notification capability, if this backend has one.
    fn notifier(&self) -> Option<&dyn ChangeNotifier> {
        None
    }
}

/// Optional key-scoped change notification.
pub trait ChangeNotifier {
    /// Subscribe `listener` to changes of `key`.
    fn add_listener(&self, key: &str, listener: RawListener) -> AdapterResult<()>;

    /// Unsubscribe a listener previously passed to `add_listener`.
    ///
    /// Removing a listener that is not subscribed is a no-op.
    fn remove_listener(&self, key: &str, listener: &RawListener) -> AdapterResult<()>;
}

impl<A: StorageAdapter + ?Sized> StorageAdapter for &A {
    fn get_item(&self, key: &str) -> AdapterResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> AdapterResult<()> {
        (**self).set_item(key, value)
    }

    fn delete_item(&self, key: &str) -> AdapterResult<()> {
        (**self).delete_item(key)
    }

    fn get_all_keys(&self) -> AdapterResult<Vec<String>> {
        (**self).get_all_keys()
    }

    fn notifier(&self) -> Option<&dyn ChangeNotifier> {
        (**self).notifier()
    }
}

impl<A: StorageAdapter + ?Sized> StorageAdapter for Arc<A> {
    fn get_item(&self, key: &str) -> AdapterResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> AdapterResult<()> {
        (**self).set_item(key, value)
    }

    fn delete_item(&self, key: &str) -> AdapterResult<()> {
        (**self).delete_item(key)
    }

    fn get_all_keys(&self) -> AdapterResult<Vec<String>> {
        (**self).get_all_keys()
    }

    fn notifier(&self) -> Option<&dyn ChangeNotifier> {
        (**self).notifier()
    }
}
