//! # Typed Store Core
//!
//! A typed façade over synchronous string key-value stores.
//!
//! A [`Schema`] maps logical field names to codecs. [`TypedStorage`] uses it
//! to turn typed reads and writes into raw string operations against any
//! [`StorageAdapter`], optionally prefixing physical keys with a namespace
//! and bridging the adapter's change notifications to typed callbacks.
//!
//! ## Architecture
//!
//! - **codec**: value encode/decode strategies (string, boolean, number, json)
//! - **schema**: immutable field table
//! - **storage**: the typed façade and listener bridge
//! - **adapter**: raw adapter contract plus in-memory and JSON-file backends
//!
//! ## Example
//!
//! ```
//! use typed_store_core::{MemoryAdapter, NumberCodec, Schema, StringCodec, TypedStorage};
//!
//! let schema = Schema::builder()
//!     .field("token", StringCodec)
//!     .field("n", NumberCodec)
//!     .build()?;
//! let storage = TypedStorage::with_namespace(MemoryAdapter::new(), schema, "ns");
//!
//! storage.set("n", 7.0)?;
//! assert_eq!(storage.get::<f64>("n")?, Some(7.0));
//! assert_eq!(storage.get::<String>("token")?, None);
//! # Ok::<(), typed_store_core::StoreError>(())
//! ```

pub mod adapter;
pub mod codec;
pub mod error;
pub mod fs;
pub mod schema;
pub mod storage;

pub use adapter::{ChangeNotifier, JsonFileAdapter, MemoryAdapter, RawListener, StorageAdapter};
pub use codec::{BoolCodec, Codec, JsonCodec, NumberCodec, StringCodec};
pub use error::{AdapterError, AdapterResult, Result, StoreError};
pub use schema::{Field, Schema, SchemaBuilder};
pub use storage::{Listener, TypedStorage, NAMESPACE_SEPARATOR};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
