//! Storage adapters.
//!
//! This module defines the adapter contract consumed by the façade and two
//! reference backends:
//!
//! - [`MemoryAdapter`]: in-process map with change notification
//! - [`JsonFileAdapter`]: single JSON file, rewritten atomically, no notification

pub mod json_file;
pub mod memory;
pub mod traits;

pub use json_file::JsonFileAdapter;
pub use memory::MemoryAdapter;
pub use traits::{ChangeNotifier, RawListener, StorageAdapter};
