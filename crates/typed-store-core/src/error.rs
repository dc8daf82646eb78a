//! Error types for typed storage operations.
//!
//! Errors are descriptive at the core level; the CLI layer maps these to
//! user-facing messages and exit codes.

use thiserror::Error;

/// Result type alias for typed storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Boxed error produced by a storage adapter.
pub type AdapterError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for raw adapter operations.
pub type AdapterResult<T> = std::result::Result<T, AdapterError>;

/// Core error type for typed storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The logical key has no field in the schema
    #[error("Unknown key: {0}")]
    UnknownKey(String),

    /// Typed access used a Rust type other than the field's value type
    #[error("Type mismatch for key '{key}': field stores {expected}")]
    TypeMismatch { key: String, expected: &'static str },

    /// A value could not be encoded by its field codec
    #[error("Encode error for key '{key}': {message}")]
    Encode { key: String, message: String },

    /// A stored value could not be decoded by its field codec
    #[error("Decode error for key '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The adapter has no change-notification capability
    #[error("Storage adapter does not support listeners")]
    ListenersUnsupported,

    /// Schema construction error
    #[error("Schema error: {0}")]
    Schema(String),

    /// Error raised by the underlying storage adapter, unmodified
    #[error(transparent)]
    Adapter(AdapterError),
}

impl StoreError {
    /// Attach a key to a codec-level error.
    pub(crate) fn with_key(self, key: &str) -> Self {
        match self {
            StoreError::Encode { message, .. } => StoreError::Encode {
                key: key.to_string(),
                message,
            },
            StoreError::Decode { source, .. } => StoreError::Decode {
                key: key.to_string(),
                source,
            },
            StoreError::TypeMismatch { expected, .. } => StoreError::TypeMismatch {
                key: key.to_string(),
                expected,
            },
            other => other,
        }
    }
}

impl From<AdapterError> for StoreError {
    fn from(err: AdapterError) -> Self {
        StoreError::Adapter(err)
    }
}
