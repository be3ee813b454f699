//! Unified error type for the typed-storage library.
//!
//! This module provides a single [`Error`] type that encompasses all errors
//! that can occur in the library, along with the module-level error types it
//! wraps.

use thiserror::Error;

/// Errors raised while turning typed values into records and back.
#[derive(Error, Debug)]
pub enum CodecError {
    /// A `__objt__` payload is not valid JSON.
    #[error("Malformed structured payload: {0}")]
    MalformedPayload(#[source] serde_json::Error),

    /// A value could not be serialized to JSON.
    #[error("Serialization error: {0}")]
    Serialize(#[source] serde_json::Error),

    /// A decoded value does not have the shape of the requested type.
    #[error("Deserialization error: {0}")]
    Deserialize(#[source] serde_json::Error),

    /// A pattern source does not compile as a regular expression.
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Errors raised by a storage backend.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "kv")]
    #[error("Fjall error: {0}")]
    Fjall(#[from] fjall::Error),

    #[error("Storage lock poisoned: {0}")]
    LockPoisoned(String),

    #[error("Value stored under '{key}' is not valid UTF-8")]
    InvalidUtf8 { key: String },

    #[error("Storage format mismatch: expected version {expected}, found {found}")]
    FormatMismatch { expected: u32, found: String },
}

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Unified error type for all typed-storage operations.
///
/// # Example
///
/// ```ignore
/// use typed_storage::{Result, TypedStore};
///
/// fn remember_name(name: &str) -> Result<()> {
///     let store = TypedStore::session();
///     store.set("name", name)?;
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// Error from encoding or decoding a record.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Error from the storage backend.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// Error from loading configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A [`Result`] type alias using the unified [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns `true` if this is a codec error.
    pub fn is_codec(&self) -> bool {
        matches!(self, Self::Codec(_))
    }

    /// Returns `true` if a stored structured payload failed to parse.
    pub fn is_malformed_payload(&self) -> bool {
        matches!(self, Self::Codec(CodecError::MalformedPayload(_)))
    }

    /// Returns `true` if this is a backend error.
    pub fn is_backend(&self) -> bool {
        matches!(self, Self::Backend(_))
    }

    /// Returns `true` if this is a configuration error.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_payload_predicate() {
        let json_err = serde_json::from_str::<serde_json::Value>("{\"a\":").unwrap_err();
        let err: Error = CodecError::MalformedPayload(json_err).into();
        assert!(err.is_codec());
        assert!(err.is_malformed_payload());
        assert!(!err.is_backend());
    }

    #[test]
    fn test_backend_error_display() {
        let err: Error = BackendError::InvalidUtf8 {
            key: "k".to_string(),
        }
        .into();
        assert!(err.is_backend());
        assert_eq!(err.to_string(), "Value stored under 'k' is not valid UTF-8");
    }
}
