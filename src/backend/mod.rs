//! Raw string key-value backends.
//!
//! A [`Backend`] stores strings under string keys and knows nothing about
//! typed values. Two implementations ship with the crate:
//!
//! - [`MemoryBackend`]: process-lifetime storage, the session-scoped store.
//! - [`DurableBackend`]: fjall-backed storage that survives restarts
//!   (requires the `kv` feature).

#[cfg(feature = "kv")]
mod durable;
mod memory;

#[cfg(feature = "kv")]
pub use durable::DurableBackend;
pub use memory::MemoryBackend;

use std::sync::Arc;

use crate::error::BackendError;

/// String storage the typed store is layered on.
///
/// Methods take `&self`; implementations provide their own interior
/// synchronization so one backend can be shared by several stores.
pub trait Backend {
    /// Read the string stored under `key`, if any.
    fn get_item(&self, key: &str) -> Result<Option<String>, BackendError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<(), BackendError>;

    /// Delete `key`. Deleting a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), BackendError>;

    /// All keys currently stored, in ascending order.
    fn keys(&self) -> Result<Vec<String>, BackendError>;

    /// Delete every key.
    fn clear(&self) -> Result<(), BackendError>;
}

impl<B: Backend + ?Sized> Backend for &B {
    fn get_item(&self, key: &str) -> Result<Option<String>, BackendError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), BackendError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), BackendError> {
        (**self).remove_item(key)
    }

    fn keys(&self) -> Result<Vec<String>, BackendError> {
        (**self).keys()
    }

    fn clear(&self) -> Result<(), BackendError> {
        (**self).clear()
    }
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn get_item(&self, key: &str) -> Result<Option<String>, BackendError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), BackendError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), BackendError> {
        (**self).remove_item(key)
    }

    fn keys(&self) -> Result<Vec<String>, BackendError> {
        (**self).keys()
    }

    fn clear(&self) -> Result<(), BackendError> {
        (**self).clear()
    }
}

impl<B: Backend + ?Sized> Backend for Arc<B> {
    fn get_item(&self, key: &str) -> Result<Option<String>, BackendError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), BackendError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), BackendError> {
        (**self).remove_item(key)
    }

    fn keys(&self) -> Result<Vec<String>, BackendError> {
        (**self).keys()
    }

    fn clear(&self) -> Result<(), BackendError> {
        (**self).clear()
    }
}
