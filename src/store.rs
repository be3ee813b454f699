//! The typed store: typed values over a string backend.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::backend::{Backend, MemoryBackend};
use crate::binding::Binding;
use crate::codec;
use crate::config::CodecConfig;
use crate::error::{CodecError, Result};
use crate::logging::{debug, error, info, trace};
use crate::value::TypedValue;

/// Typed values over a string-only [`Backend`].
///
/// `TypedStore` owns no state of its own: every call encodes or decodes a
/// single record and goes straight to the backend.
///
/// # Example
///
/// ```ignore
/// use typed_storage::TypedStore;
///
/// let store = TypedStore::session();
///
/// store.set("visits", 3)?;
/// assert_eq!(store.get("visits")?.and_then(|v| v.as_number()), Some(3.0));
///
/// // Falsy values read back as the default
/// store.set("visits", 0)?;
/// assert_eq!(store.get_or("visits", (-1).into())?.as_number(), Some(-1.0));
///
/// store.remove("visits")?;
/// assert!(!store.has("visits")?);
/// ```
///
/// # Falsy masking
///
/// With the default [`CodecConfig`], a record that decodes to a falsy value
/// (`0`, `NaN`, `false`, `""`, null) reads back as the caller's default, the
/// same as a missing key. Use [`CodecConfig::strict`] to read such values as
/// they are.
pub struct TypedStore<B> {
    backend: B,
    config: CodecConfig,
}

impl TypedStore<Arc<MemoryBackend>> {
    /// A store bound to the process-wide session backend.
    pub fn session() -> Self {
        Self::new(MemoryBackend::session())
    }
}

#[cfg(feature = "kv")]
impl TypedStore<crate::backend::DurableBackend> {
    /// A store bound to a durable backend at `path`.
    pub fn open_local(path: impl AsRef<std::path::Path>, config: CodecConfig) -> Result<Self> {
        let backend = crate::backend::DurableBackend::open(path)?;
        Ok(Self::with_config(backend, config))
    }
}

impl<B: Backend> TypedStore<B> {
    /// Bind to `backend` with the default codec configuration.
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, CodecConfig::default())
    }

    pub fn with_config(backend: B, config: CodecConfig) -> Self {
        Self { backend, config }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Whether the backend holds a record for `key`.
    ///
    /// The record is not decoded, so a key set to a falsy or absent value
    /// still counts as present.
    pub fn has(&self, key: &str) -> Result<bool> {
        Ok(self.backend.get_item(key)?.is_some())
    }

    /// Delete the record for `key`. Missing keys are ignored.
    pub fn remove(&self, key: &str) -> Result<()> {
        debug!(key = key, "removing record");
        self.backend.remove_item(key)?;
        Ok(())
    }

    /// Encode `value` and store it under `key`, replacing any prior record.
    pub fn set(&self, key: &str, value: impl Into<TypedValue>) -> Result<()> {
        let value = value.into();
        debug!(key = key, kind = %value.kind(), "setting value");
        let record = codec::encode(&value, &self.config)?;
        self.backend.set_item(key, &record)?;
        Ok(())
    }

    /// Read and decode the value under `key`.
    ///
    /// Returns `Ok(None)` when the key is missing, the record carries no
    /// value, or (with masking enabled) the value is falsy. Strict stores
    /// read a bare header such as `__strn__|` as the kind's empty value. A
    /// structured record with invalid JSON is an error.
    pub fn get(&self, key: &str) -> Result<Option<TypedValue>> {
        let Some(record) = self.backend.get_item(key)? else {
            trace!(key = key, "key not found");
            return Ok(None);
        };

        let decoded = if self.config.mask_falsy {
            codec::decode(&record)
        } else {
            codec::decode_strict(&record)
        };
        let decoded = decoded.map_err(|e| {
            error!(key = key, error = %e, "failed to decode record");
            e
        })?;

        Ok(decoded.filter(|value| !self.config.mask_falsy || value.is_truthy()))
    }

    /// Like [`get`](Self::get), substituting `default` when nothing is read.
    pub fn get_or(&self, key: &str, default: TypedValue) -> Result<TypedValue> {
        Ok(self.get(key)?.unwrap_or(default))
    }

    /// The stored record under `key`, undecoded.
    pub fn get_raw(&self, key: &str) -> Result<Option<String>> {
        Ok(self.backend.get_item(key)?)
    }

    /// Store `record` under `key` as-is, bypassing the encoder.
    pub fn set_raw(&self, key: &str, record: &str) -> Result<()> {
        self.backend.set_item(key, record)?;
        Ok(())
    }

    pub fn keys(&self) -> Result<Vec<String>> {
        Ok(self.backend.keys()?)
    }

    /// Remove every record in the backend.
    pub fn clear(&self) -> Result<()> {
        self.backend.clear()?;
        info!("store cleared");
        Ok(())
    }

    /// Serialize `value` with serde and store it.
    ///
    /// JSON primitives are stored as their own kinds, so a `bool` becomes a
    /// boolean record and a struct becomes a structured record.
    pub fn set_serialized<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_value(value).map_err(CodecError::Serialize)?;
        self.set(key, TypedValue::from_json(json))
    }

    /// Read the value under `key` and deserialize it with serde.
    ///
    /// Masking applies first, so a stored `false` or `0` reads as `None`
    /// unless the store is strict.
    pub fn get_deserialized<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(value) = self.get(key)? else {
            return Ok(None);
        };
        let typed = serde_json::from_value(value.into_json()).map_err(CodecError::Deserialize)?;
        Ok(Some(typed))
    }

    /// Bind `key` and its default into a read/set/remove handle.
    pub fn bind(&self, key: impl Into<String>, default: Option<TypedValue>) -> Binding<'_, B> {
        Binding::new(self, key.into(), default)
    }
}
