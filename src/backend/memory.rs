//! In-memory backend.

use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock, RwLock};

use crate::error::BackendError;

use super::Backend;

static SESSION: OnceLock<Arc<MemoryBackend>> = OnceLock::new();

/// A backend that keeps strings in memory for the life of the process.
///
/// # Example
///
/// ```ignore
/// use typed_storage::{Backend, MemoryBackend};
///
/// let backend = MemoryBackend::new();
/// backend.set_item("greeting", "__strn__|hello")?;
/// assert_eq!(backend.get_item("greeting")?.as_deref(), Some("__strn__|hello"));
/// ```
#[derive(Debug, Default)]
pub struct MemoryBackend {
    slots: RwLock<BTreeMap<String, String>>,
}

impl MemoryBackend {
    /// Create a new, empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide session backend.
    ///
    /// Every call returns a handle to the same storage, which is dropped
    /// only when the process exits.
    pub fn session() -> Arc<MemoryBackend> {
        Arc::clone(SESSION.get_or_init(|| Arc::new(MemoryBackend::new())))
    }

    pub fn len(&self) -> Result<usize, BackendError> {
        let slots = self
            .slots
            .read()
            .map_err(|e| BackendError::LockPoisoned(e.to_string()))?;
        Ok(slots.len())
    }

    pub fn is_empty(&self) -> Result<bool, BackendError> {
        Ok(self.len()? == 0)
    }
}

impl Backend for MemoryBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, BackendError> {
        let slots = self
            .slots
            .read()
            .map_err(|e| BackendError::LockPoisoned(e.to_string()))?;
        Ok(slots.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), BackendError> {
        let mut slots = self
            .slots
            .write()
            .map_err(|e| BackendError::LockPoisoned(e.to_string()))?;
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), BackendError> {
        let mut slots = self
            .slots
            .write()
            .map_err(|e| BackendError::LockPoisoned(e.to_string()))?;
        slots.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, BackendError> {
        let slots = self
            .slots
            .read()
            .map_err(|e| BackendError::LockPoisoned(e.to_string()))?;
        Ok(slots.keys().cloned().collect())
    }

    fn clear(&self) -> Result<(), BackendError> {
        let mut slots = self
            .slots
            .write()
            .map_err(|e| BackendError::LockPoisoned(e.to_string()))?;
        slots.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.get_item("a").unwrap(), None);

        backend.set_item("a", "1").unwrap();
        backend.set_item("a", "2").unwrap();
        assert_eq!(backend.get_item("a").unwrap().as_deref(), Some("2"));

        backend.remove_item("a").unwrap();
        backend.remove_item("a").unwrap();
        assert_eq!(backend.get_item("a").unwrap(), None);
    }

    #[test]
    fn test_keys_sorted_and_clear() {
        let backend = MemoryBackend::new();
        backend.set_item("b", "x").unwrap();
        backend.set_item("a", "y").unwrap();
        assert_eq!(backend.keys().unwrap(), vec!["a", "b"]);
        assert_eq!(backend.len().unwrap(), 2);

        backend.clear().unwrap();
        assert!(backend.is_empty().unwrap());
    }

    #[test]
    fn test_session_is_shared() {
        let first = MemoryBackend::session();
        let second = MemoryBackend::session();
        assert!(Arc::ptr_eq(&first, &second));

        first.set_item("memory-session-shared", "v").unwrap();
        assert_eq!(
            second.get_item("memory-session-shared").unwrap().as_deref(),
            Some("v")
        );
        first.remove_item("memory-session-shared").unwrap();
    }
}
