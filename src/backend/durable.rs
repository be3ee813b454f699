//! Durable backend using fjall.

use std::path::Path;

use fjall::{Keyspace, KeyspaceCreateOptions, PersistMode};

use crate::error::BackendError;
use crate::logging::{debug, error, info, trace};

use super::Backend;

/// Keyspace holding the backend's own bookkeeping.
const META_KEYSPACE: &str = "_meta";

/// Keyspace holding the stored records.
const SLOTS_KEYSPACE: &str = "slots";

const META_FORMAT_KEY: &str = "format";

/// On-disk layout version.
/// Increment this when changing the keyspace layout; opening a directory
/// written with another version fails.
const FORMAT_VERSION: u32 = 1;

/// A backend whose contents survive process restarts.
///
/// Every write is persisted with [`PersistMode::SyncAll`] before returning.
///
/// # Example
///
/// ```ignore
/// use typed_storage::{Backend, DurableBackend};
///
/// let backend = DurableBackend::open(".typed-storage")?;
/// backend.set_item("theme", "__strn__|dark")?;
/// drop(backend);
///
/// let backend = DurableBackend::open(".typed-storage")?;
/// assert_eq!(backend.get_item("theme")?.as_deref(), Some("__strn__|dark"));
/// ```
pub struct DurableBackend {
    db: fjall::Database,
    slots: Keyspace,
}

impl DurableBackend {
    /// Open the store at `path`, creating it when the directory is new.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BackendError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening durable backend");

        let db = fjall::Database::builder(path).open()?;
        let meta = db.keyspace(META_KEYSPACE, KeyspaceCreateOptions::default)?;

        match meta.get(META_FORMAT_KEY)? {
            Some(format) => {
                let found = <[u8; 4]>::try_from(format.as_ref())
                    .map(u32::from_le_bytes)
                    .map_err(|_| BackendError::FormatMismatch {
                        expected: FORMAT_VERSION,
                        found: format!("{} bytes", format.len()),
                    })?;
                if found != FORMAT_VERSION {
                    error!(
                        stored_version = found,
                        expected_version = FORMAT_VERSION,
                        "storage format mismatch"
                    );
                    return Err(BackendError::FormatMismatch {
                        expected: FORMAT_VERSION,
                        found: found.to_string(),
                    });
                }
                trace!(version = found, "storage format verified");
            }
            None => {
                meta.insert(META_FORMAT_KEY, FORMAT_VERSION.to_le_bytes())?;
                db.persist(PersistMode::SyncAll)?;
                info!(path = %path.display(), version = FORMAT_VERSION, "durable backend initialized");
            }
        }

        let slots = db.keyspace(SLOTS_KEYSPACE, KeyspaceCreateOptions::default)?;
        info!(path = %path.display(), "durable backend opened");
        Ok(Self { db, slots })
    }
}

impl Backend for DurableBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, BackendError> {
        let Some(bytes) = self.slots.get(key)? else {
            return Ok(None);
        };
        String::from_utf8(bytes.to_vec())
            .map(Some)
            .map_err(|_| BackendError::InvalidUtf8 {
                key: key.to_string(),
            })
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), BackendError> {
        self.slots.insert(key, value.as_bytes())?;
        self.db.persist(PersistMode::SyncAll)?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), BackendError> {
        self.slots.remove(key)?;
        self.db.persist(PersistMode::SyncAll)?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, BackendError> {
        let mut keys = Vec::new();
        for kv in self.slots.iter() {
            let key_bytes = kv.key()?;
            keys.push(String::from_utf8_lossy(&key_bytes).into_owned());
        }
        Ok(keys)
    }

    fn clear(&self) -> Result<(), BackendError> {
        let keys = self
            .slots
            .iter()
            .map(|kv| kv.key().map(|k| k.to_vec()))
            .collect::<Result<Vec<_>, _>>()?;
        trace!(key_count = keys.len(), "clearing durable backend");
        for k in keys {
            self.slots.remove(&k)?;
        }
        self.db.persist(PersistMode::SyncAll)?;
        Ok(())
    }
}
