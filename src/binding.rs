//! A key bound to a store: read, set and remove without repeating the key.

use crate::backend::Backend;
use crate::error::Result;
use crate::store::TypedStore;
use crate::value::TypedValue;

/// Handle to one key of a [`TypedStore`] plus the default to read back.
///
/// Nothing is cached: every [`read`](Self::read) goes to the store, so the
/// handle always reflects the current record.
///
/// # Example
///
/// ```ignore
/// use typed_storage::{TypedStore, TypedValue};
///
/// let store = TypedStore::session();
/// let theme = store.bind("theme", Some("light".into()));
///
/// assert_eq!(theme.read()?, Some(TypedValue::from("light")));
/// theme.set("dark")?;
/// assert_eq!(theme.read()?, Some(TypedValue::from("dark")));
/// theme.remove()?;
/// ```
pub struct Binding<'a, B> {
    store: &'a TypedStore<B>,
    key: String,
    default: Option<TypedValue>,
}

impl<'a, B: Backend> Binding<'a, B> {
    pub(crate) fn new(store: &'a TypedStore<B>, key: String, default: Option<TypedValue>) -> Self {
        Self {
            store,
            key,
            default,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn default_value(&self) -> Option<&TypedValue> {
        self.default.as_ref()
    }

    /// The current value, or the bound default when the store yields none.
    pub fn read(&self) -> Result<Option<TypedValue>> {
        Ok(self.store.get(&self.key)?.or_else(|| self.default.clone()))
    }

    pub fn set(&self, value: impl Into<TypedValue>) -> Result<()> {
        self.store.set(&self.key, value)
    }

    pub fn remove(&self) -> Result<()> {
        self.store.remove(&self.key)
    }
}
