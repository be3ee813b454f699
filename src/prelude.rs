//! Convenient re-exports for common usage patterns.
//!
//! ```ignore
//! use typed_storage::prelude::*;
//!
//! let store = TypedStore::session();
//! store.set("count", 1)?;
//! ```

// Unified error handling
pub use crate::error::{Error, Result};

// Store and values
pub use crate::binding::Binding;
pub use crate::config::{CodecConfig, Config};
pub use crate::store::TypedStore;
pub use crate::value::{Pattern, TypedValue, ValueKind};

// Backends
#[cfg(feature = "kv")]
pub use crate::backend::DurableBackend;
pub use crate::backend::{Backend, MemoryBackend};
