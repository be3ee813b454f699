//! Typed values over string-only key-value storage.
//!
//! typed-storage keeps dates, regular expressions, numbers, booleans,
//! strings and JSON values in a backend that only stores strings, in the
//! manner of browser session/local storage. Each value is written as a
//! tagged record (`__numb__|42`, `__strn__|hello`, ...) so its kind survives
//! the round trip.
//!
//! # Module Organization
//!
//! - [`value`]: Typed values and patterns
//! - [`codec`]: The tagged record format
//! - [`backend`]: Raw string backends (in-memory session, fjall-backed durable)
//! - [`store`]: The typed store
//! - [`binding`]: Read/set/remove handles bound to one key
//! - [`config`]: TOML configuration
//! - [`error`]: Unified error types
//! - [`prelude`]: Convenient re-exports
//! - `logging`: Conditional logging macros (internal)
//!
//! # Features
//!
//! - `kv` (default): Durable backend backed by fjall
//! - `logging`: Enable tracing-based logging
//! - `cli`: The `typed-storage` command-line binary
//!
//! # Example
//!
//! ```ignore
//! use typed_storage::prelude::*;
//!
//! let store = TypedStore::session();
//! store.set("greeting", "hello")?;
//! store.set("launched", chrono::Utc::now())?;
//! store.set("filter", Pattern::with_flags("^a", "i"))?;
//!
//! let greeting = store.get("greeting")?;
//! ```

pub mod backend;
pub mod binding;
pub mod codec;
pub mod config;
pub mod error;
#[macro_use]
pub(crate) mod logging;
pub mod prelude;
pub mod store;
pub mod value;

// Re-export unified error types
pub use error::{BackendError, CodecError, ConfigError, Error, Result};

#[cfg(feature = "kv")]
pub use backend::DurableBackend;
pub use backend::{Backend, MemoryBackend};
pub use binding::Binding;
pub use config::{CodecConfig, Config};
pub use store::TypedStore;
pub use value::{Pattern, TypedValue, ValueKind};
