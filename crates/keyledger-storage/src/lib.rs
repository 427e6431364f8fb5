//! # keyledger-storage
//!
//! Durable string key-value slots, the persistence layer under the
//! `keyledger` account store.
//!
//! Every backend exposes the same small surface as a browser's local
//! storage: string keys, string values, whole-value reads and overwrites.
//!
//! ## Backends
//!
//! - [`MemoryStorage`]: process-local map, used in tests and for ephemeral stores
//! - [`FileStorage`]: all slots kept in one JSON object file, rewritten atomically
//!
//! Both accept an optional quota in bytes. A write that would push total
//! usage over the quota fails with [`Error::QuotaExceeded`] and leaves the
//! previous value of the slot untouched.
//!
//! ## Example
//!
//! ```ignore
//! use keyledger_storage::{KeyValueStorage, MemoryStorage};
//!
//! let mut storage = MemoryStorage::with_quota(1024);
//! storage.set("accounts", "[]")?;
//! assert_eq!(storage.get("accounts")?.as_deref(), Some("[]"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod error;
mod file;
mod memory;
mod quota;

pub use error::{Error, Result};
pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use quota::DEFAULT_QUOTA_BYTES;

/// A store of named string slots.
///
/// Reads return `Ok(None)` for a key that was never written. Writes replace
/// the whole value of a slot.
pub trait KeyValueStorage {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::QuotaExceeded`] if the write does not fit, or an
    /// I/O error if the backend cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Delete the slot stored under `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&mut self, key: &str) -> Result<()>;
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}
