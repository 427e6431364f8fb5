//! In-memory slot storage.

use std::collections::HashMap;

use tracing::trace;

use crate::{KeyValueStorage, Result, quota};

/// Slot storage held in a process-local map.
///
/// Nothing survives the process. Useful for tests and for stores that only
/// need the observer and bookkeeping behavior.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Create an empty storage without a quota.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty storage that refuses writes beyond `quota` bytes.
    #[must_use]
    pub fn with_quota(quota: usize) -> Self {
        Self {
            slots: HashMap::new(),
            quota: Some(quota),
        }
    }

    /// Bytes currently used by all slots.
    #[must_use]
    pub fn usage_bytes(&self) -> usize {
        quota::total_usage(&self.slots)
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slot has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        quota::check(&self.slots, key, value, self.quota)?;
        self.slots.insert(key.to_string(), value.to_string());
        trace!("Wrote {} bytes to memory slot {key}", value.len());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.slots.remove(key);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn missing_key_reads_none() {
        let storage = MemoryStorage::new();
        assert!(storage.get("accounts").unwrap().is_none());
        assert!(storage.is_empty());
    }

    #[test]
    fn set_overwrites_previous_value() {
        let mut storage = MemoryStorage::new();
        storage.set("accounts", "[1]").unwrap();
        storage.set("accounts", "[2]").unwrap();
        assert_eq!(storage.get("accounts").unwrap().as_deref(), Some("[2]"));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn remove_missing_key_is_ok() {
        let mut storage = MemoryStorage::new();
        storage.remove("nothing").unwrap();
        storage.set("a", "b").unwrap();
        storage.remove("a").unwrap();
        assert!(storage.get("a").unwrap().is_none());
    }

    #[test]
    fn quota_rejection_keeps_old_value() {
        let mut storage = MemoryStorage::with_quota(12);
        storage.set("accounts", "[]").unwrap();
        let err = storage.set("accounts", "[1,2,3,4,5]").unwrap_err();
        assert!(matches!(err, Error::QuotaExceeded { .. }));
        assert_eq!(storage.get("accounts").unwrap().as_deref(), Some("[]"));
        assert_eq!(storage.usage_bytes(), 10);
    }
}
