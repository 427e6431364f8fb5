//! Quota accounting shared by the backends.

use std::collections::HashMap;

use crate::{Error, Result};

/// Default quota, matching the usual per-origin local storage limit.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// Bytes a single slot occupies.
pub(crate) const fn slot_usage(key: &str, value: &str) -> usize {
    key.len() + value.len()
}

/// Bytes used by every slot in the map.
pub(crate) fn total_usage(slots: &HashMap<String, String>) -> usize {
    slots.iter().map(|(k, v)| slot_usage(k, v)).sum()
}

/// Check that replacing `key` with `value` stays within `quota`.
pub(crate) fn check(
    slots: &HashMap<String, String>,
    key: &str,
    value: &str,
    quota: Option<usize>,
) -> Result<()> {
    let Some(quota) = quota else {
        return Ok(());
    };

    let current = slots.get(key).map_or(0, |old| slot_usage(key, old));
    let required = total_usage(slots) - current + slot_usage(key, value);
    if required > quota {
        return Err(Error::QuotaExceeded { required, quota });
    }
    Ok(())
}
