//! JSON encoding of the persisted account collection.
//!
//! The slot holds a JSON array of objects with the fields
//! `id`, `label`, `type`, `login` and `password`, in collection order.

use super::model::Account;
use crate::Result;

/// Encode the collection for the storage slot.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode(accounts: &[Account]) -> Result<String> {
    Ok(serde_json::to_string(accounts)?)
}

/// Decode a storage slot into a collection.
///
/// # Errors
///
/// Returns an error if `raw` is not a JSON array of accounts.
pub fn decode(raw: &str) -> Result<Vec<Account>> {
    Ok(serde_json::from_str(raw)?)
}
