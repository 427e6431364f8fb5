//! # keyledger-core
//!
//! Persisted, observable collection of login accounts.
//!
//! This crate provides:
//! - The account model (label, LDAP/local type, login, password)
//! - Partial updates through [`AccountPatch`]
//! - [`AccountStore`], which mirrors the collection to a storage slot
//! - Live read access through [`AccountsView`]
//! - File-backed configuration through [`StoreConfig`]
//!
//! ## Example
//!
//! ```ignore
//! use keyledger_core::{AccountPatch, AccountStore};
//! use keyledger_storage::MemoryStorage;
//!
//! let mut store = AccountStore::open(MemoryStorage::new());
//! let view = store.subscribe();
//!
//! let id = store.add_account();
//! store.update_account(&id, AccountPatch::new().login("alice").password("secret"));
//! assert_eq!(view.current()[0].login, "alice");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod account;
pub mod config;
mod error;
mod store;
mod view;

pub use account::{Account, AccountId, AccountPatch, AccountType, IdGenerator};
pub use config::StoreConfig;
pub use error::{Error, Result};
pub use store::{AccountStore, SyncStatus};
pub use view::{AccountsView, Snapshot};
