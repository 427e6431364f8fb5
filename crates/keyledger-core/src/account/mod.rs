//! Account records.
//!
//! Provides the account model, partial updates, id generation and the JSON
//! codec for the persisted collection.

pub mod codec;
mod id;
mod model;
mod patch;

pub use id::IdGenerator;
pub use model::{Account, AccountId, AccountType, ParseAccountTypeError};
pub use patch::AccountPatch;
