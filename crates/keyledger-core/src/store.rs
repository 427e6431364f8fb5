//! The persisted, observable account store.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error, warn};

use keyledger_storage::{FileStorage, KeyValueStorage};

use crate::account::{Account, AccountId, AccountPatch, IdGenerator, codec};
use crate::config::{DEFAULT_STORAGE_KEY, StoreConfig};
use crate::view::{AccountsView, Snapshot};
use crate::Result;

/// Whether the storage slot matches the in-memory collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// The last save succeeded, or the slot was loaded as-is.
    Synced,
    /// The slot holds something else: a save failed, or the slot could not
    /// be loaded and the store started empty.
    Diverged,
}

/// Ordered collection of accounts mirrored to one storage slot.
///
/// The collection is read from the slot once, when the store is opened.
/// Afterwards memory is the source of truth: every mutation rewrites the
/// whole slot and publishes a new snapshot to subscribers.
///
/// The plain mutations never fail. A failed save is logged, the change
/// stays in memory, and [`sync_status`](Self::sync_status) reports
/// [`SyncStatus::Diverged`] until a later save succeeds. The `try_*`
/// variants apply the same change but also return the save error.
#[derive(Debug)]
pub struct AccountStore<S: KeyValueStorage> {
    storage: S,
    key: String,
    accounts: Vec<Account>,
    ids: IdGenerator,
    status: SyncStatus,
    tx: watch::Sender<Snapshot>,
}

impl<S: KeyValueStorage> AccountStore<S> {
    /// Open a store on the default `"accounts"` slot.
    #[must_use]
    pub fn open(storage: S) -> Self {
        Self::open_with(storage, DEFAULT_STORAGE_KEY, IdGenerator::new())
    }

    /// Open a store on a custom slot.
    #[must_use]
    pub fn open_with_key(storage: S, key: impl Into<String>) -> Self {
        Self::open_with(storage, key, IdGenerator::new())
    }

    /// Open a store on a custom slot with a custom id source.
    ///
    /// A missing slot gives an empty collection. A slot that cannot be
    /// read or decoded is logged and also gives an empty collection; its
    /// content is left in place until the next save overwrites it.
    #[must_use]
    pub fn open_with(storage: S, key: impl Into<String>, mut ids: IdGenerator) -> Self {
        let key = key.into();
        let (accounts, status) = load(&storage, &key);
        for account in &accounts {
            ids.observe(&account.id);
        }

        let (tx, _) = watch::channel(snapshot(&accounts));
        Self {
            storage,
            key,
            accounts,
            ids,
            status,
            tx,
        }
    }

    /// All accounts in insertion order.
    #[must_use]
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Look up an account by id.
    #[must_use]
    pub fn get(&self, id: &AccountId) -> Option<&Account> {
        self.accounts.iter().find(|account| account.id == *id)
    }

    /// Number of accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Whether the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Register an observer of the collection.
    #[must_use]
    pub fn subscribe(&self) -> AccountsView {
        AccountsView::new(self.tx.subscribe())
    }

    /// Whether the slot currently matches memory.
    #[must_use]
    pub const fn sync_status(&self) -> SyncStatus {
        self.status
    }

    /// Key of the storage slot.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.key
    }

    /// The underlying storage.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Consume the store and return its storage.
    #[must_use]
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Append a blank local account and return its id.
    pub fn add_account(&mut self) -> AccountId {
        let id = self.insert_blank();
        self.commit_or_log();
        id
    }

    /// Remove the account with `id`. Returns whether one was removed.
    ///
    /// The slot is rewritten even when nothing matched.
    pub fn remove_account(&mut self, id: &AccountId) -> bool {
        let removed = self.take(id);
        self.commit_or_log();
        removed
    }

    /// Merge `patch` into the account with `id`, keeping its position.
    ///
    /// Returns `false`, without saving, when no account has that id.
    pub fn update_account(&mut self, id: &AccountId, patch: AccountPatch) -> bool {
        if !self.patch(id, patch) {
            return false;
        }
        self.commit_or_log();
        true
    }

    /// Like [`add_account`](Self::add_account), but report a failed save.
    ///
    /// # Errors
    ///
    /// Returns the save error. The account is still appended and is the
    /// last entry of [`accounts`](Self::accounts).
    pub fn try_add_account(&mut self) -> Result<AccountId> {
        let id = self.insert_blank();
        self.commit()?;
        Ok(id)
    }

    /// Like [`remove_account`](Self::remove_account), but report a failed save.
    ///
    /// # Errors
    ///
    /// Returns the save error. The account is removed from memory regardless.
    pub fn try_remove_account(&mut self, id: &AccountId) -> Result<bool> {
        let removed = self.take(id);
        self.commit()?;
        Ok(removed)
    }

    /// Like [`update_account`](Self::update_account), but report a failed save.
    ///
    /// # Errors
    ///
    /// Returns the save error. The patch is applied in memory regardless.
    pub fn try_update_account(&mut self, id: &AccountId, patch: AccountPatch) -> Result<bool> {
        if !self.patch(id, patch) {
            return Ok(false);
        }
        self.commit()?;
        Ok(true)
    }

    fn insert_blank(&mut self) -> AccountId {
        let id = self.fresh_id();
        self.accounts.push(Account::new(id.clone()));
        debug!("Added account {id}");
        id
    }

    fn fresh_id(&mut self) -> AccountId {
        let id = self.ids.next_id();
        if self.get(&id).is_none() {
            return id;
        }
        // Only reachable once the generator has saturated at i64::MAX.
        let base = id.to_string();
        (1u64..)
            .map(|n| AccountId::new(format!("{base}-{n}")))
            .find(|candidate| self.get(candidate).is_none())
            .unwrap_or(id)
    }

    fn take(&mut self, id: &AccountId) -> bool {
        match self.accounts.iter().position(|account| account.id == *id) {
            Some(index) => {
                self.accounts.remove(index);
                debug!("Removed account {id}");
                true
            }
            None => {
                debug!("No account {id} to remove");
                false
            }
        }
    }

    fn patch(&mut self, id: &AccountId, patch: AccountPatch) -> bool {
        match self.accounts.iter_mut().find(|account| account.id == *id) {
            Some(account) => {
                patch.apply(account);
                debug!("Updated account {id}");
                true
            }
            None => {
                debug!("No account {id} to update");
                false
            }
        }
    }

    /// Publish the new collection, then save it.
    fn commit(&mut self) -> Result<()> {
        self.tx.send_replace(snapshot(&self.accounts));

        let saved = self.save();
        self.status = if saved.is_ok() {
            SyncStatus::Synced
        } else {
            SyncStatus::Diverged
        };
        saved
    }

    fn commit_or_log(&mut self) {
        if let Err(e) = self.commit() {
            error!("Error saving accounts to slot {}: {e}", self.key);
        }
    }

    fn save(&mut self) -> Result<()> {
        let raw = codec::encode(&self.accounts)?;
        self.storage.set(&self.key, &raw)?;
        Ok(())
    }
}

impl AccountStore<FileStorage> {
    /// Open a file-backed store as described by `config`.
    ///
    /// A damaged storage file is handled like a corrupt slot: the store
    /// opens empty and the file is replaced by the first successful save.
    #[must_use]
    pub fn open_configured(config: &StoreConfig) -> Self {
        let mut storage = FileStorage::open(config.storage_path());
        if let Some(quota) = config.quota_bytes {
            storage = storage.with_quota(quota);
        }
        Self::open_with_key(storage, config.storage_key.clone())
    }
}

fn snapshot(accounts: &[Account]) -> Snapshot {
    Arc::from(accounts)
}

/// Read the collection from the slot.
fn load<S: KeyValueStorage>(storage: &S, key: &str) -> (Vec<Account>, SyncStatus) {
    let raw = match storage.get(key) {
        Ok(Some(raw)) if !raw.is_empty() => raw,
        Ok(_) => {
            debug!("No saved accounts in slot {key}");
            return (Vec::new(), SyncStatus::Synced);
        }
        Err(e) => {
            warn!("Error reading accounts from slot {key}: {e}");
            return (Vec::new(), SyncStatus::Diverged);
        }
    };

    match codec::decode(&raw) {
        Ok(accounts) => {
            let (accounts, dropped) = dedup_ids(accounts);
            if dropped > 0 {
                warn!("Dropped {dropped} accounts with duplicate ids from slot {key}");
                return (accounts, SyncStatus::Diverged);
            }
            debug!("Loaded {} accounts from slot {key}", accounts.len());
            (accounts, SyncStatus::Synced)
        }
        Err(e) => {
            warn!("Error loading accounts from slot {key}: {e}");
            (Vec::new(), SyncStatus::Diverged)
        }
    }
}

/// Keep the first account for every id.
fn dedup_ids(accounts: Vec<Account>) -> (Vec<Account>, usize) {
    let total = accounts.len();
    let mut seen = HashSet::with_capacity(total);
    let kept: Vec<Account> = accounts
        .into_iter()
        .filter(|account| seen.insert(account.id.clone()))
        .collect();
    let dropped = total - kept.len();
    (kept, dropped)
}
