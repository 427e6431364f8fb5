//! JSON-file slot storage.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace, warn};

use crate::{Error, KeyValueStorage, Result, quota};

/// Slot storage persisted to a single JSON object file.
///
/// The file holds `{ "<key>": "<value>", ... }`. Slots are read once on
/// [`open`](Self::open) and served from memory afterwards. Every write
/// rewrites the whole file through a temporary sibling and a rename.
///
/// A file that cannot be read or parsed does not prevent opening. Reads
/// then fail with [`Error::Corrupt`] and the file is left as it is until
/// the first successful write replaces it.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    slots: HashMap<String, String>,
    quota: Option<usize>,
    fault: Option<String>,
}

impl FileStorage {
    /// Open the storage file at `path`.
    ///
    /// A missing file is treated as empty storage; it is created on the
    /// first write, together with its parent directory. A file that exists
    /// but is not a JSON object of strings is recorded as a
    /// [`fault`](Self::fault).
    #[must_use]
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let (slots, fault) = match read_slots(&path) {
            Ok(slots) => {
                debug!("Opened slot storage at {} ({} slots)", path.display(), slots.len());
                (slots, None)
            }
            Err(e) => {
                warn!("Error reading slot storage at {}: {e}", path.display());
                (HashMap::new(), Some(e.to_string()))
            }
        };

        Self {
            path,
            slots,
            quota: None,
            fault,
        }
    }

    /// Limit total usage to `quota` bytes.
    #[must_use]
    pub fn with_quota(mut self, quota: usize) -> Self {
        self.quota = Some(quota);
        self
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Why the backing file could not be loaded, until a write replaces it.
    #[must_use]
    pub fn fault(&self) -> Option<&str> {
        self.fault.as_deref()
    }

    /// Bytes currently used by all slots.
    #[must_use]
    pub fn usage_bytes(&self) -> usize {
        quota::total_usage(&self.slots)
    }

    /// Write `slots` to disk, replacing the current file.
    fn flush(&self, slots: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(slots)?;
        let tmp = self.temp_path()?;
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let name = self
            .path
            .file_name()
            .ok_or_else(|| Error::Unavailable(format!("not a file path: {}", self.path.display())))?;
        let mut tmp_name = name.to_os_string();
        tmp_name.push(".tmp");
        Ok(self.path.with_file_name(tmp_name))
    }
}

fn read_slots(path: &Path) -> Result<HashMap<String, String>> {
    if !path.exists() {
        return Ok(HashMap::new());
    }

    let contents = fs::read_to_string(path)?;
    if contents.trim().is_empty() {
        return Ok(HashMap::new());
    }
    Ok(serde_json::from_str(&contents)?)
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        if let Some(fault) = &self.fault {
            return Err(Error::Corrupt(fault.clone()));
        }
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        quota::check(&self.slots, key, value, self.quota)?;

        let mut next = self.slots.clone();
        next.insert(key.to_string(), value.to_string());
        self.flush(&next)?;
        self.slots = next;
        self.fault = None;

        trace!("Wrote {} bytes to slot {key} in {}", value.len(), self.path.display());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        if !self.slots.contains_key(key) {
            return Ok(());
        }

        let mut next = self.slots.clone();
        next.remove(key);
        self.flush(&next)?;
        self.slots = next;
        Ok(())
    }
}
