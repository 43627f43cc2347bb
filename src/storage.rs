//! Persistent key/value storage for session state.
//!
//! SYSTEM CONTEXT
//! ==============
//! The session gate keeps exactly one durable value, the auth token, under
//! [`AUTH_TOKEN_KEY`]. Storage is a string key/value seam so the gate can run
//! against [`MemoryStore`] in tests while the CLI uses [`FileStore`].
//!
//! FILE FORMAT
//! ===========
//! `FileStore` keeps a flat JSON object of string values. Writes go to a
//! sibling temp file that is renamed over the original, so a crash mid-write
//! leaves the previous contents intact.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Key holding the session token.
pub const AUTH_TOKEN_KEY: &str = "authToken";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io failed at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("storage file {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// String key/value store, shaped after browser `localStorage`.
pub trait KeyValueStore {
    /// Read `key`, returning `None` when it was never set or has been removed.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backing medium cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// # Errors
    ///
    /// Returns a [`StorageError`] when the value cannot be persisted.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the backing medium cannot be updated.
    fn remove_item(&mut self, key: &str) -> Result<(), StorageError>;
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// Process-local store. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: BTreeMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a single entry.
    #[must_use]
    pub fn with_item(key: &str, value: &str) -> Self {
        let mut items = BTreeMap::new();
        items.insert(key.to_owned(), value.to_owned());
        Self { items }
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.items.remove(key);
        Ok(())
    }
}

// =============================================================================
// FILE STORE
// =============================================================================

/// JSON-file-backed store. Every operation reads the file fresh.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StorageError {
        StorageError::Io { path: self.path.clone(), source }
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(self.io_error(e)),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|source| StorageError::Corrupt { path: self.path.clone(), source })
    }

    fn save(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let rendered = serde_json::to_vec_pretty(items)
            .map_err(|source| StorageError::Corrupt { path: self.path.clone(), source })?;

        let tmp_path = self.tmp_path();
        match fs::remove_file(&tmp_path) {
            Ok(()) => tracing::debug!(path = %tmp_path.display(), "removed stale temp file"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(self.io_error(e)),
        }
        let mut file = open_private(&tmp_path).map_err(|e| self.io_error(e))?;
        file.write_all(&rendered).map_err(|e| self.io_error(e))?;
        file.sync_all().map_err(|e| self.io_error(e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| self.io_error(e))
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(ToOwned::to_owned).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    /// A corrupt file is replaced, since nothing in it can be read back anyway.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = match self.load() {
            Ok(items) => items,
            Err(e @ StorageError::Corrupt { .. }) => {
                tracing::warn!(error = %e, "overwriting corrupt storage file");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        items.insert(key.to_owned(), value.to_owned());
        self.save(&items)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        let mut items = self.load()?;
        if items.remove(key).is_none() {
            return Ok(());
        }
        self.save(&items)
    }
}

/// The token file is readable by its owner only. The file must not exist yet,
/// so the mode always applies.
#[cfg(unix)]
fn open_private(path: &Path) -> io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new().write(true).create_new(true).mode(0o600).open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> io::Result<fs::File> {
    fs::OpenOptions::new().write(true).create_new(true).open(path)
}
