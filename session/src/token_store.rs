//! Durable storage for the single session credential.
//!
//! DESIGN
//! ======
//! The store is a seam: the session only needs read/write/clear. An
//! unavailable medium degrades to a non-persistent session instead of
//! failing, so every implementation swallows its own I/O errors after
//! logging them.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::credential::Credential;

/// Persistence medium for the credential.
pub trait TokenStore: Send + Sync {
    /// Persisted credential, or `None` when absent or unreadable.
    fn read(&self) -> Option<Credential>;
    /// Persist `token`; a later `read` returns it.
    fn write(&self, token: &Credential);
    /// Remove any persisted credential.
    fn clear(&self);
}

// =============================================================================
// FILE STORE
// =============================================================================

/// Credential kept as the sole contents of one file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn try_write(&self, token: &Credential) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, token.as_str())
    }
}

impl TokenStore for FileTokenStore {
    fn read(&self) -> Option<Credential> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Credential::new(raw),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "token store unreadable; treating as empty");
                None
            }
        }
    }

    fn write(&self, token: &Credential) {
        if let Err(e) = self.try_write(token) {
            tracing::warn!(path = %self.path.display(), error = %e, "token store write failed; session will not persist");
        }
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "token store clear failed");
            }
        }
    }
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// Process-local store; nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<Credential>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `token`, as if persisted by an earlier run.
    #[must_use]
    pub fn with_token(token: Credential) -> Self {
        Self { token: Mutex::new(Some(token)) }
    }
}

impl TokenStore for MemoryTokenStore {
    fn read(&self) -> Option<Credential> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn write(&self, token: &Credential) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.clone());
    }

    fn clear(&self) {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

#[cfg(test)]
#[path = "token_store_test.rs"]
mod tests;
