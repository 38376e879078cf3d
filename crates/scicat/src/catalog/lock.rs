//! Advisory single-writer locking.
//!
//! A lock records the identity of the editor holding it. It is checked only when
//! a catalog is opened for writing and never expires; a lock left behind by a
//! crashed session has to be removed by hand.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{Result, ScicatError};

/// Advisory mutual exclusion between catalog editors.
pub trait AdvisoryLock: Send + Sync {
    /// Identity of the current holder, if any.
    fn holder(&self) -> Result<Option<String>>;

    /// Take the lock for `owner`, failing with [`ScicatError::Locked`] if it is held.
    fn acquire(&self, owner: &str) -> Result<()>;

    /// Give the lock up. Releasing a free lock is not an error.
    fn release(&self) -> Result<()>;
}

/// Lock backed by a marker file that holds the editor's identity.
#[derive(Debug, Clone)]
pub struct MarkerFileLock {
    path: PathBuf,
}

impl MarkerFileLock {
    /// Lock using the marker file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the marker file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AdvisoryLock for MarkerFileLock {
    fn holder(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(
                contents.lines().next().unwrap_or("").trim().to_string(),
            )),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ScicatError::io(&self.path, e)),
        }
    }

    fn acquire(&self, owner: &str) -> Result<()> {
        // create_new makes check-and-create a single step
        let file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path);

        match file {
            Ok(mut file) => file
                .write_all(owner.as_bytes())
                .map_err(|e| ScicatError::io(&self.path, e)),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(ScicatError::Locked {
                holder: self.holder()?.unwrap_or_default(),
            }),
            Err(e) => Err(ScicatError::io(&self.path, e)),
        }
    }

    fn release(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ScicatError::io(&self.path, e)),
        }
    }
}

/// In-process lock. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryLock {
    holder: Arc<Mutex<Option<String>>>,
}

impl MemoryLock {
    /// Create a free lock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a lock already held by `owner`.
    pub fn held_by(owner: impl Into<String>) -> Self {
        Self {
            holder: Arc::new(Mutex::new(Some(owner.into()))),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.holder.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl AdvisoryLock for MemoryLock {
    fn holder(&self) -> Result<Option<String>> {
        Ok(self.state().clone())
    }

    fn acquire(&self, owner: &str) -> Result<()> {
        let mut state = self.state();
        if let Some(holder) = state.as_ref() {
            return Err(ScicatError::Locked {
                holder: holder.clone(),
            });
        }
        *state = Some(owner.to_string());
        Ok(())
    }

    fn release(&self) -> Result<()> {
        *self.state() = None;
        Ok(())
    }
}
