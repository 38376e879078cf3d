//! Timestamped backup directories under a catalog's `archive/`.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::error::{Result, ScicatError};

/// Backup directory name format (compact ISO 8601).
pub const STAMP_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Create a fresh, uniquely named snapshot directory for time `now`.
///
/// A second backup within the same second gets a `-1`, `-2`, ... suffix, which
/// still sorts after the unsuffixed name.
pub fn create_snapshot_dir(archive: &Path, now: DateTime<Local>) -> Result<PathBuf> {
    fs::create_dir_all(archive).map_err(|e| ScicatError::io(archive, e))?;

    let stamp = now.format(STAMP_FORMAT).to_string();
    let mut attempt = 0usize;
    loop {
        let name = match attempt {
            0 => stamp.clone(),
            n => format!("{}-{}", stamp, n),
        };
        let dir = archive.join(name);
        match fs::create_dir(&dir) {
            Ok(()) => return Ok(dir),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
            Err(e) => return Err(ScicatError::io(&dir, e)),
        }
    }
}

/// List snapshot directories, oldest first.
pub fn list_snapshots(archive: &Path) -> Result<Vec<PathBuf>> {
    if !archive.exists() {
        return Ok(Vec::new());
    }

    let mut snapshots: Vec<PathBuf> = fs::read_dir(archive)
        .map_err(|e| ScicatError::io(archive, e))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();

    snapshots.sort();
    Ok(snapshots)
}

/// Most recent snapshot directory, if any.
pub fn latest_snapshot(archive: &Path) -> Result<Option<PathBuf>> {
    Ok(list_snapshots(archive)?.pop())
}

/// Delete a snapshot directory and everything in it.
pub fn remove_snapshot(dir: &Path) -> Result<()> {
    fs::remove_dir_all(dir).map_err(|e| ScicatError::io(dir, e))
}
