//! Managed image directory
//!
//! Owns a single directory that an external drawing process fills with
//! images. Lookups only look at regular files directly inside it.

use super::naming::{validate_filename, RenamePattern};
use crate::error::{Error, Result};
use rand::Rng;
use std::borrow::Cow;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, SystemTime};

/// Number of random names tried before giving up on a rename
const MAX_RENAME_ATTEMPTS: usize = 16;

/// Snapshot of one file in the managed directory
#[derive(Debug, Clone)]
pub struct ImageEntry {
    /// Raw file name; not necessarily valid UTF-8
    pub name: OsString,
    pub path: PathBuf,
    pub modified: SystemTime,
    /// Birth time, or modification time where the filesystem has none
    pub created: SystemTime,
}

impl ImageEntry {
    fn from_path(path: PathBuf) -> Option<Self> {
        // The file may vanish between listing and stat; skip it quietly
        let metadata = fs::metadata(&path).ok()?;
        if !metadata.is_file() {
            return None;
        }
        let name = path.file_name()?.to_os_string();
        let modified = metadata.modified().ok()?;
        let created = metadata.created().unwrap_or(modified);
        Some(Self {
            name,
            path,
            modified,
            created,
        })
    }

    /// File name for output, with invalid UTF-8 replaced
    pub fn display_name(&self) -> Cow<'_, str> {
        self.name.to_string_lossy()
    }

    /// Time elapsed since creation, zero for timestamps in the future
    pub fn age_at(&self, now: SystemTime) -> Duration {
        now.duration_since(self.created).unwrap_or_default()
    }

    pub fn is_older_than(&self, max_age: Duration, now: SystemTime) -> bool {
        self.age_at(now) > max_age
    }
}

/// Outcome of a pruning pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PruneReport {
    pub removed: Vec<String>,
    pub kept: usize,
}

/// Filesystem-backed image store
#[derive(Debug)]
pub struct ImageStore {
    directory: PathBuf,
    /// Serializes the list-then-rename sequence of [`ImageStore::take_most_recent`]
    rename_lock: Mutex<()>,
}

impl ImageStore {
    /// Open the store, creating the directory (and parents) if missing
    pub fn open(directory: impl Into<PathBuf>) -> Result<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory).map_err(|source| Error::DirectoryCreate {
            path: directory.clone(),
            source,
        })?;
        tracing::debug!(directory = %directory.display(), "image store ready");

        Ok(Self {
            directory,
            rename_lock: Mutex::new(()),
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Rename the newest file to a randomized name and return that name
    ///
    /// Fails with [`Error::NotFound`] when the directory is missing or holds
    /// no regular files; nothing is touched in that case.
    pub fn take_most_recent(&self, pattern: &RenamePattern) -> Result<String> {
        self.take_most_recent_with(pattern, &mut rand::thread_rng())
    }

    pub(crate) fn take_most_recent_with<R: Rng + ?Sized>(
        &self,
        pattern: &RenamePattern,
        rng: &mut R,
    ) -> Result<String> {
        let _guard = self
            .rename_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if !self.directory.is_dir() {
            return Err(self.not_found("directory does not exist"));
        }

        let newest = self
            .entries()?
            .into_iter()
            .max_by_key(|entry| entry.modified)
            .ok_or_else(|| self.not_found("directory is empty"))?;

        let extension = newest.path.extension().map(|e| e.to_string_lossy());

        for _ in 0..MAX_RENAME_ATTEMPTS {
            let new_name = pattern.generate(rng, extension.as_deref());
            let new_path = self.directory.join(&new_name);
            if new_path.exists() {
                tracing::debug!(candidate = %new_name, "rename target taken, drawing again");
                continue;
            }

            fs::rename(&newest.path, &new_path)?;
            tracing::info!(from = %newest.display_name(), to = %new_name, "renamed most recent image");
            return Ok(new_name);
        }

        Err(Error::NameCollision {
            attempts: MAX_RENAME_ATTEMPTS,
        })
    }

    /// Whether a regular file with this name exists directly in the directory
    pub fn exists(&self, name: &str) -> bool {
        self.image_path(name).is_ok_and(|path| path.is_file())
    }

    /// Resolve a name to its full path without checking existence
    pub fn image_path(&self, name: &str) -> Result<PathBuf> {
        let name = validate_filename(name)?;
        Ok(self.directory.join(name))
    }

    /// Names of regular files ending with `extension` (case-insensitive), sorted
    ///
    /// Names that are not valid UTF-8 are listed lossily.
    pub fn list_images(&self, extension: &str) -> Result<Vec<String>> {
        if !self.directory.is_dir() {
            return Ok(Vec::new());
        }

        let wanted = extension.to_lowercase();
        let mut names: Vec<String> = self
            .entries()?
            .into_iter()
            .map(|entry| entry.display_name().into_owned())
            .filter(|name| name.to_lowercase().ends_with(&wanted))
            .collect();
        names.sort();
        Ok(names)
    }

    /// Delete every file created more than `max_age` ago
    ///
    /// A missing directory is logged and treated as nothing to do.
    pub fn prune_older_than(&self, max_age: Duration) -> Result<PruneReport> {
        self.prune_older_than_at(max_age, SystemTime::now())
    }

    pub(crate) fn prune_older_than_at(
        &self,
        max_age: Duration,
        now: SystemTime,
    ) -> Result<PruneReport> {
        if !self.directory.is_dir() {
            tracing::warn!(directory = %self.directory.display(), "image directory does not exist, nothing to prune");
            return Ok(PruneReport::default());
        }

        let mut report = PruneReport::default();
        for entry in self.entries()? {
            let name = entry.display_name();
            if !entry.is_older_than(max_age, now) {
                tracing::debug!(file = %name, max_age_secs = max_age.as_secs(), "file is newer than the limit");
                report.kept += 1;
                continue;
            }

            match fs::remove_file(&entry.path) {
                Ok(()) => {
                    tracing::info!(file = %name, "removed expired image");
                    report.removed.push(name.into_owned());
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(file = %name, error = %e, "failed to remove expired image");
                    report.kept += 1;
                }
            }
        }
        Ok(report)
    }

    /// Regular files directly under the directory
    fn entries(&self) -> io::Result<Vec<ImageEntry>> {
        let entries = fs::read_dir(&self.directory)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| ImageEntry::from_path(entry.path()))
            .collect();
        Ok(entries)
    }

    fn not_found(&self, reason: &'static str) -> Error {
        Error::NotFound {
            path: self.directory.clone(),
            reason,
        }
    }
}
