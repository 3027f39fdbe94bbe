//! File-backed high-score store
//!
//! The leaderboard is a JSON array on disk and the file is the only source of
//! truth: every operation re-reads it. Writes go to a sibling `.tmp` file that
//! is renamed over the target, so readers never see a partial file. A file
//! that cannot be parsed is moved aside to `<file>.backup.<epoch-ms>` and the
//! store starts over empty.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use catch_core::constants::{MAX_LISTED_SCORES, MAX_STORED_SCORES};
use catch_core::ScoreEntry;
use chrono::{SecondsFormat, Utc};
use serde_json::Value;
use thiserror::Error;

pub mod validation;

pub use validation::{entry_from_value, submission_from_value, InvalidSubmission};

/// Default file name inside the data directory
pub const DEFAULT_FILE_NAME: &str = "high-scores.json";

/// Backup names tried before giving up on a recovery
const MAX_BACKUP_ATTEMPTS: i64 = 100;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to create storage directory {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("Failed to read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("Failed to move {} into place: {source}", .path.display())]
    Rename { path: PathBuf, source: io::Error },

    #[error("Failed to serialize scores: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Leaderboard persisted in a single JSON file
#[derive(Debug)]
pub struct ScoreStore {
    path: PathBuf,
    // Serialises load-mutate-save cycles within this process
    lock: Mutex<()>,
}

impl ScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(DEFAULT_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the transient file used while writing
    pub fn temp_path(&self) -> PathBuf {
        let mut os = self.path.as_os_str().to_owned();
        os.push(".tmp");
        PathBuf::from(os)
    }

    /// Read all valid entries, initialising or recovering the file as needed.
    ///
    /// Corrupted content never produces an error; only failures to create the
    /// directory or read an existing file do.
    pub fn load(&self) -> Result<Vec<ScoreEntry>, StoreError> {
        let _guard = self.guard();
        self.load_unlocked()
    }

    /// Atomically replace the file with `entries`
    pub fn save(&self, entries: &[ScoreEntry]) -> Result<(), StoreError> {
        let _guard = self.guard();
        self.save_unlocked(entries)
    }

    /// Record a new score: load, append, sort, keep the top 50, save.
    pub fn submit(&self, name: &str, score: u64) -> Result<ScoreEntry, StoreError> {
        let _guard = self.guard();
        let mut entries = self.load_unlocked()?;

        let entry = ScoreEntry {
            name: name.to_string(),
            score,
            timestamp: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)),
        };
        entries.push(entry.clone());
        rank(&mut entries, MAX_STORED_SCORES);

        self.save_unlocked(&entries)?;
        tracing::info!(
            "Recorded score {} for {} ({} entries stored)",
            score,
            name,
            entries.len()
        );
        Ok(entry)
    }

    /// Highest `limit` scores, best first
    pub fn top(&self, limit: usize) -> Result<Vec<ScoreEntry>, StoreError> {
        let mut entries = self.load()?;
        rank(&mut entries, limit);
        Ok(entries)
    }

    /// The public leaderboard
    pub fn leaderboard(&self) -> Result<Vec<ScoreEntry>, StoreError> {
        self.top(MAX_LISTED_SCORES)
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn load_unlocked(&self) -> Result<Vec<ScoreEntry>, StoreError> {
        self.ensure_dir()?;

        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!("Creating empty score file at {}", self.path.display());
                self.save_unlocked(&[])?;
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        match serde_json::from_slice::<Value>(&raw) {
            Ok(Value::Array(items)) => {
                let total = items.len();
                let entries: Vec<ScoreEntry> = items.iter().filter_map(entry_from_value).collect();
                if entries.len() != total {
                    tracing::warn!(
                        "Dropped {} invalid entries from {}",
                        total - entries.len(),
                        self.path.display()
                    );
                }
                Ok(entries)
            }
            Ok(other) => {
                self.recover(&format!("expected an array, found {}", json_kind(&other)));
                Ok(Vec::new())
            }
            Err(e) => {
                self.recover(&e.to_string());
                Ok(Vec::new())
            }
        }
    }

    /// Move a corrupted file aside and start from an empty leaderboard.
    ///
    /// The file is only reset once the backup rename succeeded; otherwise it
    /// is left in place untouched.
    fn recover(&self, reason: &str) {
        let Some(backup) = self.free_backup_path() else {
            tracing::error!(
                "Score file {} is corrupted ({}) but no free backup name was found; leaving it in place",
                self.path.display(),
                reason
            );
            return;
        };

        tracing::warn!(
            "Score file {} is corrupted ({}); backing up to {}",
            self.path.display(),
            reason,
            backup.display()
        );
        if let Err(e) = fs::rename(&self.path, &backup) {
            tracing::error!(
                "Failed to back up corrupted score file, leaving it in place: {}",
                e
            );
            return;
        }
        if let Err(e) = self.save_unlocked(&[]) {
            tracing::error!("Failed to reinitialise score file: {}", e);
        }
    }

    /// First unused `<file>.backup.<epoch-ms>` name, counting up from now.
    /// An existing backup is never replaced.
    fn free_backup_path(&self) -> Option<PathBuf> {
        let now = Utc::now().timestamp_millis();
        (0..MAX_BACKUP_ATTEMPTS)
            .map(|offset| {
                let mut backup = self.path.as_os_str().to_owned();
                backup.push(format!(".backup.{}", now + offset));
                PathBuf::from(backup)
            })
            .find(|candidate| fs::symlink_metadata(candidate).is_err())
    }

    fn save_unlocked(&self, entries: &[ScoreEntry]) -> Result<(), StoreError> {
        self.ensure_dir()?;
        let json = serde_json::to_string_pretty(entries)?;
        let tmp = self.temp_path();

        write_private(&tmp, json.as_bytes()).map_err(|source| StoreError::Write {
            path: tmp.clone(),
            source,
        })?;

        if let Err(source) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(StoreError::Rename {
                path: self.path.clone(),
                source,
            });
        }
        tracing::debug!("Saved {} entries to {}", entries.len(), self.path.display());
        Ok(())
    }

    fn ensure_dir(&self) -> Result<(), StoreError> {
        let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) else {
            return Ok(());
        };
        if dir.is_dir() {
            return Ok(());
        }
        create_private_dir(dir).map_err(|source| StoreError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
        tracing::info!("Created storage directory {}", dir.display());
        Ok(())
    }
}

/// Stable sort best-first, then cap the length
pub fn rank(entries: &mut Vec<ScoreEntry>, limit: usize) {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(limit);
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}

#[cfg(unix)]
fn write_private(path: &Path, bytes: &[u8]) -> io::Result<()> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies when the file is created
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(bytes)?;
    file.sync_all()
}

#[cfg(not(unix))]
fn write_private(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
