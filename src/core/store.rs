//! Persistent directory store.
//!
//! The whole entry collection lives in memory behind one `RwLock` and is
//! persisted as a single binary blob (see [`crate::core::codec`]). Writes are
//! staged at `<file>.tmp` and renamed over the live file, so readers never
//! observe a partially written store.

use crate::core::codec;
use crate::core::entry::Entry;
use crate::core::error::GozelleError;
use crate::core::maintenance;
use crate::core::time::now_epoch_secs;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Capability interface every store backend provides.
///
/// Mutation helpers (`ops`) and the query engine only talk to this trait, so
/// an alternate backing format can be swapped in without touching them.
pub trait DirectoryStore {
    /// Appends a new entry in memory only. Call [`save`](Self::save) to persist.
    fn add(&self, path: &str) -> Result<Entry, GozelleError>;
    /// Appends a new entry and persists before returning.
    fn add_and_save(&self, path: &str) -> Result<Entry, GozelleError>;
    fn get(&self, path: &str) -> Result<Entry, GozelleError>;
    /// Snapshot of every entry, in storage order.
    fn all(&self) -> Result<Vec<Entry>, GozelleError>;
    fn len(&self) -> Result<usize, GozelleError>;
    fn is_empty(&self) -> Result<bool, GozelleError> {
        Ok(self.len()? == 0)
    }
    /// Removes every record with `path`, preserving order, and persists.
    /// Returns the number of records dropped.
    fn remove(&self, path: &str) -> Result<usize, GozelleError>;
    /// O(1) removal by index; the last entry takes its slot. Not persisted.
    fn swap_remove(&self, index: usize) -> Result<Entry, GozelleError>;
    /// O(1) removal of the first entry with `path` once it is located. Not persisted.
    fn swap_remove_path(&self, path: &str) -> Result<Entry, GozelleError>;
    /// Records a visit on the first entry with `path`. Not persisted.
    fn visit(&self, path: &str, now: i64) -> Result<Entry, GozelleError>;
    /// Records a visit on the record at `index`, which must still hold `path`.
    /// If the slot moved since the caller's snapshot, the first record with
    /// `path` is used instead. Not persisted.
    fn visit_at(&self, index: usize, path: &str, now: i64) -> Result<Entry, GozelleError>;
    /// Persists when dirty. Returns whether bytes were written.
    fn save(&self) -> Result<bool, GozelleError>;
    fn sort_by_path(&self) -> Result<(), GozelleError>;
    /// Merges duplicate paths. Returns the number of records folded away.
    fn dedup(&self) -> Result<usize, GozelleError>;
    fn is_dirty(&self) -> Result<bool, GozelleError>;
    /// Re-encodes memory, compares it to the last persisted bytes and resets
    /// the dirty flag from the outcome.
    fn determine_dirty(&self) -> Result<bool, GozelleError>;
}

#[derive(Debug, Default)]
struct StoreState {
    entries: Vec<Entry>,
    dirty: bool,
    /// Bytes written by the last successful save (or read at open).
    persisted: Vec<u8>,
}

/// [`DirectoryStore`] backed by one binary file.
#[derive(Debug)]
pub struct FileStore {
    file_path: PathBuf,
    state: RwLock<StoreState>,
}

impl FileStore {
    /// Opens the store at `file_path`, creating the parent directory and an
    /// empty file when it does not exist yet.
    pub fn open(file_path: impl Into<PathBuf>) -> Result<Self, GozelleError> {
        let file_path = file_path.into();
        if !file_path.exists() {
            if let Some(parent) = file_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| GozelleError::io(parent, e))?;
            }
            fs::write(&file_path, b"").map_err(|e| GozelleError::io(&file_path, e))?;
            debug!(path = %file_path.display(), "created empty store file");
        }

        let bytes = fs::read(&file_path).map_err(|e| GozelleError::io(&file_path, e))?;
        let entries = codec::decode(&bytes).map_err(|source| GozelleError::CorruptStore {
            path: file_path.clone(),
            source,
        })?;
        debug!(
            path = %file_path.display(),
            entries = entries.len(),
            bytes = bytes.len(),
            "opened store"
        );

        Ok(Self {
            file_path,
            state: RwLock::new(StoreState {
                entries,
                dirty: false,
                persisted: bytes,
            }),
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Path of the staging file used during save.
    pub fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.file_path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn read(&self, op: &'static str) -> Result<RwLockReadGuard<'_, StoreState>, GozelleError> {
        self.state.read().map_err(|_| GozelleError::LockPoisoned(op))
    }

    fn write(&self, op: &'static str) -> Result<RwLockWriteGuard<'_, StoreState>, GozelleError> {
        self.state.write().map_err(|_| GozelleError::LockPoisoned(op))
    }

    /// Writes `state` to disk. The caller holds the write lock.
    fn save_locked(&self, state: &mut StoreState) -> Result<bool, GozelleError> {
        if !state.dirty {
            debug!("store clean, skipping save");
            return Ok(false);
        }

        let encoded = codec::encode(&state.entries)?;
        let tmp = self.temp_path();
        if let Err(e) = fs::write(&tmp, &encoded) {
            let _ = fs::remove_file(&tmp);
            return Err(GozelleError::io(&tmp, e));
        }
        if let Err(e) = fs::rename(&tmp, &self.file_path) {
            let _ = fs::remove_file(&tmp);
            return Err(GozelleError::io(&self.file_path, e));
        }

        debug!(
            path = %self.file_path.display(),
            entries = state.entries.len(),
            bytes = encoded.len(),
            "saved store"
        );
        state.persisted = encoded;
        state.dirty = false;
        Ok(true)
    }
}

fn position(entries: &[Entry], path: &str) -> Result<usize, GozelleError> {
    entries
        .iter()
        .position(|e| e.path == path)
        .ok_or_else(|| GozelleError::NotFound(path.to_string()))
}

impl DirectoryStore for FileStore {
    fn add(&self, path: &str) -> Result<Entry, GozelleError> {
        let mut state = self.write("add")?;
        let entry = Entry::new(path, now_epoch_secs());
        state.entries.push(entry.clone());
        state.dirty = true;
        debug!(path, "added entry");
        Ok(entry)
    }

    fn add_and_save(&self, path: &str) -> Result<Entry, GozelleError> {
        let mut state = self.write("add_and_save")?;
        let entry = Entry::new(path, now_epoch_secs());
        state.entries.push(entry.clone());
        state.dirty = true;
        debug!(path, "added entry");
        self.save_locked(&mut state)?;
        Ok(entry)
    }

    fn get(&self, path: &str) -> Result<Entry, GozelleError> {
        let state = self.read("get")?;
        state
            .entries
            .iter()
            .find(|e| e.path == path)
            .cloned()
            .ok_or_else(|| GozelleError::NotFound(path.to_string()))
    }

    fn all(&self) -> Result<Vec<Entry>, GozelleError> {
        Ok(self.read("all")?.entries.clone())
    }

    fn len(&self) -> Result<usize, GozelleError> {
        Ok(self.read("len")?.entries.len())
    }

    fn remove(&self, path: &str) -> Result<usize, GozelleError> {
        let mut state = self.write("remove")?;
        maintenance::sort_by_path(&mut state.entries);
        let Some(start) = maintenance::binary_search(&state.entries, path) else {
            return Err(GozelleError::NotFound(path.to_string()));
        };
        // Duplicates are adjacent after the sort and start at the first match.
        let end = start + state.entries[start..].partition_point(|e| e.path == path);
        let removed = state.entries.drain(start..end).count();
        state.dirty = true;
        debug!(path, removed, "removed entry");
        self.save_locked(&mut state)?;
        Ok(removed)
    }

    fn swap_remove(&self, index: usize) -> Result<Entry, GozelleError> {
        let mut state = self.write("swap_remove")?;
        let len = state.entries.len();
        if index >= len {
            return Err(GozelleError::IndexOutOfRange { index, len });
        }
        let removed = state.entries.swap_remove(index);
        state.dirty = true;
        Ok(removed)
    }

    fn swap_remove_path(&self, path: &str) -> Result<Entry, GozelleError> {
        let mut state = self.write("swap_remove_path")?;
        let idx = position(&state.entries, path)?;
        let removed = state.entries.swap_remove(idx);
        state.dirty = true;
        Ok(removed)
    }

    fn visit(&self, path: &str, now: i64) -> Result<Entry, GozelleError> {
        let mut state = self.write("visit")?;
        let idx = position(&state.entries, path)?;
        let entry = &mut state.entries[idx];
        entry.visit(now);
        let visited = entry.clone();
        state.dirty = true;
        debug!(path, score = visited.score, "recorded visit");
        Ok(visited)
    }

    fn visit_at(&self, index: usize, path: &str, now: i64) -> Result<Entry, GozelleError> {
        let mut state = self.write("visit_at")?;
        let idx = match state.entries.get(index) {
            Some(e) if e.path == path => index,
            _ => position(&state.entries, path)?,
        };
        let entry = &mut state.entries[idx];
        entry.visit(now);
        let visited = entry.clone();
        state.dirty = true;
        debug!(path, index = idx, score = visited.score, "recorded visit");
        Ok(visited)
    }

    fn save(&self) -> Result<bool, GozelleError> {
        let mut state = self.write("save")?;
        self.save_locked(&mut state)
    }

    fn sort_by_path(&self) -> Result<(), GozelleError> {
        let mut state = self.write("sort_by_path")?;
        maintenance::sort_by_path(&mut state.entries);
        Ok(())
    }

    fn dedup(&self) -> Result<usize, GozelleError> {
        let mut state = self.write("dedup")?;
        let merged = maintenance::dedup(&mut state.entries);
        if merged > 0 {
            state.dirty = true;
        }
        debug!(merged, remaining = state.entries.len(), "dedup pass");
        Ok(merged)
    }

    fn is_dirty(&self) -> Result<bool, GozelleError> {
        Ok(self.read("is_dirty")?.dirty)
    }

    fn determine_dirty(&self) -> Result<bool, GozelleError> {
        let mut state = self.write("determine_dirty")?;
        let stale = if state.persisted.is_empty() {
            // An empty file and an encoded empty list both mean "no entries".
            !state.entries.is_empty()
        } else {
            codec::encode(&state.entries)? != state.persisted
        };
        state.dirty = stale;
        Ok(stale)
    }
}
