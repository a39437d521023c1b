//! Durable mutations composed over [`DirectoryStore`].

use crate::core::entry::Entry;
use crate::core::error::GozelleError;
use crate::core::store::DirectoryStore;
use tracing::debug;

/// Records `path` and persists before returning.
pub fn add<S: DirectoryStore + ?Sized>(store: &S, path: &str) -> Result<Entry, GozelleError> {
    store.add_and_save(path)
}

/// Removes every record of `path`. `NotFound` when it is not tracked.
pub fn remove<S: DirectoryStore + ?Sized>(store: &S, path: &str) -> Result<usize, GozelleError> {
    store.remove(path)
}

/// Housekeeping: merges duplicate records and saves only if anything changed.
///
/// Returns the number of records folded away.
pub fn prune<S: DirectoryStore + ?Sized>(store: &S) -> Result<usize, GozelleError> {
    let merged = store.dedup()?;
    if store.is_dirty()? {
        store.save()?;
    }
    debug!(merged, "prune finished");
    Ok(merged)
}

/// Records a visit on an already tracked path and persists it.
///
/// Returns `None` when the path is not tracked; that is not an error for
/// callers such as the interactive picker.
pub fn record_visit<S: DirectoryStore + ?Sized>(
    store: &S,
    path: &str,
    now: i64,
) -> Result<Option<Entry>, GozelleError> {
    match store.visit(path, now) {
        Ok(entry) => {
            store.save()?;
            Ok(Some(entry))
        }
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}
