//! Keyword query engine.
//!
//! Scoring fans out over a snapshot of the store: the snapshot is cut into one
//! contiguous chunk per available core, each chunk is scored on the rayon pool
//! and reports its own best match, and the coordinator folds the partial
//! results. Folding happens in chunk order and only a strictly higher
//! frecency replaces the current best, so ties go to the entry that appears
//! first in storage order.

use crate::core::entry::Entry;
use crate::core::error::GozelleError;
use crate::core::matcher::matches;
use crate::core::ranker::frecency;
use crate::core::store::DirectoryStore;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

/// Winning entry plus the frecency it scored with.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ScoredMatch {
    /// Position of the record in the scored snapshot.
    #[serde(skip)]
    pub index: usize,
    pub entry: Entry,
    pub frecency: f64,
}

fn chunk_size(len: usize) -> usize {
    let workers = std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get);
    len.div_ceil(workers).max(1)
}

fn best_in_chunk(
    chunk: &[Entry],
    offset: usize,
    keywords: &[String],
    now: i64,
) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64)> = None;
    for (i, entry) in chunk.iter().enumerate() {
        if !matches(&entry.path, keywords) {
            continue;
        }
        let score = frecency(entry, now);
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((offset + i, score));
        }
    }
    best
}

/// Scores every entry against `keywords` in parallel and returns the best.
///
/// Pure: the entries are not touched. An empty keyword list matches every
/// entry.
pub fn best_match(entries: &[Entry], keywords: &[String], now: i64) -> Option<ScoredMatch> {
    if entries.is_empty() {
        return None;
    }

    let size = chunk_size(entries.len());
    let partials: Vec<Option<(usize, f64)>> = entries
        .par_chunks(size)
        .enumerate()
        .map(|(n, chunk)| best_in_chunk(chunk, n * size, keywords, now))
        .collect();

    let mut best: Option<(usize, f64)> = None;
    for (index, score) in partials.into_iter().flatten() {
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((index, score));
        }
    }

    best.map(|(index, frecency)| ScoredMatch {
        index,
        entry: entries[index].clone(),
        frecency,
    })
}

/// Finds the best match for `keywords` and records the visit on it.
///
/// On a hit the winning record (not merely the first record with the same
/// path) gets `last_visit = now` and the visit multiplier,
/// and the store is saved. The returned match carries the post-visit entry and
/// the frecency it won with. With no hit (or no keywords) nothing is mutated.
pub fn query<S: DirectoryStore + ?Sized>(
    store: &S,
    keywords: &[String],
    now: i64,
) -> Result<Option<ScoredMatch>, GozelleError> {
    if keywords.is_empty() {
        debug!("no keywords, skipping query");
        return Ok(None);
    }

    let snapshot = store.all()?;
    let Some(found) = best_match(&snapshot, keywords, now) else {
        debug!(?keywords, candidates = snapshot.len(), "no match");
        return Ok(None);
    };
    debug!(
        ?keywords,
        path = %found.entry.path,
        frecency = found.frecency,
        "best match"
    );

    let visited = store.visit_at(found.index, &found.entry.path, now)?;
    store.save()?;
    Ok(Some(ScoredMatch {
        index: found.index,
        entry: visited,
        frecency: found.frecency,
    }))
}

/// Every entry with its frecency at `now`, highest first.
pub fn ranked(entries: Vec<Entry>, now: i64) -> Vec<ScoredMatch> {
    let mut scored: Vec<ScoredMatch> = entries
        .into_par_iter()
        .enumerate()
        .map(|(index, entry)| {
            let frecency = frecency(&entry, now);
            ScoredMatch {
                index,
                entry,
                frecency,
            }
        })
        .collect();
    scored.sort_by(|a, b| b.frecency.total_cmp(&a.frecency));
    scored
}
