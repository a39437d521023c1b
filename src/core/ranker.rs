//! Read-time frecency scoring.
//!
//! Decay is measured in elapsed days. It never mutates the stored score; only
//! visits do that (see [`Entry::visit`]).

use crate::core::entry::Entry;
use crate::core::time::elapsed_days;
use std::f64::consts::LN_2;

/// Days after which an unvisited entry's frecency halves.
pub const HALF_LIFE_DAYS: f64 = 1.0;

/// `score * exp(-ln 2 / half_life * elapsed_days)`.
pub fn frecency(entry: &Entry, now: i64) -> f64 {
    let elapsed = elapsed_days(entry.last_visit, now);
    entry.score * (-LN_2 / HALF_LIFE_DAYS * elapsed).exp()
}
