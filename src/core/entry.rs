//! The tracked-directory value type.

use serde::{Deserialize, Serialize};

/// Score given to a directory the first time it is recorded.
pub const INITIAL_SCORE: f64 = 1.0;

/// Factor applied to the stored score on every recorded visit.
pub const VISIT_MULTIPLIER: f64 = 1.05;

/// One tracked directory.
///
/// `path` is an opaque key; no normalization happens at this level.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Entry {
    pub path: String,
    /// Unix-epoch seconds of the most recent recorded visit.
    pub last_visit: i64,
    pub score: f64,
}

impl Entry {
    pub fn new(path: impl Into<String>, now: i64) -> Self {
        Self {
            path: path.into(),
            last_visit: now,
            score: INITIAL_SCORE,
        }
    }

    /// Records a visit at `now`.
    pub fn visit(&mut self, now: i64) {
        self.last_visit = now;
        self.score *= VISIT_MULTIPLIER;
    }

    /// Folds a duplicate record for the same path into this one.
    pub fn absorb(&mut self, other: &Entry) {
        debug_assert_eq!(self.path, other.path);
        self.score += other.score;
        self.last_visit = self.last_visit.max(other.last_visit);
    }
}
