//! Wall-clock helpers. All stored timestamps are unix-epoch seconds.

use std::time::{SystemTime, UNIX_EPOCH};

/// Returns unix-epoch seconds for the current instant.
pub fn now_epoch_secs() -> i64 {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    i64::try_from(secs).unwrap_or(i64::MAX)
}

pub const SECS_PER_DAY: f64 = 86_400.0;

/// Days elapsed between `then` and `now`, clamped at zero.
pub fn elapsed_days(then: i64, now: i64) -> f64 {
    let secs = now.saturating_sub(then).max(0);
    secs as f64 / SECS_PER_DAY
}
