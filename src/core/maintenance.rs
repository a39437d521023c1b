//! Canonical ordering and duplicate merging for the entry collection.
//!
//! These are plain functions over slices; `FileStore` calls them under its
//! write lock.

use crate::core::entry::Entry;
use std::cmp::Ordering;

/// Sorts entries lexicographically (bytewise) by path, in place.
///
/// Quicksort with a last-element pivot. The median of three is swapped into
/// the pivot slot first so that already-sorted input, which is what a store
/// looks like after every prune, does not degrade to quadratic time.
pub fn sort_by_path(entries: &mut [Entry]) {
    if entries.is_sorted_by(|a, b| a.path <= b.path) {
        return;
    }
    quick_sort(entries);
}

fn quick_sort(mut entries: &mut [Entry]) {
    // Recurse on the smaller half and loop on the larger one to keep the
    // stack depth logarithmic.
    while entries.len() > 1 {
        let pivot = partition(entries);
        let (left, right) = entries.split_at_mut(pivot);
        let right = &mut right[1..];
        if left.len() < right.len() {
            quick_sort(left);
            entries = right;
        } else {
            quick_sort(right);
            entries = left;
        }
    }
}

fn partition(entries: &mut [Entry]) -> usize {
    let high = entries.len() - 1;
    let mid = high / 2;
    if entries.len() >= 3 {
        // Order low, mid, high, then park the median at `high`.
        if entries[mid].path < entries[0].path {
            entries.swap(mid, 0);
        }
        if entries[high].path < entries[0].path {
            entries.swap(high, 0);
        }
        if entries[mid].path < entries[high].path {
            entries.swap(mid, high);
        }
    }

    let mut store = 0;
    for j in 0..high {
        if entries[j].path < entries[high].path {
            entries.swap(store, j);
            store += 1;
        }
    }
    entries.swap(store, high);
    store
}

/// Merges every run of same-path entries into its first element.
///
/// Sorts first. Returns the number of records folded away; zero means the
/// collection was already duplicate-free.
pub fn dedup(entries: &mut Vec<Entry>) -> usize {
    sort_by_path(entries);
    let before = entries.len();
    entries.dedup_by(|later, kept| {
        if later.path == kept.path {
            kept.absorb(later);
            true
        } else {
            false
        }
    });
    before - entries.len()
}

/// Bisects a path-sorted slice for the first entry with exactly `path`.
pub fn binary_search(entries: &[Entry], path: &str) -> Option<usize> {
    let mut low = 0;
    let mut high = entries.len();
    while low < high {
        let mid = low + (high - low) / 2;
        match entries[mid].path.as_str().cmp(path) {
            Ordering::Less => low = mid + 1,
            Ordering::Equal | Ordering::Greater => high = mid,
        }
    }
    (low < entries.len() && entries[low].path == path).then_some(low)
}
