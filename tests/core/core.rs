use gozelle::core::entry::{Entry, VISIT_MULTIPLIER};
use gozelle::core::error::GozelleError;
use gozelle::core::ops;
use gozelle::core::query;
use gozelle::core::ranker::frecency;
use gozelle::core::store::{DirectoryStore, FileStore};
use gozelle::core::time::now_epoch_secs;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::tempdir;

/// Writes `entries` as the persisted store at `file`.
fn seed(file: &Path, entries: &[Entry]) {
    let bytes = gozelle::core::codec::encode(entries).expect("encode seed");
    fs::write(file, bytes).expect("write seed");
}

fn query_fixture(file: &Path) -> i64 {
    let now = now_epoch_secs();
    let entry = |path: &str, score: f64| Entry {
        path: path.to_string(),
        last_visit: now,
        score,
    };
    seed(
        file,
        &[
            entry("/path1/test", 4.0),
            entry("/path2/test", 1.0),
            entry("/path3/test", 1.0),
            entry("/path4/test", 1.0),
            entry("/different/test", 1.0),
        ],
    );
    now
}

fn keywords(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

#[test]
fn query_picks_highest_frecency_and_records_visit() {
    let tmp = tempdir().expect("tempdir");
    let file = tmp.path().join("db.bin");
    let seeded_at = query_fixture(&file);

    let store = FileStore::open(&file).expect("open");
    let found = query::query(&store, &keywords(&["test"]), now_epoch_secs())
        .expect("query")
        .expect("a match");

    assert_eq!(found.entry.path, "/path1/test");
    assert!(found.frecency > 0.0);
    assert_eq!(found.entry.score, 4.0 * VISIT_MULTIPLIER);
    assert!(found.entry.last_visit >= seeded_at);
    assert!(!store.is_dirty().expect("dirty"), "visit is persisted");

    let reopened = FileStore::open(&file).expect("reopen");
    assert_eq!(
        reopened.get("/path1/test").expect("get").score,
        4.0 * VISIT_MULTIPLIER
    );
    assert_eq!(reopened.get("/path2/test").expect("get").score, 1.0);
}

#[test]
fn query_follows_score_changes_between_runs() {
    let tmp = tempdir().expect("tempdir");
    let file = tmp.path().join("db.bin");
    let now = query_fixture(&file);

    let mut entries = FileStore::open(&file).expect("open").all().expect("all");
    entries[1].score = 5.0;
    seed(&file, &entries);

    let store = FileStore::open(&file).expect("open");
    let found = query::query(&store, &keywords(&["test"]), now)
        .expect("query")
        .expect("a match");
    assert_eq!(found.entry.path, "/path2/test");
    assert_eq!(found.entry.score, 5.0 * VISIT_MULTIPLIER);

    assert!(
        query::query(&store, &keywords(&["different"]), now)
            .expect("query")
            .is_none(),
        "last keyword must land in the final component"
    );
    let different = query::query(&store, &keywords(&["different", "test"]), now)
        .expect("query")
        .expect("a match");
    assert_eq!(different.entry.path, "/different/test");
    assert_eq!(different.entry.score, VISIT_MULTIPLIER);
}

#[test]
fn query_visits_the_winning_duplicate() {
    let tmp = tempdir().expect("tempdir");
    let file = tmp.path().join("db.bin");
    let now = now_epoch_secs();
    let entry = |score: f64| Entry {
        path: "/a/proj".to_string(),
        last_visit: now,
        score,
    };
    seed(&file, &[entry(1.0), entry(10.0)]);

    let store = FileStore::open(&file).expect("open");
    let found = query::query(&store, &keywords(&["proj"]), now)
        .expect("query")
        .expect("a match");
    assert_eq!(found.index, 1);
    assert_eq!(found.frecency, 10.0);
    assert_eq!(found.entry.score, 10.0 * VISIT_MULTIPLIER);

    let scores: Vec<f64> = FileStore::open(&file)
        .expect("reopen")
        .all()
        .expect("all")
        .into_iter()
        .map(|e| e.score)
        .collect();
    assert_eq!(scores, vec![1.0, 10.0 * VISIT_MULTIPLIER]);
}

#[test]
fn remove_forgets_a_directory_added_twice() {
    let tmp = tempdir().expect("tempdir");
    let store = FileStore::open(tmp.path().join("db.bin")).expect("open");
    ops::add(&store, "/test/path").expect("add");
    ops::add(&store, "/test/path").expect("add");

    assert_eq!(ops::remove(&store, "/test/path").expect("remove"), 2);
    assert!(matches!(
        store.get("/test/path"),
        Err(GozelleError::NotFound(_))
    ));
}

#[test]
fn query_without_match_mutates_nothing() {
    let tmp = tempdir().expect("tempdir");
    let file = tmp.path().join("db.bin");
    query_fixture(&file);
    let before = fs::read(&file).expect("read");

    let store = FileStore::open(&file).expect("open");
    let snapshot = store.all().expect("all");

    assert!(
        query::query(&store, &keywords(&["nonexistent"]), now_epoch_secs())
            .expect("query")
            .is_none()
    );
    assert!(query::query(&store, &[], now_epoch_secs()).expect("query").is_none());

    assert_eq!(store.all().expect("all"), snapshot);
    assert!(!store.is_dirty().expect("dirty"));
    assert_eq!(fs::read(&file).expect("read"), before);
}

#[test]
fn query_on_empty_store_is_no_match() {
    let tmp = tempdir().expect("tempdir");
    let store = FileStore::open(tmp.path().join("db.bin")).expect("open");
    assert!(query::query(&store, &keywords(&["x"]), 0).expect("query").is_none());
}

#[test]
fn add_then_remove_leaves_nothing_behind() {
    let tmp = tempdir().expect("tempdir");
    let file = tmp.path().join("db.bin");
    let store = FileStore::open(&file).expect("open");

    ops::add(&store, "/test/path").expect("add");
    assert!(!store.is_dirty().expect("dirty"), "add is durable");
    assert_eq!(
        FileStore::open(&file).expect("reopen").get("/test/path").expect("get").score,
        1.0
    );

    ops::remove(&store, "/test/path").expect("remove");
    assert!(matches!(
        store.get("/test/path"),
        Err(GozelleError::NotFound(p)) if p == "/test/path"
    ));
    assert!(matches!(
        ops::remove(&store, "/test/path"),
        Err(GozelleError::NotFound(_))
    ));
    assert!(FileStore::open(&file).expect("reopen").all().expect("all").is_empty());
}

#[test]
fn prune_merges_duplicates_and_persists() {
    let tmp = tempdir().expect("tempdir");
    let file = tmp.path().join("db.bin");
    let store = FileStore::open(&file).expect("open");
    for p in ["/b", "/a", "/b", "/c", "/b"] {
        ops::add(&store, p).expect("add");
    }

    assert_eq!(ops::prune(&store).expect("prune"), 2);
    let reopened = FileStore::open(&file).expect("reopen");
    let entries = reopened.all().expect("all");
    let paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, vec!["/a", "/b", "/c"]);
    assert_eq!(entries[1].score, 3.0);

    let before = fs::read(&file).expect("read");
    assert_eq!(ops::prune(&reopened).expect("prune"), 0);
    assert_eq!(fs::read(&file).expect("read"), before);
}

#[test]
fn record_visit_ignores_untracked_paths() {
    let tmp = tempdir().expect("tempdir");
    let store = FileStore::open(tmp.path().join("db.bin")).expect("open");
    ops::add(&store, "/tracked").expect("add");

    assert!(ops::record_visit(&store, "/untracked", 10).expect("visit").is_none());
    let visited = ops::record_visit(&store, "/tracked", now_epoch_secs() + 10)
        .expect("visit")
        .expect("tracked");
    assert_eq!(visited.score, VISIT_MULTIPLIER);
    assert!(!store.is_dirty().expect("dirty"));
}

#[test]
fn concurrent_adds_and_saves_lose_nothing() {
    let tmp = tempdir().expect("tempdir");
    let file = tmp.path().join("db.bin");
    let store = Arc::new(FileStore::open(&file).expect("open"));

    const WORKERS: usize = 10;
    const OPS: usize = 5;
    let barrier = Arc::new(Barrier::new(WORKERS));

    let handles: Vec<_> = (0..WORKERS)
        .map(|id| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for op in 0..OPS {
                    store.add(&format!("/test/dir_{id}_{op}")).expect("add");
                    store.save().expect("save");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("worker");
    }

    let reopened = FileStore::open(&file).expect("reopen");
    let entries = reopened.all().expect("all");
    assert_eq!(entries.len(), WORKERS * OPS);
    for id in 0..WORKERS {
        for op in 0..OPS {
            let path = format!("/test/dir_{id}_{op}");
            assert!(entries.iter().any(|e| e.path == path), "missing {path}");
        }
    }
}

#[test]
fn listing_frecency_never_mutates_scores() {
    let tmp = tempdir().expect("tempdir");
    let file = tmp.path().join("db.bin");
    seed(
        &file,
        &[Entry {
            path: "/old".into(),
            last_visit: 0,
            score: 2.0,
        }],
    );
    let store = FileStore::open(&file).expect("open");
    let ranked = query::ranked(store.all().expect("all"), 86_400);
    assert!((ranked[0].frecency - 1.0).abs() < 1e-9);
    assert_eq!(store.get("/old").expect("get").score, 2.0);
    assert_eq!(
        frecency(&store.get("/old").expect("get"), 86_400),
        ranked[0].frecency
    );
}
