//! Concurrency tests
//!
//! Tests for:
//! - Concurrent first access opens an archive exactly once
//! - Handles into one archive are mutually exclusive
//! - Different archives are used in parallel
//! - Waiters recover when the opening thread fails

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use strata::{
    ArchiveDocument, CacheSettings, NodeDocument, Result, SceneArchive, SceneCache, StrataError,
};

const THREADS: usize = 8;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn scene() -> NodeDocument {
    NodeDocument::new("/")
        .with_child(NodeDocument::new("a").with_child(NodeDocument::new("c")))
        .with_child(NodeDocument::new("b"))
}

/// A loader that sleeps while opening so that callers pile up behind it.
fn slow_cache(delay: Duration) -> (Arc<SceneCache>, Arc<AtomicUsize>) {
    let opens = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&opens);
    let cache = SceneCache::with_loader(CacheSettings::default(), move |path: &Path| {
        counter.fetch_add(1, Ordering::SeqCst);
        thread::sleep(delay);
        SceneArchive::from_document(path, ArchiveDocument::new(scene()))
    });
    (Arc::new(cache), opens)
}

// ============================================================================
// Single Open
// ============================================================================

#[test]
fn concurrent_get_opens_once() {
    init_logger();
    let (cache, opens) = slow_cache(Duration::from_millis(50));
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                cache.get("same.mdc").unwrap()
            })
        })
        .collect();

    let archives: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(opens.load(Ordering::SeqCst), 1);
    assert!(archives.iter().all(|a| Arc::ptr_eq(a, &archives[0])));
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.stats().misses, 1);
}

#[test]
fn concurrent_entries_open_once() {
    init_logger();
    let (cache, opens) = slow_cache(Duration::from_millis(20));

    thread::scope(|s| {
        for i in 0..THREADS {
            let cache = &cache;
            s.spawn(move || {
                let path = if i % 2 == 0 { "/a/c" } else { "/b" };
                let entry = cache.entry("shared.mdc", path).unwrap();
                assert_eq!(entry.path(), path);
            });
        }
    });

    assert_eq!(opens.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Exclusive Access
// ============================================================================

#[test]
fn handles_into_one_archive_are_serialized() {
    init_logger();
    let (cache, _) = slow_cache(Duration::ZERO);
    let active = AtomicUsize::new(0);
    let max_active = AtomicUsize::new(0);

    thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                for _ in 0..20 {
                    let entry = cache.entry("locked.mdc", "/a").unwrap();
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    max_active.fetch_max(now, Ordering::SeqCst);
                    thread::sleep(Duration::from_micros(200));
                    assert_eq!(entry.descendant_names(), ["/a/c"]);
                    active.fetch_sub(1, Ordering::SeqCst);
                }
            });
        }
    });

    assert_eq!(max_active.load(Ordering::SeqCst), 1);
}

#[test]
fn different_archives_proceed_in_parallel() {
    init_logger();
    let (cache, _) = slow_cache(Duration::ZERO);
    let barrier = Barrier::new(2);

    // Both handles must be held at once to pass the barrier.
    thread::scope(|s| {
        for file in ["left.mdc", "right.mdc"] {
            let cache = &cache;
            let barrier = &barrier;
            s.spawn(move || {
                let entry = cache.entry(file, "/a").unwrap();
                barrier.wait();
                assert_eq!(entry.name(), "a");
            });
        }
    });

    assert_eq!(cache.len(), 2);
}

#[test]
fn erase_while_handles_are_live() {
    init_logger();
    let (cache, opens) = slow_cache(Duration::ZERO);

    thread::scope(|s| {
        for i in 0..THREADS {
            let cache = &cache;
            s.spawn(move || {
                for _ in 0..25 {
                    if i == 0 {
                        cache.erase("churn.mdc");
                    } else {
                        let entry = cache.entry("churn.mdc", "/a/c").unwrap();
                        assert_eq!(entry.world_transform(), glam::DMat4::IDENTITY);
                    }
                }
            });
        }
    });

    assert!(opens.load(Ordering::SeqCst) >= 1);
    assert!(cache.len() <= 1);
}

// ============================================================================
// Failure Recovery
// ============================================================================

#[test]
fn waiters_retry_after_failed_open() {
    init_logger();
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&attempts);
    let loader = move |path: &Path| -> Result<SceneArchive> {
        // The first open fails after the other callers have queued up.
        let attempt = counter.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(30));
        if attempt == 0 {
            return Err(StrataError::open_failure(path, "transient"));
        }
        SceneArchive::from_document(path, ArchiveDocument::new(scene()))
    };
    let cache = SceneCache::with_loader(CacheSettings::default(), loader);
    let barrier = Barrier::new(THREADS);
    let file = PathBuf::from("flaky.mdc");

    let results: Vec<bool> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    cache.get(&file).is_ok()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    // Exactly one caller saw the failure; the rest share a single retry.
    assert_eq!(results.iter().filter(|ok| !**ok).count(), 1);
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
    assert!(cache.contains(&file));
}

#[test]
fn panicking_loader_does_not_wedge_the_key() {
    init_logger();
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&attempts);
    let cache = SceneCache::with_loader(CacheSettings::default(), move |path: &Path| {
        assert!(counter.fetch_add(1, Ordering::SeqCst) > 0, "loader blew up");
        SceneArchive::from_document(path, ArchiveDocument::new(scene()))
    });

    let first = thread::scope(|s| s.spawn(|| cache.get("boom.mdc").map(|_| ())).join());
    assert!(first.is_err());
    assert!(!cache.contains("boom.mdc"));

    assert!(cache.get("boom.mdc").is_ok());
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}
