//! Bounded, Single-Flight LRU Cache
//!
//! [`LruCache`] maps keys to shared values produced on demand by a getter
//! function. It is independent of archives and is reused by [`SceneCache`].
//!
//! # Cost & Eviction
//!
//! The getter returns a value together with its *cost*. Whenever the summed
//! cost exceeds the capacity, least-recently-used entries are evicted until
//! the cache fits again. Entries that are still referenced by a caller (their
//! `Arc` is shared outside the cache) are never evicted, so the cache can
//! temporarily exceed its capacity while values are in use.
//!
//! # Single Flight
//!
//! Concurrent `get` calls for the same missing key run the getter once: the
//! first caller becomes the *leader* and loads the value, the others block
//! until the load finishes and share its result. A failed load is never
//! cached; waiting callers retry the load themselves.
//!
//! [`SceneCache`]: crate::SceneCache

use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Condvar, Mutex};
use rustc_hash::FxHashMap;

type Getter<K, V, E> = dyn Fn(&K) -> Result<(V, usize), E> + Send + Sync;

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served from a resident entry or a shared in-flight load.
    pub hits: u64,
    /// Lookups that ran the getter.
    pub misses: u64,
    /// Entries removed to honor the capacity.
    pub evictions: u64,
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

enum FlightState<V> {
    Pending,
    Loaded(Arc<V>),
    Failed,
}

/// An in-progress load shared by every caller waiting on the same key.
struct Flight<V> {
    state: Mutex<FlightState<V>>,
    done: Condvar,
}

impl<V> Flight<V> {
    fn new() -> Self {
        Self {
            state: Mutex::new(FlightState::Pending),
            done: Condvar::new(),
        }
    }

    /// Blocks until the leader finishes. `None` means the load failed.
    fn wait(&self) -> Option<Arc<V>> {
        let mut state = self.state.lock();
        loop {
            match &*state {
                FlightState::Pending => self.done.wait(&mut state),
                FlightState::Loaded(value) => return Some(Arc::clone(value)),
                FlightState::Failed => return None,
            }
        }
    }

    fn finish(&self, outcome: Option<Arc<V>>) {
        *self.state.lock() = match outcome {
            Some(value) => FlightState::Loaded(value),
            None => FlightState::Failed,
        };
        self.done.notify_all();
    }
}

struct Resident<V> {
    value: Arc<V>,
    cost: usize,
    last_used: u64,
}

enum Slot<V> {
    Loading(Arc<Flight<V>>),
    Ready(Resident<V>),
}

struct Inner<K, V> {
    map: FxHashMap<K, Slot<V>>,
    total_cost: usize,
    clock: u64,
}

enum Lookup<V> {
    Hit(Arc<V>),
    Wait(Arc<Flight<V>>),
    Lead(Arc<Flight<V>>),
}

/// A thread-safe, cost-bounded LRU cache with single-flight loading.
pub struct LruCache<K, V, E> {
    inner: Mutex<Inner<K, V>>,
    getter: Box<Getter<K, V, E>>,
    capacity: usize,
    counters: Counters,
}

impl<K, V, E> LruCache<K, V, E>
where
    K: Eq + Hash + Clone + Debug,
{
    /// Creates a cache holding at most `capacity` cost units of idle entries.
    ///
    /// `getter` computes the value and its cost for a missing key.
    pub fn new<F>(capacity: usize, getter: F) -> Self
    where
        F: Fn(&K) -> Result<(V, usize), E> + Send + Sync + 'static,
    {
        Self {
            inner: Mutex::new(Inner {
                map: FxHashMap::default(),
                total_cost: 0,
                clock: 0,
            }),
            getter: Box::new(getter),
            capacity,
            counters: Counters::default(),
        }
    }

    /// Returns the value for `key`, loading it if it is not resident.
    ///
    /// Blocks while another thread is loading the same key.
    pub fn get(&self, key: &K) -> Result<Arc<V>, E> {
        loop {
            match self.lookup(key) {
                Lookup::Hit(value) => {
                    log::trace!("Cache hit for {key:?}");
                    self.counters.hits.fetch_add(1, Ordering::Relaxed);
                    return Ok(value);
                }
                Lookup::Wait(flight) => {
                    log::trace!("Waiting for in-flight load of {key:?}");
                    if let Some(value) = flight.wait() {
                        self.counters.hits.fetch_add(1, Ordering::Relaxed);
                        return Ok(value);
                    }
                    // The leader failed; try again, possibly as the new leader.
                }
                Lookup::Lead(flight) => {
                    self.counters.misses.fetch_add(1, Ordering::Relaxed);
                    return self.load(key, flight);
                }
            }
        }
    }

    fn lookup(&self, key: &K) -> Lookup<V> {
        let mut inner = self.inner.lock();
        inner.clock += 1;
        let now = inner.clock;

        let hit = match inner.map.get_mut(key) {
            Some(Slot::Ready(resident)) => {
                resident.last_used = now;
                Some(Arc::clone(&resident.value))
            }
            _ => None,
        };
        if let Some(value) = hit {
            // Entries pinned during an earlier insert may be idle by now.
            if inner.total_cost > self.capacity {
                self.evict(&mut inner);
            }
            return Lookup::Hit(value);
        }

        if let Some(Slot::Loading(flight)) = inner.map.get(key) {
            return Lookup::Wait(Arc::clone(flight));
        }

        let flight = Arc::new(Flight::new());
        inner
            .map
            .insert(key.clone(), Slot::Loading(Arc::clone(&flight)));
        Lookup::Lead(flight)
    }

    fn load(&self, key: &K, flight: Arc<Flight<V>>) -> Result<Arc<V>, E> {
        let mut guard = FlightGuard {
            cache: self,
            key,
            flight,
            finished: false,
        };

        let (value, cost) = (self.getter)(key)?;
        let value = Arc::new(value);

        {
            let mut inner = self.inner.lock();
            if Self::owns_slot(&inner, key, &guard.flight) {
                inner.clock += 1;
                let last_used = inner.clock;
                inner.map.insert(
                    key.clone(),
                    Slot::Ready(Resident {
                        value: Arc::clone(&value),
                        cost,
                        last_used,
                    }),
                );
                inner.total_cost += cost;
                self.evict(&mut inner);
            } else {
                log::debug!("Load of {key:?} finished after it was erased; not caching it");
            }
        }

        guard.flight.finish(Some(Arc::clone(&value)));
        guard.finished = true;
        Ok(value)
    }

    fn owns_slot(inner: &Inner<K, V>, key: &K, flight: &Arc<Flight<V>>) -> bool {
        matches!(inner.map.get(key), Some(Slot::Loading(current)) if Arc::ptr_eq(current, flight))
    }

    /// Drops idle least-recently-used entries until the cache fits its capacity.
    fn evict(&self, inner: &mut Inner<K, V>) {
        while inner.total_cost > self.capacity {
            // Only the cache's own reference left: nobody is using the value.
            let victim = inner
                .map
                .iter()
                .filter_map(|(key, slot)| match slot {
                    Slot::Ready(resident) if Arc::strong_count(&resident.value) == 1 => {
                        Some((key, resident.last_used))
                    }
                    _ => None,
                })
                .min_by_key(|&(_, last_used)| last_used)
                .map(|(key, _)| key.clone());

            let Some(victim) = victim else {
                log::trace!(
                    "Cache over capacity ({} > {}) but every entry is in use",
                    inner.total_cost,
                    self.capacity
                );
                break;
            };

            if let Some(Slot::Ready(resident)) = inner.map.remove(&victim) {
                inner.total_cost -= resident.cost;
                self.counters.evictions.fetch_add(1, Ordering::Relaxed);
                log::debug!("Evicted {victim:?} (cost {})", resident.cost);
            }
        }
    }

    /// Removes `key` regardless of recency. Returns `true` if it was present.
    ///
    /// Values already handed out stay alive until their holders drop them; a
    /// load in progress for `key` is still delivered to its callers but not
    /// cached.
    pub fn erase(&self, key: &K) -> bool {
        let mut inner = self.inner.lock();
        match inner.map.remove(key) {
            Some(Slot::Ready(resident)) => {
                inner.total_cost -= resident.cost;
                true
            }
            Some(Slot::Loading(_)) => true,
            None => false,
        }
    }

    /// Removes every entry.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.map.clear();
        inner.total_cost = 0;
    }

    /// Number of resident entries (in-flight loads are not counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner
            .lock()
            .map
            .values()
            .filter(|slot| matches!(slot, Slot::Ready(_)))
            .count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if `key` is resident.
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        matches!(self.inner.lock().map.get(key), Some(Slot::Ready(_)))
    }

    /// Summed cost of the resident entries.
    #[must_use]
    pub fn total_cost(&self) -> usize {
        self.inner.lock().total_cost
    }

    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            evictions: self.counters.evictions.load(Ordering::Relaxed),
        }
    }
}

/// Releases a leader's slot and wakes its waiters if the load does not
/// complete, including when the getter fails or panics.
struct FlightGuard<'a, K, V, E>
where
    K: Eq + Hash + Clone + Debug,
{
    cache: &'a LruCache<K, V, E>,
    key: &'a K,
    flight: Arc<Flight<V>>,
    finished: bool,
}

impl<K, V, E> Drop for FlightGuard<'_, K, V, E>
where
    K: Eq + Hash + Clone + Debug,
{
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        {
            let mut inner = self.cache.inner.lock();
            if LruCache::<K, V, E>::owns_slot(&inner, self.key, &self.flight) {
                inner.map.remove(self.key);
            }
        }
        self.flight.finish(None);
    }
}
