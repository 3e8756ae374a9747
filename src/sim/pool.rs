//! Generic object pooling
//!
//! Pre-instantiates a fixed number of copies per prefab kind and lends them
//! out. The pool never grows: exhaustion returns `None` and the caller
//! degrades. Acquired instances travel inside a move-only [`Lease`] token,
//! so a lease cannot be returned twice or forged for a foreign instance.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::hash::Hash;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicU32, Ordering};

/// Items that can be parked in an [`ObjectPool`]
pub trait PoolItem {
    /// Toggle the engine-side active state (visibility, collision)
    fn set_active(&mut self, active: bool);
}

static NEXT_POOL_ID: AtomicU32 = AtomicU32::new(0);

/// Loan token for an acquired instance
///
/// Constructed only by [`ObjectPool::acquire`] and consumed only by
/// [`ObjectPool::release`]. The wrapped instance is reachable through
/// `Deref`/`DerefMut` while on loan.
#[derive(Debug)]
pub struct Lease<K, T> {
    pool_id: u32,
    kind: K,
    item: T,
}

impl<K: Copy, T> Lease<K, T> {
    /// Prefab kind this instance was drawn from
    pub fn kind(&self) -> K {
        self.kind
    }
}

impl<K, T> Deref for Lease<K, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.item
    }
}

impl<K, T> DerefMut for Lease<K, T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.item
    }
}

/// Fixed-size pool of pre-instantiated prefab copies, one queue per kind
#[derive(Debug)]
pub struct ObjectPool<K, T> {
    id: u32,
    pools: HashMap<K, VecDeque<T>>,
}

impl<K, T> Default for ObjectPool<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, T> ObjectPool<K, T> {
    pub fn new() -> Self {
        Self {
            id: NEXT_POOL_ID.fetch_add(1, Ordering::Relaxed),
            pools: HashMap::new(),
        }
    }
}

impl<K, T> ObjectPool<K, T>
where
    K: Eq + Hash + Copy + fmt::Debug,
    T: PoolItem,
{
    /// Pre-instantiate `count` inactive copies of a prefab kind
    pub fn preload(&mut self, kind: K, count: usize, mut build: impl FnMut() -> T) {
        let queue = self.pools.entry(kind).or_default();
        for _ in 0..count {
            let mut item = build();
            item.set_active(false);
            queue.push_back(item);
        }
    }

    /// Lend out an inactive instance of `kind`, marked active. Returns
    /// `None` when that kind's queue is exhausted; the pool never grows.
    pub fn acquire(&mut self, kind: K) -> Option<Lease<K, T>> {
        match self.pools.get_mut(&kind).and_then(VecDeque::pop_front) {
            Some(mut item) => {
                item.set_active(true);
                Some(Lease {
                    pool_id: self.id,
                    kind,
                    item,
                })
            }
            None => {
                log::warn!("no pooled instances available for {kind:?}");
                None
            }
        }
    }

    /// Return a leased instance to its kind's queue, marked inactive
    pub fn release(&mut self, lease: Lease<K, T>) {
        debug_assert_eq!(
            lease.pool_id, self.id,
            "lease released to a pool it was not acquired from"
        );
        let Lease { kind, mut item, .. } = lease;
        item.set_active(false);
        self.pools.entry(kind).or_default().push_back(item);
    }

    /// Instances currently parked for a kind
    pub fn available(&self, kind: K) -> usize {
        self.pools.get(&kind).map_or(0, VecDeque::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Kind {
        Crate,
        Barrel,
    }

    #[derive(Debug)]
    struct Dummy {
        active: bool,
    }

    impl Dummy {
        fn new() -> Self {
            Self { active: true }
        }
    }

    impl PoolItem for Dummy {
        fn set_active(&mut self, active: bool) {
            self.active = active;
        }
    }

    #[test]
    fn test_preload_parks_inactive_instances() {
        let mut pool = ObjectPool::new();
        pool.preload(Kind::Crate, 3, Dummy::new);
        assert_eq!(pool.available(Kind::Crate), 3);
        assert_eq!(pool.available(Kind::Barrel), 0);
    }

    #[test]
    fn test_acquire_marks_active() {
        let mut pool = ObjectPool::new();
        pool.preload(Kind::Crate, 1, Dummy::new);

        let lease = pool.acquire(Kind::Crate).unwrap();
        assert!(lease.active);
        assert_eq!(lease.kind(), Kind::Crate);
        assert_eq!(pool.available(Kind::Crate), 0);
    }

    #[test]
    fn test_exhaustion_returns_unavailable() {
        let mut pool = ObjectPool::new();
        pool.preload(Kind::Crate, 1, Dummy::new);

        let first = pool.acquire(Kind::Crate);
        assert!(first.is_some());
        // Exhausted: unavailable, no panic
        assert!(pool.acquire(Kind::Crate).is_none());
        // Unknown kind behaves the same as an empty queue
        assert!(pool.acquire(Kind::Barrel).is_none());

        // Releasing after exhaustion leaves exactly one entry again
        pool.release(first.unwrap());
        assert_eq!(pool.available(Kind::Crate), 1);
    }

    #[test]
    fn test_release_parks_inactive() {
        let mut pool = ObjectPool::new();
        pool.preload(Kind::Barrel, 1, Dummy::new);

        let lease = pool.acquire(Kind::Barrel).unwrap();
        pool.release(lease);

        let again = pool.acquire(Kind::Barrel).unwrap();
        assert!(again.active, "re-acquired instance was re-activated");
        pool.release(again);
    }

    #[test]
    #[should_panic(expected = "released to a pool it was not acquired from")]
    fn test_release_to_foreign_pool_asserts() {
        let mut a = ObjectPool::new();
        let mut b: ObjectPool<Kind, Dummy> = ObjectPool::new();
        a.preload(Kind::Crate, 1, Dummy::new);

        let lease = a.acquire(Kind::Crate).unwrap();
        b.release(lease);
    }
}
