//! Bounded freed-object pools.
//!
//! Grounded on cairo's `clip_pool`/`clip_path_pool` static free lists,
//! reimplemented as an explicit, non-global, generic type rather than a
//! pair of process-wide C statics.

use std::sync::{Arc, Mutex};

/// A small bounded LIFO free list. `acquire` never allocates; `release`
/// drops the value on the floor (via the system allocator, i.e. normal
/// `Drop`) once the pool is full, logging the overflow once per call
/// site's worth of spam avoidance is left to the caller.
#[derive(Clone)]
pub struct Pool<T> {
    items: Arc<Mutex<Vec<T>>>,
    capacity: usize,
}

impl<T> Pool<T> {
    pub fn new(capacity: usize) -> Self {
        Pool {
            items: Arc::new(Mutex::new(Vec::with_capacity(capacity))),
            capacity,
        }
    }

    pub fn acquire(&self) -> Option<T> {
        self.items.lock().expect("pool mutex poisoned").pop()
    }

    pub fn release(&self, item: T) {
        let mut guard = self.items.lock().expect("pool mutex poisoned");
        if guard.len() < self.capacity {
            guard.push(item);
        } else {
            log::warn!("pool overflow, falling through to the system allocator");
        }
    }

    pub fn len(&self) -> usize {
        self.items.lock().expect("pool mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_on_empty_pool_returns_none() {
        let pool: Pool<u32> = Pool::new(4);
        assert_eq!(pool.acquire(), None);
    }

    #[test]
    fn release_then_acquire_round_trips() {
        let pool = Pool::new(4);
        pool.release(7u32);
        assert_eq!(pool.acquire(), Some(7));
        assert!(pool.is_empty());
    }

    #[test]
    fn overflow_beyond_capacity_is_dropped_not_stored() {
        let pool = Pool::new(2);
        pool.release(1u32);
        pool.release(2u32);
        pool.release(3u32); // dropped, pool already at capacity
        assert_eq!(pool.len(), 2);
    }
}
