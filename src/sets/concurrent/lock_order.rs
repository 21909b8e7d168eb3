//! Shared-mode acquisition over several sets at once.
//!
//! Whenever more than one set lock is held at a time, locks are taken in
//! ascending order of instance address, whatever order the caller passed the
//! sets in. Two threads running `a.equal(&b)` and `b.equal(&a)` therefore
//! always queue on the same lock first. A set passed several times is
//! locked once: std's `RwLock` may deadlock on a recursive read when a
//! writer is waiting.

use std::sync::RwLockReadGuard;

use hashbrown::HashSet;

use crate::sets::concurrent::ConcurrentSet;

type ReadGuard<'a, T, S> = RwLockReadGuard<'a, HashSet<T, S>>;

/// Read guards over a group of distinct sets, sorted by instance address.
pub(super) struct OrderedReadGuards<'a, T, S> {
    guards: Vec<(usize, ReadGuard<'a, T, S>)>,
}

impl<'a, T, S> OrderedReadGuards<'a, T, S> {
    pub(super) fn acquire(sets: &[&'a ConcurrentSet<T, S>]) -> Self {
        let mut ordered = sets.to_vec();
        ordered.sort_unstable_by_key(|set| set.addr());
        ordered.dedup_by_key(|set| set.addr());

        OrderedReadGuards {
            guards: ordered
                .into_iter()
                .map(|set| (set.addr(), set.read()))
                .collect(),
        }
    }

    /// Number of distinct sets held.
    pub(super) fn len(&self) -> usize {
        self.guards.len()
    }

    pub(super) fn tables(&self) -> impl Iterator<Item = &HashSet<T, S>> {
        self.guards.iter().map(|(_, guard)| &**guard)
    }
}

/// Takes the shared locks of two distinct sets in address order and returns
/// the guards in argument order.
///
/// # Panics
/// Panics in debug builds if `a` and `b` are the same instance; callers handle
/// that case without locking twice.
pub(super) fn read_pair<'a, T, S>(
    a: &'a ConcurrentSet<T, S>,
    b: &'a ConcurrentSet<T, S>,
) -> (ReadGuard<'a, T, S>, ReadGuard<'a, T, S>) {
    debug_assert!(!a.same_instance(b));

    if a.addr() < b.addr() {
        let first = a.read();
        let second = b.read();
        (first, second)
    } else {
        let first = b.read();
        let second = a.read();
        (second, first)
    }
}
