use std::{
    borrow::Borrow,
    hash::{BuildHasher, Hash},
    sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use hashbrown::{DefaultHashBuilder, HashSet};

/// An unordered set of unique elements that can be shared between threads.
///
/// The membership table lives behind a reader/writer lock owned by the set:
/// lookups, iteration and rendering take it in shared mode, [`insert`] and
/// [`remove`] take it in exclusive mode. The table itself is never handed out.
///
/// The lock is not reentrant. A visitor passed to [`range`] must not mutate
/// the set it is iterating, or it will deadlock.
///
/// # Examples
///
/// ```
/// use rwset::sets::concurrent::ConcurrentSet;
///
/// let cities = ConcurrentSet::new();
/// cities.insert("lyon");
/// cities.insert("lyon");
/// assert_eq!(cities.len(), 1);
/// assert!(cities.contains("lyon"));
///
/// cities.remove("lyon");
/// assert!(cities.is_empty());
/// ```
///
/// [`insert`]: ConcurrentSet::insert
/// [`remove`]: ConcurrentSet::remove
/// [`range`]: ConcurrentSet::range
pub struct ConcurrentSet<T, S = DefaultHashBuilder> {
    /*private*/ table: RwLock<HashSet<T, S>>,
}

impl<T> ConcurrentSet<T, DefaultHashBuilder> {
    /// Creates an empty set using the default hasher.
    pub fn new() -> Self {
        Self::from_table(HashSet::new())
    }

    /// Creates an empty set with room for at least `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_table(HashSet::with_capacity(capacity))
    }
}

impl<T, S> ConcurrentSet<T, S> {
    /// Creates an empty set which will hash its elements with `hasher`.
    pub fn with_hasher(hasher: S) -> Self {
        Self::from_table(HashSet::with_hasher(hasher))
    }

    pub fn with_capacity_and_hasher(capacity: usize, hasher: S) -> Self {
        Self::from_table(HashSet::with_capacity_and_hasher(capacity, hasher))
    }

    pub(super) fn from_table(table: HashSet<T, S>) -> Self {
        ConcurrentSet {
            table: RwLock::new(table),
        }
    }

    // A panic while the lock was held leaves the table structurally valid,
    // though a batch from `insert_all` may be partially applied, so a
    // poisoned lock is taken over as-is.
    pub(super) fn read(&self) -> RwLockReadGuard<'_, HashSet<T, S>> {
        self.table.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashSet<T, S>> {
        self.table.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Identity of this instance, used to order lock acquisition across sets.
    pub(super) fn addr(&self) -> usize {
        std::ptr::from_ref(self).addr()
    }

    pub(super) fn same_instance(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }

    /// Returns the number of members.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Removes every member.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Calls `visitor` once per member, in no particular order, until it
    /// returns `false`.
    ///
    /// The shared lock is held for the whole traversal, so `visitor` must not
    /// insert into or remove from this same set.
    ///
    /// # Examples
    /// ```
    /// use rwset::sets::concurrent::ConcurrentSet;
    ///
    /// let set = ConcurrentSet::from([1, 2, 3, 4]);
    /// let mut seen = 0;
    /// set.range(|_| {
    ///     seen += 1;
    ///     seen < 2
    /// });
    /// assert_eq!(seen, 2);
    /// ```
    pub fn range<F>(&self, mut visitor: F)
    where
        F: FnMut(&T) -> bool,
    {
        let table = self.read();
        for element in table.iter() {
            if !visitor(element) {
                break;
            }
        }
    }
}

impl<T, S> ConcurrentSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    /// Adds `element` to the set. Returns `true` if it was not already a member;
    /// inserting an existing member leaves the set unchanged.
    pub fn insert(&self, element: T) -> bool {
        self.write().insert(element)
    }

    /// Adds every element of `elements` under a single exclusive acquisition.
    pub fn insert_all<I>(&self, elements: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.write().extend(elements);
    }

    /// Removes `element` from the set. Returns `true` if it was a member;
    /// removing an absent element is a no-op.
    pub fn remove<Q>(&self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.write().remove(element)
    }

    /// Returns `true` if `element` is currently a member.
    pub fn contains<Q>(&self, element: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.read().contains(element)
    }
}

impl<T, S> ConcurrentSet<T, S>
where
    T: Clone,
    S: Clone,
{
    /// Returns an independent snapshot of the current members. The copy has
    /// its own table and lock; later mutations of either set do not affect
    /// the other.
    ///
    /// # Examples
    /// ```
    /// use rwset::sets::concurrent::ConcurrentSet;
    ///
    /// let original = ConcurrentSet::from(["bern", "london"]);
    /// let copy = original.copy();
    /// copy.remove("bern");
    ///
    /// assert!(original.contains("bern"));
    /// assert!(!copy.contains("bern"));
    /// ```
    pub fn copy(&self) -> Self {
        let snapshot = self.read().clone();
        Self::from_table(snapshot)
    }

    /// Collects the current members into a vector, in no particular order.
    pub fn to_vec(&self) -> Vec<T> {
        self.read().iter().cloned().collect()
    }
}

impl<T, S> Clone for ConcurrentSet<T, S>
where
    T: Clone,
    S: Clone,
{
    fn clone(&self) -> Self {
        self.copy()
    }
}

impl<T, S> Default for ConcurrentSet<T, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<T, S> FromIterator<T> for ConcurrentSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_table(iter.into_iter().collect())
    }
}

impl<T, S> Extend<T> for ConcurrentSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        // exclusive borrow, no other thread can hold the lock
        self.table
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(iter);
    }
}

impl<T, const N: usize> From<[T; N]> for ConcurrentSet<T, DefaultHashBuilder>
where
    T: Eq + Hash,
{
    fn from(elements: [T; N]) -> Self {
        elements.into_iter().collect()
    }
}
