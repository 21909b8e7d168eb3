use std::hash::{BuildHasher, Hash};

use hashbrown::HashSet;
use tracing::trace;

use crate::sets::concurrent::{
    ConcurrentSet,
    lock_order::{OrderedReadGuards, read_pair},
};

/// Returns a new set holding every element that is a member of at least one
/// of `sets`. No inputs yield an empty set.
///
/// Each input is read under its own shared lock, one input at a time, so the
/// result is not an atomic snapshot across inputs that other threads mutate
/// during the call.
///
/// # Examples
/// ```
/// use rwset::sets::concurrent::{ConcurrentSet, union};
///
/// let a = ConcurrentSet::from(["bern", "london"]);
/// let b = ConcurrentSet::from(["london", "york"]);
/// let u = union(&[&a, &b]);
/// assert_eq!(u.len(), 3);
/// ```
pub fn union<T, S>(sets: &[&ConcurrentSet<T, S>]) -> ConcurrentSet<T, S>
where
    T: Eq + Hash + Clone,
    S: BuildHasher + Default,
{
    let mut members = HashSet::with_hasher(S::default());
    for set in sets {
        set.range(|element| {
            members.insert(element.clone());
            true
        });
    }

    trace!(inputs = sets.len(), members = members.len(), "union");
    ConcurrentSet::from_table(members)
}

/// Returns a new set holding only the elements that are members of every one
/// of `sets`. No inputs yield an empty set.
///
/// All distinct inputs are locked in shared mode for the duration of the
/// call. Only the members of the smallest input are probed against the
/// others, so the work is bounded by the smallest input's size times the
/// number of inputs.
///
/// # Examples
/// ```
/// use rwset::sets::concurrent::{ConcurrentSet, intersection};
///
/// let s = ConcurrentSet::from(["zürich", "turin", "london"]);
/// let t = ConcurrentSet::from(["york", "london", "turin"]);
/// let u = ConcurrentSet::from(["bern", "london"]);
///
/// let i = intersection(&[&s, &t, &u]);
/// assert_eq!(i.len(), 1);
/// assert!(i.contains("london"));
/// ```
pub fn intersection<T, S>(sets: &[&ConcurrentSet<T, S>]) -> ConcurrentSet<T, S>
where
    T: Eq + Hash + Clone,
    S: BuildHasher + Default,
{
    let guards = OrderedReadGuards::acquire(sets);
    let Some(smallest) = guards.tables().min_by_key(|table| table.len()) else {
        trace!(inputs = 0, "intersection of nothing");
        return ConcurrentSet::default();
    };

    let members: HashSet<T, S> = smallest
        .iter()
        .filter(|element| {
            guards
                .tables()
                .filter(|table| !std::ptr::eq(*table, smallest))
                .all(|table| table.contains(*element))
        })
        .cloned()
        .collect();

    trace!(
        inputs = sets.len(),
        distinct = guards.len(),
        smallest = smallest.len(),
        members = members.len(),
        "intersection"
    );
    ConcurrentSet::from_table(members)
}

impl<T, S> ConcurrentSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    /// Returns `true` if every member of `self` is also a member of `other`.
    /// The empty set is a subset of every set, itself included.
    ///
    /// # Examples
    /// ```
    /// use rwset::sets::concurrent::ConcurrentSet;
    ///
    /// let small = ConcurrentSet::from([1, 2]);
    /// let big = ConcurrentSet::from([1, 2, 3]);
    /// assert!(small.is_subset(&big));
    /// assert!(!big.is_subset(&small));
    /// ```
    pub fn is_subset(&self, other: &Self) -> bool {
        if self.same_instance(other) {
            return true;
        }

        let (mine, theirs) = read_pair(self, other);
        mine.len() <= theirs.len() && mine.iter().all(|element| theirs.contains(element))
    }

    /// Returns `true` if `self` and `other` have exactly the same members.
    /// Sets of different sizes are rejected before any element is compared.
    pub fn equal(&self, other: &Self) -> bool {
        if self.same_instance(other) {
            return true;
        }

        let (mine, theirs) = read_pair(self, other);
        if mine.len() != theirs.len() {
            return false;
        }
        mine.iter().all(|element| theirs.contains(element))
    }
}

impl<T, S> ConcurrentSet<T, S>
where
    T: Eq + Hash + Clone,
    S: BuildHasher + Default,
{
    /// Returns a new set with the members of `self` that are not members of
    /// `other`, i.e. `self - other`.
    ///
    /// # Examples
    /// ```
    /// use rwset::sets::concurrent::ConcurrentSet;
    ///
    /// let s = ConcurrentSet::from(["sofia", "turin", "lyon"]);
    /// let t = ConcurrentSet::from(["turin", "york"]);
    ///
    /// let d = s.difference(&t);
    /// assert_eq!(d.len(), 2);
    /// assert!(d.contains("sofia") && d.contains("lyon"));
    /// ```
    pub fn difference(&self, other: &Self) -> Self {
        if self.same_instance(other) {
            return Self::default();
        }

        let (mine, theirs) = read_pair(self, other);
        let members: HashSet<T, S> = mine
            .iter()
            .filter(|element| !theirs.contains(*element))
            .cloned()
            .collect();

        trace!(
            left = mine.len(),
            right = theirs.len(),
            members = members.len(),
            "difference"
        );
        Self::from_table(members)
    }

    /// Two-set form of [`union`].
    pub fn union(&self, other: &Self) -> Self {
        union(&[self, other])
    }

    /// Two-set form of [`intersection`].
    pub fn intersection(&self, other: &Self) -> Self {
        intersection(&[self, other])
    }
}

impl<T, S> PartialEq for ConcurrentSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl<T, S> Eq for ConcurrentSet<T, S>
where
    T: Eq + Hash,
    S: BuildHasher,
{
}
