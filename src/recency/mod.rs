//! An ordered set of keys tracking the order in which they were last touched.

use std::borrow::Borrow;
use std::fmt::{Debug, Formatter};
use std::hash::Hash;

use chain::Chain;
use iter::Cursor;

pub use iter::Iter;

mod chain;
mod iter;

/// An ordered set of keys, kept from most to least recently touched.
///
/// Inserting a key that is already present promotes it to the newest position
/// instead of adding it twice. Insertion, promotion, deletion of any key, and
/// peeking at either end are all constant time operations.
///
/// The index holds no values; it only tracks order. Keys are stored twice
/// internally (once in the ordering and once in a lookup table), hence the
/// [`Clone`] bound. Cheaply clonable keys such as integers or [`Arc`]s are a
/// good fit.
///
/// ```
/// # use linked_lru::RecencyIndex;
/// let mut index = RecencyIndex::new();
/// index.insert("a");
/// index.insert("b");
/// index.insert("c");
/// assert_eq!(index.first(), Some(&"c"));
/// assert_eq!(index.last(), Some(&"a"));
///
/// // Re-inserting promotes instead of duplicating.
/// index.insert("a");
/// assert_eq!(index.len(), 3);
/// assert_eq!(index.first(), Some(&"a"));
/// assert_eq!(index.last(), Some(&"b"));
/// ```
///
/// [`Arc`]: std::sync::Arc
// This is re-exported at the crate root, so this lint can be safely ignored.
#[allow(clippy::module_name_repetitions)]
pub struct RecencyIndex<K> {
    state: State<K>,
}

/// The structural state of the index. Zero and one keys are represented
/// directly so that a chain always has distinct newest and oldest nodes.
enum State<K> {
    Empty,
    Singleton(K),
    Chained(Chain<K>),
}

impl<K> Default for State<K> {
    #[inline]
    fn default() -> Self {
        Self::Empty
    }
}

impl<K> Default for RecencyIndex<K> {
    #[inline]
    fn default() -> Self {
        Self {
            state: State::Empty,
        }
    }
}

impl<K: Hash + Eq + Clone> RecencyIndex<K> {
    /// Creates an empty index. This does not allocate.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` as the most recently touched key. If it is already present,
    /// it is moved to the front and every other key keeps its relative order;
    /// the key already held is kept and `key` is dropped.
    pub fn insert(&mut self, key: K) {
        self.state = match std::mem::take(&mut self.state) {
            State::Empty => State::Singleton(key),
            State::Singleton(existing) if existing == key => State::Singleton(existing),
            State::Singleton(existing) => State::Chained(Chain::pair(key, existing)),
            State::Chained(mut chain) => {
                chain.insert(key);
                State::Chained(chain)
            }
        };
    }

    /// Removes `key` from the index, returning the key that was held, if it
    /// was present. Only the neighbours of the removed key are relinked.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let (state, removed) = match std::mem::take(&mut self.state) {
            State::Empty => (State::Empty, None),
            State::Singleton(existing) if <K as Borrow<Q>>::borrow(&existing) == key => {
                (State::Empty, Some(existing))
            }
            State::Singleton(existing) => (State::Singleton(existing), None),
            State::Chained(mut chain) => {
                let removed = chain.remove(key);
                (Self::settle(chain), removed)
            }
        };
        self.state = state;
        removed
    }

    /// Removes and returns the least recently touched key.
    pub fn pop_last(&mut self) -> Option<K> {
        let (state, popped) = match std::mem::take(&mut self.state) {
            State::Empty => (State::Empty, None),
            State::Singleton(existing) => (State::Empty, Some(existing)),
            State::Chained(mut chain) => {
                let popped = chain.pop_oldest();
                (Self::settle(chain), Some(popped))
            }
        };
        self.state = state;
        popped
    }

    /// Returns the most recently touched key.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&K> {
        match &self.state {
            State::Empty => None,
            State::Singleton(key) => Some(key),
            State::Chained(chain) => Some(chain.newest_key()),
        }
    }

    /// Returns the least recently touched key.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&K> {
        match &self.state {
            State::Empty => None,
            State::Singleton(key) => Some(key),
            State::Chained(chain) => Some(chain.oldest_key()),
        }
    }

    /// Returns if `key` is held by the index. This does not change its
    /// position.
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match &self.state {
            State::Empty => false,
            State::Singleton(existing) => <K as Borrow<Q>>::borrow(existing) == key,
            State::Chained(chain) => chain.contains(key),
        }
    }

    /// Returns the number of keys held. This is a constant time operation.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.state {
            State::Empty => 0,
            State::Singleton(_) => 1,
            State::Chained(chain) => chain.len(),
        }
    }

    /// Returns if the index holds no keys.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self.state, State::Empty)
    }

    /// Removes every key.
    #[inline]
    pub fn clear(&mut self) {
        self.state = State::Empty;
    }

    /// Returns an iterator over the keys from most to least recently touched.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K> {
        let cursor = match &self.state {
            State::Empty => Cursor::Done,
            State::Singleton(key) => Cursor::Single(key),
            State::Chained(chain) => Cursor::Chained {
                chain,
                next: Some(chain.newest()),
            },
        };
        Iter {
            cursor,
            remaining: self.len(),
        }
    }

    /// Collapses a chain that lost a node back into a singleton if needed.
    fn settle(chain: Chain<K>) -> State<K> {
        if chain.len() == 1 {
            State::Singleton(chain.into_single())
        } else {
            State::Chained(chain)
        }
    }

    #[cfg(test)]
    pub(crate) fn debug_validate_invariants(&self) {
        match &self.state {
            State::Empty => {
                assert_eq!(self.len(), 0);
                assert!(self.first().is_none());
                assert!(self.last().is_none());
            }
            State::Singleton(key) => {
                assert_eq!(self.len(), 1);
                assert!(self.first() == Some(key));
                assert!(self.last() == Some(key));
            }
            State::Chained(chain) => chain.debug_validate_invariants(),
        }
        assert_eq!(self.iter().count(), self.len());
    }
}

impl<K: Hash + Eq + Clone + Debug> Debug for RecencyIndex<K> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<K: Hash + Eq + Clone> Extend<K> for RecencyIndex<K> {
    /// Inserts each key in turn, so the last key yielded ends up newest.
    fn extend<T: IntoIterator<Item = K>>(&mut self, iter: T) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Hash + Eq + Clone> FromIterator<K> for RecencyIndex<K> {
    fn from_iter<T: IntoIterator<Item = K>>(iter: T) -> Self {
        let mut index = Self::new();
        index.extend(iter);
        index
    }
}

impl<'a, K: Hash + Eq + Clone> IntoIterator for &'a RecencyIndex<K> {
    type Item = &'a K;

    type IntoIter = Iter<'a, K>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}


#[cfg(test)]
mod delete {
    use super::RecencyIndex;

    #[test]
    fn from_empty() {
        let mut index = RecencyIndex::<u32>::new();
        assert_eq!(index.delete(&1), None);
        assert!(index.is_empty());
    }

    #[test]
    fn singleton_to_empty() {
        let mut index = RecencyIndex::new();
        index.insert(1);
        assert_eq!(index.delete(&2), None);
        assert_eq!(index.len(), 1);
        assert_eq!(index.delete(&1), Some(1));
        index.debug_validate_invariants();
        assert!(index.is_empty());
        assert!(index.first().is_none());
        assert!(index.last().is_none());
    }

    #[test]
    fn pair_collapses_to_singleton() {
        for (delete, remaining) in [(1, 2), (2, 1)] {
            let mut index: RecencyIndex<_> = [1, 2].into_iter().collect();
            assert_eq!(index.delete(&delete), Some(delete));
            index.debug_validate_invariants();
            assert_eq!(index.len(), 1);
            assert_eq!(index.first(), Some(&remaining));
            assert_eq!(index.last(), Some(&remaining));
        }
    }

    #[test]
    fn missing_from_chain() {
        let mut index: RecencyIndex<_> = [1, 2].into_iter().collect();
        assert_eq!(index.delete(&3), None);
        index.debug_validate_invariants();
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn interior_and_boundaries() {
        let mut index: RecencyIndex<_> = (0..5).collect();

        index.delete(&2);
        index.debug_validate_invariants();
        assert_eq!(index.iter().copied().collect::<Vec<_>>(), vec![4, 3, 1, 0]);

        index.delete(&4);
        index.debug_validate_invariants();
        assert_eq!(index.first(), Some(&3));

        index.delete(&0);
        index.debug_validate_invariants();
        assert_eq!(index.last(), Some(&1));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn borrowed_lookup() {
        let mut index = RecencyIndex::new();
        index.insert(String::from("foo"));
        index.insert(String::from("bar"));
        assert!(index.contains("foo"));
        assert_eq!(index.delete("foo"), Some(String::from("foo")));
        assert!(!index.contains("foo"));
    }

    #[test]
    fn reinsert_after_delete() {
        let mut index: RecencyIndex<_> = (0..4).collect();
        index.delete(&1);
        index.insert(1);
        index.debug_validate_invariants();
        assert_eq!(index.iter().copied().collect::<Vec<_>>(), vec![1, 3, 2, 0]);
    }
}


#[cfg(test)]
mod iteration {
    use super::RecencyIndex;

    #[test]
    fn empty() {
        let index = RecencyIndex::<u32>::new();
        assert!(index.iter().next().is_none());
    }

    #[test]
    fn size_is_correct() {
        let index: RecencyIndex<_> = (0..10).collect();
        let mut iter = index.iter();
        assert_eq!(iter.len(), 10);
        iter.next();
        assert_eq!(iter.size_hint(), (9, Some(9)));
    }

    #[test]
    fn fused() {
        let mut index = RecencyIndex::new();
        index.insert(1);
        let mut iter = index.iter();
        assert_eq!(iter.next(), Some(&1));
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }

    #[test]
    fn debug_lists_newest_first() {
        let index: RecencyIndex<_> = (0..3).collect();
        assert_eq!(format!("{:?}", index), "[2, 1, 0]");
    }
}
