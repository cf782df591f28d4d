use std::collections::HashMap;
use std::fmt::{Debug, Formatter};
use std::hash::Hash;
use std::iter::{FromIterator, FusedIterator};
use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::{ConfigError, LruCacheIter, RecencyIndex};

/// A collection bounded to a fixed capacity that evicts the least recently used
/// entry when an insertion would exceed that capacity.
///
/// Both writes and successful reads mark an entry as the most recently used.
/// A read that misses leaves the order untouched.
///
/// Keys are shared between the value lookup and the recency index, so keys do
/// not need to implement [`Clone`].
// Note that Default is _not_ implemented. A cache must always be given a
// capacity.
// This is re-exported at the crate root, so this lint can be safely ignored.
#[allow(clippy::module_name_repetitions)]
pub struct LruCache<Key: Hash + Eq, Value> {
    lookup: HashMap<Arc<Key>, Value>,
    recency: RecencyIndex<Arc<Key>>,
    capacity: NonZeroUsize,
}

impl<Key: Hash + Eq, Value> LruCache<Key, Value> {
    /// Creates an LRU cache that holds at most `capacity` entries.
    ///
    /// ```
    /// # use std::num::NonZeroUsize;
    /// # use linked_lru::LruCache;
    /// let mut cache = LruCache::new(NonZeroUsize::new(2).unwrap());
    ///
    /// cache.put(1, "a");
    /// cache.put(2, "b");
    /// cache.put(3, "c");
    ///
    /// // The oldest entry was evicted to make room.
    /// assert_eq!(cache.len(), 2);
    /// assert!(cache.get(&1).is_none());
    /// assert_eq!(cache.get(&2), Some(&"b"));
    /// ```
    #[inline]
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            lookup: HashMap::new(),
            recency: RecencyIndex::new(),
            capacity,
        }
    }

    /// Creates an LRU cache that holds at most `capacity` entries, rejecting a
    /// capacity of zero.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `capacity` is zero.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, ConfigError> {
        NonZeroUsize::new(capacity).map(Self::new).ok_or_else(|| {
            log::debug!("rejected lru cache capacity of {}", capacity);
            ConfigError::new("capacity must be greater than zero")
        })
    }

    /// Creates an LRU cache that holds at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero. Use [`Self::try_with_capacity`] to handle
    /// that case without panicking.
    #[inline]
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        match Self::try_with_capacity(capacity) {
            Ok(cache) => cache,
            Err(err) => panic!("{}", err),
        }
    }

    /// Inserts a value under `key`, replacing any previous value, and marks
    /// `key` as the most recently used. If this pushes the cache over its
    /// capacity, the least recently used entry is evicted.
    ///
    /// A cache with a capacity of one always holds only the last key written.
    #[inline]
    pub fn put(&mut self, key: Key, value: Value) {
        self.push(key, value);
    }

    /// Same as [`Self::put`], but returns the evicted key-value pair, if an
    /// eviction was needed. Replacing the value of an existing key never
    /// evicts, and the replaced value is dropped.
    ///
    /// ```
    /// # use linked_lru::LruCache;
    /// let mut cache = LruCache::with_capacity(1);
    /// assert_eq!(cache.push("foo", 1), None);
    /// assert_eq!(cache.push("foo", 2), None);
    /// assert_eq!(cache.push("bar", 3), Some(("foo", 2)));
    /// ```
    pub fn push(&mut self, key: Key, value: Value) -> Option<(Key, Value)> {
        let key = Arc::new(key);
        // An existing entry keeps its original key in both structures.
        self.lookup.insert(Arc::clone(&key), value);
        self.recency.insert(key);

        if self.len() > self.capacity.get() {
            let evicted = self.pop_lru();
            log::trace!(
                "evicted least recently used entry, {} of {} entries held",
                self.len(),
                self.capacity
            );
            return evicted;
        }

        None
    }

    /// Gets a value and marks it as the most recently used, if it exists.
    pub fn get(&mut self, key: &Key) -> Option<&Value> {
        let (stored, value) = self.lookup.get_key_value(key)?;
        self.recency.insert(Arc::clone(stored));
        Some(value)
    }

    /// Gets a mutable value and marks it as the most recently used, if it
    /// exists.
    pub fn get_mut(&mut self, key: &Key) -> Option<&mut Value> {
        let (stored, _) = self.lookup.get_key_value(key)?;
        self.recency.insert(Arc::clone(stored));
        self.lookup.get_mut(key)
    }

    /// Gets a value without changing its position in the recency order.
    #[inline]
    #[must_use]
    pub fn peek(&self, key: &Key) -> Option<&Value> {
        self.lookup.get(key)
    }

    /// Returns if a value is held under `key`. This does not change its
    /// position in the recency order.
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &Key) -> bool {
        self.lookup.contains_key(key)
    }

    /// Removes a value from the cache by key, if it exists.
    pub fn remove(&mut self, key: &Key) -> Option<Value> {
        let (_, value) = self.lookup.remove_entry(key)?;
        self.recency.delete(key);
        Some(value)
    }

    /// Evicts the least recently used entry and returns it. If the cache is
    /// empty, then this returns None.
    pub fn pop_lru(&mut self) -> Option<(Key, Value)> {
        let key = self.recency.pop_last()?;
        let (stored, value) = self.lookup.remove_entry(&*key)?;
        drop(stored);

        // Both structures have released the key, so this is the last handle.
        match Arc::try_unwrap(key) {
            Ok(key) => Some((key, value)),
            Err(_) => unreachable!("lru cache key is still shared after eviction"),
        }
    }

    /// Peeks at the entry that would be evicted next, without changing its
    /// position in the recency order.
    #[must_use]
    pub fn peek_lru(&self) -> Option<(&Key, &Value)> {
        let key = self.recency.last()?;
        self.lookup
            .get_key_value(&**key)
            .map(|(key, value)| (&**key, value))
    }

    /// Returns the key of the most recently used entry.
    #[inline]
    #[must_use]
    pub fn most_recently_used(&self) -> Option<&Key> {
        self.recency.first().map(|key| &**key)
    }

    /// Returns the key of the least recently used entry, which is the next to
    /// be evicted.
    #[inline]
    #[must_use]
    pub fn least_recently_used(&self) -> Option<&Key> {
        self.recency.last().map(|key| &**key)
    }

    /// Returns the maximum number of entries this cache holds.
    #[inline]
    #[must_use]
    pub fn max_size(&self) -> NonZeroUsize {
        self.capacity
    }

    /// Returns the current number of items in the cache. This is a constant
    /// time operation.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    /// Returns if the cache contains no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lookup.is_empty()
    }

    /// Removes every entry. The capacity is unchanged.
    pub fn clear(&mut self) {
        self.recency.clear();
        self.lookup.clear();
    }

    /// Returns an iterator over the keys of the cache, from most to least
    /// recently used. This does **not** change the recency order.
    #[inline]
    pub fn keys(&self) -> impl Iterator<Item = &Key> + ExactSizeIterator + FusedIterator + '_ {
        self.recency.iter().map(|key| &**key)
    }

    /// Returns an iterator over the keys and values of the cache, from most to
    /// least recently used. This does **not** change the recency order.
    #[inline]
    pub fn peek_iter(&self) -> impl Iterator<Item = (&Key, &Value)> + FusedIterator + '_ {
        self.recency.iter().filter_map(move |key| {
            self.lookup
                .get_key_value(&**key)
                .map(|(key, value)| (&**key, value))
        })
    }

    #[cfg(test)]
    pub(crate) fn debug_validate_invariants(&self) {
        self.recency.debug_validate_invariants();
        assert_eq!(self.recency.len(), self.lookup.len());
        assert!(self.len() <= self.capacity.get());
        for key in self.recency.iter() {
            assert!(self.lookup.contains_key(key));
        }
    }
}

impl<Key: Hash + Eq + Debug, Value: Debug> Debug for LruCache<Key, Value> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        struct Entries<'a, K: Hash + Eq, V>(&'a LruCache<K, V>);

        impl<K: Hash + Eq + Debug, V: Debug> Debug for Entries<'_, K, V> {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.debug_map().entries(self.0.peek_iter()).finish()
            }
        }

        f.debug_struct("LruCache")
            .field("capacity", &self.capacity)
            .field("entries", &Entries(self))
            .finish()
    }
}

impl<Key: Hash + Eq, Value> FromIterator<(Key, Value)> for LruCache<Key, Value> {
    /// Constructs an LRU cache with the capacity equal to the number of
    /// distinct keys in the iterator, or one if the iterator is empty. Later
    /// pairs are more recently used than earlier ones.
    fn from_iter<T: IntoIterator<Item = (Key, Value)>>(iter: T) -> Self {
        let mut cache = Self::new(NonZeroUsize::MAX);
        cache.extend(iter);
        cache.capacity = NonZeroUsize::new(cache.len()).unwrap_or(NonZeroUsize::MIN);
        cache
    }
}

impl<Key: Hash + Eq, Value> Extend<(Key, Value)> for LruCache<Key, Value> {
    /// Inserts the items from the iterator into the cache. Note that this may
    /// evict items if the number of elements in the iterator plus the number of
    /// current items in the cache exceeds the capacity of the cache.
    fn extend<T: IntoIterator<Item = (Key, Value)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<Key: Hash + Eq, Value> IntoIterator for LruCache<Key, Value> {
    type Item = (Key, Value);

    type IntoIter = LruCacheIter<Key, Value>;

    fn into_iter(self) -> Self::IntoIter {
        LruCacheIter(self)
    }
}

#[cfg(test)]
mod new {
    use std::num::NonZeroUsize;

    use super::LruCache;

    #[test]
    fn zero_capacity_is_rejected() {
        let err = LruCache::<u32, u32>::try_with_capacity(0).unwrap_err();
        assert!(err.message().contains("capacity"));
    }

    #[test]
    #[should_panic(expected = "capacity")]
    fn with_zero_capacity_panics() {
        let _ = LruCache::<u32, u32>::with_capacity(0);
    }

    #[test]
    fn max_size_reports_capacity() {
        let cache = LruCache::<u32, u32>::try_with_capacity(3).unwrap();
        assert_eq!(cache.max_size(), NonZeroUsize::new(3).unwrap());
        assert!(cache.is_empty());
        assert!(cache.most_recently_used().is_none());
        assert!(cache.least_recently_used().is_none());
    }
}


#[cfg(test)]
mod get {
    use super::LruCache;

    #[test]
    fn empty() {
        let mut cache = LruCache::<u64, u64>::with_capacity(10);
        for i in 0..100 {
            assert!(cache.get(&i).is_none());
        }
        assert!(cache.is_empty());
    }

    #[test]
    fn miss_keeps_order() {
        let mut cache = LruCache::with_capacity(3);
        cache.put(1, 1);
        cache.put(2, 2);
        assert!(cache.get(&5).is_none());
        cache.debug_validate_invariants();
        assert_eq!(cache.most_recently_used(), Some(&2));
        assert_eq!(cache.least_recently_used(), Some(&1));
    }

    #[test]
    fn hit_promotes() {
        let mut cache = LruCache::with_capacity(3);
        cache.put(1, 1);
        cache.put(2, 2);
        cache.put(3, 3);
        assert_eq!(cache.get(&1), Some(&1));
        cache.debug_validate_invariants();
        assert_eq!(cache.most_recently_used(), Some(&1));
        assert_eq!(cache.least_recently_used(), Some(&2));
    }

    #[test]
    fn get_mut() {
        let mut cache = LruCache::with_capacity(2);
        cache.put(1, 2);
        cache.put(3, 4);
        *cache.get_mut(&1).unwrap() = 5;
        assert_eq!(cache.most_recently_used(), Some(&1));
        assert_eq!(cache.peek(&1), Some(&5));
        assert!(cache.get_mut(&7).is_none());
    }

    #[test]
    fn peek_keeps_order() {
        let mut cache = LruCache::with_capacity(2);
        cache.put(1, 1);
        cache.put(2, 2);
        assert_eq!(cache.peek(&1), Some(&1));
        assert!(cache.contains(&1));
        assert_eq!(cache.least_recently_used(), Some(&1));
    }
}

#[cfg(test)]
mod remove {
    use super::LruCache;

    #[test]
    fn remove_to_empty() {
        let mut cache = LruCache::with_capacity(2);
        cache.put(1, 2);
        assert_eq!(cache.remove(&1), Some(2));
        cache.debug_validate_invariants();
        assert!(cache.is_empty());
        assert!(cache.recency.is_empty());
    }

    #[test]
    fn remove_empty() {
        let mut cache = LruCache::<usize, usize>::with_capacity(2);
        assert!(cache.remove(&1).is_none());
    }

    #[test]
    fn remove_to_nonempty() {
        let mut cache = LruCache::with_capacity(3);
        cache.put(1, 2);
        cache.put(3, 4);
        cache.put(5, 6);

        assert_eq!(cache.remove(&3), Some(4));
        cache.debug_validate_invariants();
        assert_eq!(cache.most_recently_used(), Some(&5));
        assert_eq!(cache.least_recently_used(), Some(&1));

        assert_eq!(cache.remove(&1), Some(2));
        assert_eq!(cache.remove(&5), Some(6));
        assert!(cache.is_empty());
    }

    #[test]
    fn clear() {
        let mut cache = LruCache::with_capacity(3);
        cache.extend([(1, 1), (2, 2)]);
        cache.clear();
        cache.debug_validate_invariants();
        assert!(cache.is_empty());
        assert_eq!(cache.max_size().get(), 3);
    }
}

#[cfg(test)]
mod pop {
    use super::LruCache;

    #[test]
    fn pop() {
        let mut cache = LruCache::with_capacity(100);
        for i in 0..100 {
            cache.put(i, i + 100);
        }

        for i in 0..100 {
            assert_eq!(cache.len(), 100 - i);
            assert_eq!(cache.peek_lru(), Some((&i, &(i + 100))));
            assert_eq!(cache.pop_lru(), Some((i, i + 100)));
        }
    }

    #[test]
    fn pop_empty() {
        let mut cache = LruCache::<i32, i32>::with_capacity(1);
        assert_eq!(cache.pop_lru(), None);
        assert_eq!(cache.peek_lru(), None);
    }
}
