use std::hash::Hash;
use std::iter::FusedIterator;

use crate::LruCache;

/// A consuming iterator over the keys and values of an LRU cache, in order of
/// least recently used first.
///
/// This is constructed by calling `into_iter` on an [`LruCache`].
// This is re-exported at the crate root, so this lint can be safely ignored.
#[allow(clippy::module_name_repetitions)]
pub struct LruCacheIter<Key: Hash + Eq, Value>(pub(crate) LruCache<Key, Value>);

impl<Key: Hash + Eq, Value> Iterator for LruCacheIter<Key, Value> {
    type Item = (Key, Value);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.pop_lru()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.0.len(), Some(self.0.len()))
    }
}

impl<Key: Hash + Eq, Value> FusedIterator for LruCacheIter<Key, Value> {}

impl<Key: Hash + Eq, Value> ExactSizeIterator for LruCacheIter<Key, Value> {
    #[inline]
    fn len(&self) -> usize {
        self.0.len()
    }
}
