use std::iter::FusedIterator;

use super::chain::{Chain, NodeId};

/// A borrowing iterator over the keys of a [`RecencyIndex`], from most to
/// least recently touched.
///
/// This is constructed by calling [`RecencyIndex::iter`].
///
/// [`RecencyIndex`]: super::RecencyIndex
/// [`RecencyIndex::iter`]: super::RecencyIndex::iter
#[derive(Debug)]
pub struct Iter<'a, K> {
    pub(super) cursor: Cursor<'a, K>,
    pub(super) remaining: usize,
}

#[derive(Debug)]
pub(super) enum Cursor<'a, K> {
    Done,
    Single(&'a K),
    Chained {
        chain: &'a Chain<K>,
        next: Option<NodeId>,
    },
}

impl<'a, K> Clone for Iter<'a, K> {
    fn clone(&self) -> Self {
        let cursor = match self.cursor {
            Cursor::Done => Cursor::Done,
            Cursor::Single(key) => Cursor::Single(key),
            Cursor::Chained { chain, next } => Cursor::Chained { chain, next },
        };
        Self {
            cursor,
            remaining: self.remaining,
        }
    }
}

impl<'a, K: std::hash::Hash + Eq + Clone> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let key = match std::mem::replace(&mut self.cursor, Cursor::Done) {
            Cursor::Done => return None,
            Cursor::Single(key) => key,
            Cursor::Chained { chain, next } => {
                let id = next?;
                self.cursor = Cursor::Chained {
                    chain,
                    next: chain.older_than(id),
                };
                chain.key_of(id)
            }
        };
        self.remaining -= 1;
        Some(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K: std::hash::Hash + Eq + Clone> FusedIterator for Iter<'a, K> {}

impl<'a, K: std::hash::Hash + Eq + Clone> ExactSizeIterator for Iter<'a, K> {
    #[inline]
    fn len(&self) -> usize {
        self.remaining
    }
}
