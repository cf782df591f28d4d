use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// Stable handle to a node in a [`Chain`]'s arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub(super) struct NodeId(usize);

#[derive(Debug)]
struct Node<K> {
    key: K,
    /// Link towards the least recently used end.
    older: Option<NodeId>,
    /// Link towards the most recently used end.
    newer: Option<NodeId>,
}

/// A doubly linked sequence of at least two keys, ordered from newest to
/// oldest.
///
/// Nodes live in an arena and refer to each other by [`NodeId`] instead of by
/// pointer. Vacated slots are recycled through a free list, so a node's id is
/// stable for as long as its key is held. The lookup table maps every held key
/// to the node that owns it, which makes locating and splicing out any node a
/// constant time operation.
#[derive(Debug)]
pub(super) struct Chain<K> {
    slots: Vec<Option<Node<K>>>,
    free_list: Vec<usize>,
    lookup: HashMap<K, NodeId>,
    newest: NodeId,
    oldest: NodeId,
}

impl<K: Hash + Eq + Clone> Chain<K> {
    /// Links two distinct keys together.
    pub(super) fn pair(newest: K, oldest: K) -> Self {
        debug_assert!(newest != oldest, "a chain cannot hold a key twice");

        let newest_id = NodeId(0);
        let oldest_id = NodeId(1);

        let mut lookup = HashMap::with_capacity(2);
        lookup.insert(newest.clone(), newest_id);
        lookup.insert(oldest.clone(), oldest_id);

        Self {
            slots: vec![
                Some(Node {
                    key: newest,
                    older: Some(oldest_id),
                    newer: None,
                }),
                Some(Node {
                    key: oldest,
                    older: None,
                    newer: Some(newest_id),
                }),
            ],
            free_list: Vec::new(),
            lookup,
            newest: newest_id,
            oldest: oldest_id,
        }
    }

    #[inline]
    pub(super) fn len(&self) -> usize {
        self.lookup.len()
    }

    #[inline]
    pub(super) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lookup.contains_key(key)
    }

    #[inline]
    pub(super) fn newest(&self) -> NodeId {
        self.newest
    }

    #[inline]
    pub(super) fn newest_key(&self) -> &K {
        &self.node(self.newest).key
    }

    #[inline]
    pub(super) fn oldest_key(&self) -> &K {
        &self.node(self.oldest).key
    }

    #[inline]
    pub(super) fn key_of(&self, id: NodeId) -> &K {
        &self.node(id).key
    }

    #[inline]
    pub(super) fn older_than(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).older
    }

    /// Moves `key` to the newest position, creating a node for it if it isn't
    /// already held.
    pub(super) fn insert(&mut self, key: K) {
        if let Some(&id) = self.lookup.get(&key) {
            self.promote(id);
            return;
        }

        let id = self.alloc(Node {
            key: key.clone(),
            older: Some(self.newest),
            newer: None,
        });
        let newest = self.newest;
        self.node_mut(newest).newer = Some(id);
        self.newest = id;
        self.lookup.insert(key, id);
    }

    /// Splices the node holding `key` out of the chain and returns its key.
    ///
    /// Removing from a chain of two leaves a chain of one, which callers must
    /// collapse with [`Self::into_single`].
    pub(super) fn remove<Q>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = *self.lookup.get(key)?;
        Some(self.unlink(id))
    }

    /// Splices the oldest node out of the chain and returns its key. The same
    /// collapse rule as [`Self::remove`] applies.
    pub(super) fn pop_oldest(&mut self) -> K {
        self.unlink(self.oldest)
    }

    /// Consumes a chain that has been reduced to a single node, returning the
    /// key it holds.
    pub(super) fn into_single(mut self) -> K {
        debug_assert_eq!(self.len(), 1);
        let newest = self.newest;
        self.take(newest).key
    }

    fn promote(&mut self, id: NodeId) {
        if id == self.newest {
            return;
        }

        self.detach(id);
        self.attach_newest(id);
    }

    fn unlink(&mut self, id: NodeId) -> K {
        self.detach(id);
        let node = self.take(id);
        self.lookup.remove(&node.key);
        node.key
    }

    /// Reconnects the neighbours of `id` to each other. The node itself keeps
    /// its stale links until it is attached again or freed.
    fn detach(&mut self, id: NodeId) {
        let (older, newer) = {
            let node = self.node(id);
            (node.older, node.newer)
        };

        match older {
            Some(older_id) => self.node_mut(older_id).newer = newer,
            None => {
                if let Some(newer_id) = newer {
                    self.oldest = newer_id;
                }
            }
        }

        match newer {
            Some(newer_id) => self.node_mut(newer_id).older = older,
            None => {
                if let Some(older_id) = older {
                    self.newest = older_id;
                }
            }
        }
    }

    fn attach_newest(&mut self, id: NodeId) {
        let old_newest = self.newest;
        {
            let node = self.node_mut(id);
            node.older = Some(old_newest);
            node.newer = None;
        }
        self.node_mut(old_newest).newer = Some(id);
        self.newest = id;
    }

    fn alloc(&mut self, node: Node<K>) -> NodeId {
        if let Some(idx) = self.free_list.pop() {
            self.slots[idx] = Some(node);
            NodeId(idx)
        } else {
            self.slots.push(Some(node));
            NodeId(self.slots.len() - 1)
        }
    }

    fn take(&mut self, id: NodeId) -> Node<K> {
        match self.slots[id.0].take() {
            Some(node) => {
                self.free_list.push(id.0);
                node
            }
            None => unreachable!("recency chain referenced vacant slot {}", id.0),
        }
    }

    fn node(&self, id: NodeId) -> &Node<K> {
        match &self.slots[id.0] {
            Some(node) => node,
            None => unreachable!("recency chain referenced vacant slot {}", id.0),
        }
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<K> {
        match &mut self.slots[id.0] {
            Some(node) => node,
            None => unreachable!("recency chain referenced vacant slot {}", id.0),
        }
    }

    #[cfg(test)]
    pub(super) fn debug_validate_invariants(&self) {
        use std::collections::HashSet;

        assert!(self.len() >= 2, "a chain holds at least two keys");

        let mut seen = HashSet::new();
        let mut newer = None;
        let mut current = Some(self.newest);
        let mut count = 0;

        while let Some(id) = current {
            assert!(seen.insert(id), "cycle at {:?}", id);
            let node = self.node(id);
            assert_eq!(node.newer, newer);
            assert_eq!(self.lookup.get(&node.key), Some(&id));
            if node.older.is_none() {
                assert_eq!(self.oldest, id);
            }

            newer = Some(id);
            current = node.older;
            count += 1;
            assert!(count <= self.len());
        }

        assert_eq!(count, self.len());
        assert_eq!(self.slots.iter().filter(|slot| slot.is_some()).count(), count);
        assert_eq!(self.slots.len() - self.free_list.len(), count);
    }
}
