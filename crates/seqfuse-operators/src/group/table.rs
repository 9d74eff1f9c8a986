//! Key -> group id index, in discovery order.

use std::collections::HashMap;

use seqfuse_core::id::GroupId;

use super::equivalence::Equivalence;

pub(crate) struct KeyIndex<K, E> {
    equivalence: E,
    keys: Vec<K>,
    buckets: HashMap<u64, Vec<GroupId>>,
}

impl<K, E: Equivalence<K>> KeyIndex<K, E> {
    pub(crate) fn new(equivalence: E, capacity: usize) -> Self {
        Self {
            equivalence,
            keys: Vec::with_capacity(capacity),
            buckets: HashMap::with_capacity(capacity),
        }
    }

    /// Hash of `key` plus the group it already belongs to, if any.
    pub(crate) fn find(&self, key: &K) -> (u64, Option<GroupId>) {
        let hash = self.equivalence.hash_key(key);
        let found = self.buckets.get(&hash).and_then(|ids| {
            ids.iter()
                .copied()
                .find(|id| self.equivalence.equivalent(&self.keys[id.get()], key))
        });
        (hash, found)
    }

    /// Register a key `find` did not know. Ids are handed out densely.
    pub(crate) fn insert(&mut self, hash: u64, key: K) -> GroupId {
        let id = GroupId::new(self.keys.len());
        self.keys.push(key);
        self.buckets.entry(hash).or_default().push(id);
        id
    }

    pub(crate) fn into_keys(self) -> Vec<K> {
        self.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::DefaultEquivalence;

    /// Every key hashes to the same bucket.
    struct Colliding;

    impl Equivalence<u32> for Colliding {
        fn hash_key(&self, _: &u32) -> u64 {
            7
        }

        fn equivalent(&self, a: &u32, b: &u32) -> bool {
            a == b
        }
    }

    #[test]
    fn ids_follow_discovery_order() {
        let mut index = KeyIndex::new(DefaultEquivalence, 4);
        for key in ["x", "y"] {
            let (hash, found) = index.find(&key);
            assert!(found.is_none());
            index.insert(hash, key);
        }
        assert_eq!(index.find(&"y").1, Some(GroupId::new(1)));
        assert_eq!(index.into_keys(), vec!["x", "y"]);
    }

    #[test]
    fn collisions_are_resolved_by_equivalence() {
        let mut index = KeyIndex::new(Colliding, 0);
        let (h, _) = index.find(&1);
        index.insert(h, 1);
        let (h, found) = index.find(&2);
        assert!(found.is_none());
        index.insert(h, 2);
        assert_eq!(index.find(&1).1, Some(GroupId::new(0)));
        assert_eq!(index.find(&2).1, Some(GroupId::new(1)));
    }
}
