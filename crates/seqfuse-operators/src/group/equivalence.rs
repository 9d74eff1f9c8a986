//! Key equivalence used to decide group membership.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Two keys land in the same group iff `equivalent` says so.
///
/// Keys that are equivalent must produce the same `hash_key`.
pub trait Equivalence<K> {
    fn hash_key(&self, key: &K) -> u64;
    fn equivalent(&self, a: &K, b: &K) -> bool;
}

/// `Hash + Eq` of the key type itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEquivalence;

impl<K: Hash + Eq> Equivalence<K> for DefaultEquivalence {
    fn hash_key(&self, key: &K) -> u64 {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        hasher.finish()
    }

    fn equivalent(&self, a: &K, b: &K) -> bool {
        a == b
    }
}
