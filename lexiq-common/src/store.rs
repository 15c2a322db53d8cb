//! Injectable key/value stores
//!
//! Services own their state through a `Store` handle instead of
//! process-wide maps. `InMemoryStore` is the only backend shipped; a durable
//! backend would implement the same trait.
//!
//! Every operation takes the store lock once, so an `update` on key K is
//! atomic with respect to a concurrent `get` on K.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;

/// Key/value store abstraction
pub trait Store<K, V>: Send + Sync {
    /// Clone of the value stored under `key`
    fn get(&self, key: &K) -> Option<V>;

    /// Insert or replace, returning the previous value
    fn put(&self, key: K, value: V) -> Option<V>;

    /// Remove, returning the removed value
    fn delete(&self, key: &K) -> Option<V>;

    /// Mutate the value under `key` in place. Returns false if absent.
    fn update(&self, key: &K, f: &mut dyn FnMut(&mut V)) -> bool;

    /// Snapshot of all values (unordered)
    fn values(&self) -> Vec<V>;

    /// Number of stored entries
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-lifetime store backed by a `HashMap` behind an `RwLock`
pub struct InMemoryStore<K, V> {
    entries: RwLock<HashMap<K, V>>,
}

impl<K, V> InMemoryStore<K, V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Default for InMemoryStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Store<K, V> for InMemoryStore<K, V>
where
    K: Eq + Hash + Send + Sync,
    V: Clone + Send + Sync,
{
    fn get(&self, key: &K) -> Option<V> {
        // Recover from poisoning; entries are never left half-written.
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn put(&self, key: K, value: V) -> Option<V> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key, value)
    }

    fn delete(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.remove(key)
    }

    fn update(&self, key: &K, f: &mut dyn FnMut(&mut V)) -> bool {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        match entries.get_mut(key) {
            Some(value) => {
                f(value);
                true
            }
            None => false,
        }
    }

    fn values(&self) -> Vec<V> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.values().cloned().collect()
    }

    fn len(&self) -> usize {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.len()
    }
}
