//! Keyed per-chat state with per-key serialization.
//!
//! Every chat owns one slot guarded by an async mutex. Handlers lock the slot
//! for the whole duration of an event, so at most one mutation of a given
//! chat's state is in flight while unrelated chats proceed concurrently.

use std::hash::Hash;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Concurrent map of independently lockable state slots.
pub struct KeyedStateStore<K, V> {
    slots: DashMap<K, Arc<Mutex<V>>>,
}

impl<K, V> KeyedStateStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Default,
{
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
        }
    }

    /// Lock the slot for `key`, creating a default value on first use.
    ///
    /// The returned guard is owned, so it can be held across `.await` points
    /// inside a spawned task.
    pub async fn lock(&self, key: K) -> OwnedMutexGuard<V> {
        // Clone the Arc out before awaiting so no map shard stays locked.
        let slot = self.slots.entry(key).or_default().clone();
        slot.lock_owned().await
    }

    /// Drop the slot for `key` if nobody holds or waits on it and `idle`
    /// accepts its value.
    ///
    /// Returns `true` if the slot was removed. A later `lock` starts again
    /// from `V::default()`.
    pub fn evict_if(&self, key: &K, idle: impl FnOnce(&V) -> bool) -> bool {
        // The shard lock is held here, so no `lock` call can clone the slot
        // between the count check and the removal.
        self.slots
            .remove_if(key, |_, slot| {
                Arc::strong_count(slot) == 1 && slot.try_lock().is_ok_and(|value| idle(&value))
            })
            .is_some()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.slots.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<K, V> Default for KeyedStateStore<K, V>
where
    K: Eq + Hash + Clone,
    V: Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V> std::fmt::Debug for KeyedStateStore<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyedStateStore")
            .field("slots", &self.slots.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn lock_creates_default_slot() {
        let store: KeyedStateStore<u32, Vec<u32>> = KeyedStateStore::new();
        assert!(store.is_empty());

        let guard = store.lock(1).await;
        assert!(guard.is_empty());
        drop(guard);

        assert!(store.contains(&1));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn state_persists_between_locks() {
        let store: KeyedStateStore<u32, Vec<u32>> = KeyedStateStore::new();
        store.lock(1).await.push(7);
        store.lock(1).await.push(8);
        assert_eq!(*store.lock(1).await, vec![7, 8]);
        assert!(store.lock(2).await.is_empty());
    }

    #[tokio::test]
    async fn same_key_is_serialized() {
        let store: Arc<KeyedStateStore<u32, Vec<u32>>> = Arc::new(KeyedStateStore::new());

        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let mut guard = store.lock(1).await;
                let before = guard.len();
                // Yield while holding the lock; a racing writer would interleave here.
                tokio::time::sleep(Duration::from_millis(2)).await;
                guard.push(i);
                assert_eq!(guard.len(), before + 1);
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.lock(1).await.len(), 8);
    }

    #[tokio::test]
    async fn different_keys_do_not_block_each_other() {
        let store: KeyedStateStore<u32, Vec<u32>> = KeyedStateStore::new();
        let _held = store.lock(1).await;

        let other = tokio::time::timeout(Duration::from_millis(100), store.lock(2)).await;
        assert!(other.is_ok(), "lock on another key should not wait");
    }

    #[tokio::test]
    async fn evict_skips_held_slots() {
        let store: KeyedStateStore<u32, Vec<u32>> = KeyedStateStore::new();
        let held = store.lock(1).await;
        assert!(!store.evict_if(&1, |_| true));
        drop(held);
        assert!(store.evict_if(&1, |_| true));
        assert!(!store.contains(&1));
    }

    #[tokio::test]
    async fn evict_keeps_slots_the_predicate_rejects() {
        let store: KeyedStateStore<u32, Vec<u32>> = KeyedStateStore::new();
        store.lock(1).await.push(3);
        drop(store.lock(2).await);

        assert!(!store.evict_if(&1, Vec::is_empty));
        assert!(store.evict_if(&2, Vec::is_empty));
        assert_eq!(*store.lock(1).await, vec![3]);
        assert!(!store.evict_if(&9, Vec::is_empty));
    }

    #[test]
    fn debug_reports_slot_count() {
        let store: KeyedStateStore<u32, Vec<u32>> = KeyedStateStore::new();
        assert_eq!(format!("{store:?}"), "KeyedStateStore { slots: 0 }");
    }
}
