//! In-memory layout store using DashMap

use async_trait::async_trait;
use dashmap::DashMap;

use super::LayoutStore;
use crate::error::StoreError;

/// An in-memory layout store backed by a concurrent hash map.
///
/// Records are lost when the store is dropped. Share one store between
/// managers with an `Arc`.
///
/// # Example
///
/// ```
/// use tabula_lib::store::MemoryStore;
///
/// let store = MemoryStore::new();
/// assert!(store.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: DashMap<String, Vec<u8>>,
}

impl MemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no records are stored.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns `true` if a record exists under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }
}

#[async_trait]
impl LayoutStore for MemoryStore {
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.records.get(key).map(|entry| entry.value().clone()))
    }

    async fn set_bytes(&self, key: &str, data: Vec<u8>) -> Result<(), StoreError> {
        self.records.insert(key.to_string(), data);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.records.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replace_and_delete() {
        let store = MemoryStore::new();
        store.set_bytes("a", vec![1]).await.unwrap();
        store.set_bytes("a", vec![2]).await.unwrap();
        assert_eq!(store.get_bytes("a").await.unwrap(), Some(vec![2]));
        assert_eq!(store.len(), 1);

        store.delete("a").await.unwrap();
        store.delete("a").await.unwrap();
        assert!(store.get_bytes("a").await.unwrap().is_none());
        assert!(store.is_empty());
    }
}
