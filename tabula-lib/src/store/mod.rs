//! Persistence for column layouts
//!
//! A `LayoutStore` is a plain key/value store of byte records. The layout
//! manager encodes its state as JSON and writes the whole record on every
//! change, so a store only has to get, replace and delete by key.

mod memory;
mod sqlite;

pub use memory::*;
pub use sqlite::*;

use async_trait::async_trait;

use crate::error::StoreError;

/// Trait for layout record stores.
///
/// Implementations must replace the whole record on `set_bytes`; the last
/// write for a key wins.
///
/// # Example
///
/// ```ignore
/// use tabula_lib::store::{LayoutStore, MemoryStore};
///
/// let store = MemoryStore::new();
/// store.set_bytes("grid", b"{}".to_vec()).await?;
/// assert_eq!(store.get_bytes("grid").await?, Some(b"{}".to_vec()));
///
/// store.delete("grid").await?;
/// assert_eq!(store.get_bytes("grid").await?, None);
/// ```
#[async_trait]
pub trait LayoutStore: Send + Sync {
    /// Reads the record stored under `key`.
    ///
    /// Returns `Ok(None)` if nothing is stored.
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Replaces the record stored under `key`.
    async fn set_bytes(&self, key: &str, data: Vec<u8>) -> Result<(), StoreError>;

    /// Deletes the record stored under `key`. Deleting a missing key is not
    /// an error.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: LayoutStore + ?Sized> LayoutStore for std::sync::Arc<S> {
    async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get_bytes(key).await
    }

    async fn set_bytes(&self, key: &str, data: Vec<u8>) -> Result<(), StoreError> {
        (**self).set_bytes(key, data).await
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        (**self).delete(key).await
    }
}
