use std::collections::HashMap;
use std::sync::RwLock;

use shintab_types::ImageId;

use crate::blob::ImageBlob;
use crate::error::BlobResult;
use crate::traits::BlobStore;

/// In-memory, HashMap-based blob store.
///
/// Intended for tests and embedding. All blobs are held in memory behind
/// a `RwLock` for safe concurrent access; blobs are cloned on read.
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<ImageId, ImageBlob>>,
}

impl InMemoryBlobStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
        }
    }

    /// Number of blobs currently stored.
    pub fn len(&self) -> usize {
        self.blobs.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.blobs.read().expect("lock poisoned").is_empty()
    }

    /// Total payload bytes across all stored blobs.
    pub fn total_bytes(&self) -> u64 {
        self.blobs
            .read()
            .expect("lock poisoned")
            .values()
            .map(|blob| blob.len() as u64)
            .sum()
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlobStore for InMemoryBlobStore {
    fn put(&self, blob: ImageBlob) -> BlobResult<ImageId> {
        let mut map = self.blobs.write().expect("lock poisoned");
        // Fresh ids collide only if two are minted in the same tick with
        // identical random bits; loop until vacant rather than overwrite.
        let mut id = ImageId::generate();
        while map.contains_key(&id) {
            id = ImageId::generate();
        }
        map.insert(id, blob);
        Ok(id)
    }

    fn get(&self, id: &ImageId) -> BlobResult<Option<ImageBlob>> {
        let map = self.blobs.read().expect("lock poisoned");
        Ok(map.get(id).cloned())
    }

    fn delete(&self, id: &ImageId) -> BlobResult<()> {
        let mut map = self.blobs.write().expect("lock poisoned");
        map.remove(id);
        Ok(())
    }

    fn clear(&self) -> BlobResult<()> {
        self.blobs.write().expect("lock poisoned").clear();
        Ok(())
    }

    fn contains(&self, id: &ImageId) -> BlobResult<bool> {
        let map = self.blobs.read().expect("lock poisoned");
        Ok(map.contains_key(id))
    }

    fn ids(&self) -> BlobResult<Vec<ImageId>> {
        let map = self.blobs.read().expect("lock poisoned");
        Ok(map.keys().copied().collect())
    }
}

impl std::fmt::Debug for InMemoryBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBlobStore")
            .field("blob_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn jpeg(bytes: &[u8]) -> ImageBlob {
        ImageBlob::new(bytes.to_vec(), "image/jpeg")
    }

    // -----------------------------------------------------------------------
    // Core CRUD
    // -----------------------------------------------------------------------

    #[test]
    fn put_then_get_round_trips() {
        let store = InMemoryBlobStore::new();
        let id = store.put(jpeg(b"hello world")).unwrap();

        let back = store.get(&id).unwrap().expect("should exist");
        assert_eq!(back.data, b"hello world");
        assert_eq!(back.content_type, "image/jpeg");
    }

    #[test]
    fn get_missing_returns_none() {
        let store = InMemoryBlobStore::new();
        assert!(store.get(&ImageId::generate()).unwrap().is_none());
    }

    #[test]
    fn identical_payloads_get_distinct_ids() {
        let store = InMemoryBlobStore::new();
        let id1 = store.put(jpeg(b"same bytes")).unwrap();
        let id2 = store.put(jpeg(b"same bytes")).unwrap();
        assert_ne!(id1, id2);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn delete_is_idempotent() {
        let store = InMemoryBlobStore::new();
        let id = store.put(jpeg(b"to delete")).unwrap();

        store.delete(&id).unwrap();
        assert!(store.get(&id).unwrap().is_none());
        // Second delete of the same id succeeds silently.
        store.delete(&id).unwrap();
    }

    #[test]
    fn delete_unknown_id_succeeds() {
        let store = InMemoryBlobStore::new();
        store.delete(&ImageId::generate()).unwrap();
    }

    #[test]
    fn clear_removes_everything() {
        let store = InMemoryBlobStore::new();
        let ids: Vec<ImageId> = (0..5)
            .map(|i| store.put(jpeg(&[i as u8])).unwrap())
            .collect();
        store.clear().unwrap();

        assert!(store.is_empty());
        for id in ids {
            assert!(store.get(&id).unwrap().is_none());
        }
    }

    // -----------------------------------------------------------------------
    // Two puts, one delete
    // -----------------------------------------------------------------------

    #[test]
    fn deleting_one_blob_leaves_the_other() {
        let store = InMemoryBlobStore::new();
        let id1 = store.put(jpeg(b"A")).unwrap();
        let id2 = store.put(jpeg(b"B")).unwrap();
        assert_ne!(id1, id2);
        assert_eq!(store.get(&id1).unwrap().unwrap().data, b"A");

        store.delete(&id1).unwrap();
        assert!(store.get(&id1).unwrap().is_none());
        assert_eq!(store.get(&id2).unwrap().unwrap().data, b"B");
    }

    // -----------------------------------------------------------------------
    // Utility methods
    // -----------------------------------------------------------------------

    #[test]
    fn contains_and_ids() {
        let store = InMemoryBlobStore::new();
        let id = store.put(jpeg(b"x")).unwrap();
        assert!(store.contains(&id).unwrap());
        assert!(!store.contains(&ImageId::generate()).unwrap());
        assert_eq!(store.ids().unwrap(), vec![id]);
    }

    #[test]
    fn total_bytes_sums_payloads() {
        let store = InMemoryBlobStore::new();
        store.put(jpeg(b"12345")).unwrap();
        store.put(jpeg(b"123456789")).unwrap();
        assert_eq!(store.total_bytes(), 14);
    }

    // -----------------------------------------------------------------------
    // Concurrent access
    // -----------------------------------------------------------------------

    #[test]
    fn concurrent_puts_get_distinct_ids() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(InMemoryBlobStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.put(jpeg(&[i as u8])).unwrap())
            })
            .collect();

        let mut ids: Vec<ImageId> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 8);
        assert_eq!(store.len(), 8);
    }

    // -----------------------------------------------------------------------
    // Round-trip property
    // -----------------------------------------------------------------------

    proptest! {
        #[test]
        fn round_trip_any_payload(data in proptest::collection::vec(any::<u8>(), 0..2048)) {
            let store = InMemoryBlobStore::new();
            let id = store.put(ImageBlob::new(data.clone(), "image/png")).unwrap();
            let back = store.get(&id).unwrap().unwrap();
            prop_assert_eq!(back.data, data);
        }
    }
}
