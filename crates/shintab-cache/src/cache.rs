use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use shintab_blob::BlobStore;
use shintab_types::ImageId;
use tracing::debug;

use crate::error::{CacheError, CacheResult};
use crate::handle::DisplayHandle;

/// Per-session cache mapping image ids to display handles.
///
/// Exclusively owns every handle it creates: registering a new handle
/// for an id first revokes the previous one, so at most one live handle
/// exists per id at any time. Dropping the cache revokes everything,
/// mirroring the page-unload cleanup of the rendering host.
pub struct ImageCache {
    blobs: Arc<dyn BlobStore>,
    entries: RwLock<HashMap<ImageId, DisplayHandle>>,
}

impl ImageCache {
    /// Create an empty cache over `blobs`.
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            blobs,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Return the cached handle for `id`, reading the blob and creating
    /// one on first use.
    ///
    /// Fails with [`CacheError::NotFound`] when no blob exists -- the
    /// caller skips the entry. Two resolves without an intervening
    /// invalidation return the same handle.
    pub fn resolve(&self, id: &ImageId) -> CacheResult<DisplayHandle> {
        if let Some(handle) = self.live_entry(id) {
            return Ok(handle);
        }

        let blob = self
            .blobs
            .get(id)?
            .ok_or(CacheError::NotFound(*id))?;

        let mut entries = self.entries.write().expect("lock poisoned");
        // Another caller may have resolved while we read the blob.
        if let Some(existing) = entries.get(id) {
            if !existing.is_revoked() {
                return Ok(existing.clone());
            }
        }

        let handle = DisplayHandle::new(blob.data, blob.content_type);
        if let Some(old) = entries.insert(*id, handle.clone()) {
            // Stale entry surviving a delete (or a revoked leftover):
            // release it before the replacement goes live.
            old.revoke();
        }
        debug!(%id, url = handle.url(), "created display handle");
        Ok(handle)
    }

    /// Revoke and evict the handle for `id`, if any. Called when the
    /// underlying blob is deleted.
    pub fn invalidate(&self, id: &ImageId) {
        let removed = self.entries.write().expect("lock poisoned").remove(id);
        if let Some(handle) = removed {
            handle.revoke();
            debug!(%id, "invalidated display handle");
        }
    }

    /// Revoke and evict every handle (page unload, full reset).
    pub fn clear(&self) {
        let mut entries = self.entries.write().expect("lock poisoned");
        for (_, handle) in entries.drain() {
            handle.revoke();
        }
    }

    /// Number of cached entries (live or revoked-but-not-yet-evicted).
    pub fn len(&self) -> usize {
        self.entries.read().expect("lock poisoned").len()
    }

    /// Returns `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.read().expect("lock poisoned").is_empty()
    }

    fn live_entry(&self, id: &ImageId) -> Option<DisplayHandle> {
        let entries = self.entries.read().expect("lock poisoned");
        entries
            .get(id)
            .filter(|handle| !handle.is_revoked())
            .cloned()
    }
}

impl Drop for ImageCache {
    fn drop(&mut self) {
        self.clear();
    }
}

impl std::fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCache")
            .field("entries", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shintab_blob::{ImageBlob, InMemoryBlobStore};

    fn setup() -> (Arc<InMemoryBlobStore>, ImageCache) {
        let blobs = Arc::new(InMemoryBlobStore::new());
        let cache = ImageCache::new(blobs.clone());
        (blobs, cache)
    }

    fn put(blobs: &InMemoryBlobStore, bytes: &[u8]) -> ImageId {
        blobs
            .put(ImageBlob::new(bytes.to_vec(), "image/jpeg"))
            .unwrap()
    }

    #[test]
    fn resolve_reads_the_blob_once() {
        let (blobs, cache) = setup();
        let id = put(&blobs, b"pixels");

        let first = cache.resolve(&id).unwrap();
        let second = cache.resolve(&id).unwrap();
        // Same handle, not a newly created one.
        assert_eq!(first.url(), second.url());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn resolve_unknown_id_is_not_found() {
        let (_blobs, cache) = setup();
        let err = cache.resolve(&ImageId::generate()).unwrap_err();
        assert!(matches!(err, CacheError::NotFound(_)));
    }

    #[test]
    fn invalidate_revokes_the_handle() {
        let (blobs, cache) = setup();
        let id = put(&blobs, b"bytes");
        let handle = cache.resolve(&id).unwrap();

        cache.invalidate(&id);
        assert!(handle.is_revoked());
        assert!(cache.is_empty());
    }

    #[test]
    fn invalidate_unknown_id_is_a_noop() {
        let (_blobs, cache) = setup();
        cache.invalidate(&ImageId::generate());
    }

    #[test]
    fn delete_then_resolve_fails_after_invalidation() {
        let (blobs, cache) = setup();
        let id = put(&blobs, b"doomed");
        cache.resolve(&id).unwrap();

        blobs.delete(&id).unwrap();
        cache.invalidate(&id);

        let err = cache.resolve(&id).unwrap_err();
        assert!(matches!(err, CacheError::NotFound(_)));
    }

    #[test]
    fn at_most_one_live_handle_per_id() {
        let (blobs, cache) = setup();
        let id = put(&blobs, b"v1");
        let old = cache.resolve(&id).unwrap();

        // Simulate a stale entry surviving content supersession: force a
        // fresh handle by revoking the cached one out-of-band.
        old.revoke();
        let new = cache.resolve(&id).unwrap();

        assert_ne!(old.url(), new.url());
        assert!(old.is_revoked());
        assert!(!new.is_revoked());
    }

    #[test]
    fn clear_revokes_everything() {
        let (blobs, cache) = setup();
        let handles: Vec<DisplayHandle> = (0..4)
            .map(|i| {
                let id = put(&blobs, &[i as u8]);
                cache.resolve(&id).unwrap()
            })
            .collect();

        cache.clear();
        assert!(cache.is_empty());
        assert!(handles.iter().all(DisplayHandle::is_revoked));
    }

    #[test]
    fn drop_revokes_outstanding_handles() {
        let (blobs, cache) = setup();
        let id = put(&blobs, b"unload");
        let handle = cache.resolve(&id).unwrap();

        drop(cache);
        assert!(handle.is_revoked());
    }
}
