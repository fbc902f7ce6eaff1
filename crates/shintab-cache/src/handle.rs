use std::sync::{Arc, RwLock};

use uuid::Uuid;

/// A revocable, process-local view over a blob's bytes, suitable for a
/// rendering surface.
///
/// Handles are cheap to clone; clones share one underlying allocation.
/// Revocation releases the bytes immediately (even while clones are
/// still held) and is idempotent. A revoked handle keeps its URL but
/// yields no bytes.
#[derive(Clone)]
pub struct DisplayHandle {
    inner: Arc<HandleInner>,
}

struct HandleInner {
    url: String,
    content_type: String,
    /// `None` after revocation. Taking the bytes out (rather than
    /// flagging them) is what actually unpins the memory.
    data: RwLock<Option<Arc<[u8]>>>,
}

impl DisplayHandle {
    /// Create a live handle over `data` with a fresh transient URL.
    pub(crate) fn new(data: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(HandleInner {
                url: format!("mem:{}", Uuid::now_v7().simple()),
                content_type: content_type.into(),
                data: RwLock::new(Some(Arc::from(data.into_boxed_slice()))),
            }),
        }
    }

    /// The transient URL a renderer uses to display the image. Stable
    /// for the handle's lifetime, unique per handle.
    pub fn url(&self) -> &str {
        &self.inner.url
    }

    /// Content type of the underlying blob.
    pub fn content_type(&self) -> &str {
        &self.inner.content_type
    }

    /// The image bytes, or `None` once revoked.
    pub fn bytes(&self) -> Option<Arc<[u8]>> {
        self.inner.data.read().expect("lock poisoned").clone()
    }

    /// Whether the handle has been revoked.
    pub fn is_revoked(&self) -> bool {
        self.inner.data.read().expect("lock poisoned").is_none()
    }

    /// Release the bytes. Idempotent; only the owning cache calls this.
    pub(crate) fn revoke(&self) {
        self.inner.data.write().expect("lock poisoned").take();
    }
}

impl std::fmt::Debug for DisplayHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DisplayHandle")
            .field("url", &self.inner.url)
            .field("revoked", &self.is_revoked())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_handle_is_live() {
        let h = DisplayHandle::new(vec![1, 2, 3], "image/png");
        assert!(!h.is_revoked());
        assert_eq!(h.bytes().unwrap().as_ref(), &[1, 2, 3]);
        assert!(h.url().starts_with("mem:"));
    }

    #[test]
    fn revocation_is_shared_across_clones() {
        let h = DisplayHandle::new(vec![9], "image/jpeg");
        let clone = h.clone();
        h.revoke();

        assert!(clone.is_revoked());
        assert!(clone.bytes().is_none());
        // URL survives revocation.
        assert_eq!(h.url(), clone.url());
    }

    #[test]
    fn revoke_is_idempotent() {
        let h = DisplayHandle::new(vec![0], "image/png");
        h.revoke();
        h.revoke();
        assert!(h.is_revoked());
    }

    #[test]
    fn urls_are_unique_per_handle() {
        let a = DisplayHandle::new(vec![1], "image/png");
        let b = DisplayHandle::new(vec![1], "image/png");
        assert_ne!(a.url(), b.url());
    }
}
