use shintab_types::ImageId;

use crate::blob::ImageBlob;
use crate::error::BlobResult;

/// Durable storage of image blobs keyed by generated identifiers.
///
/// All implementations must satisfy these invariants:
/// - `put` mints a fresh id on every call and never overwrites an
///   existing one; identical payloads stored twice get two distinct ids.
/// - The `id -> data` mapping is immutable until explicit deletion.
/// - `get` reports absence as `Ok(None)`; callers treat a missing blob as
///   a normal outcome (e.g. an index entry outliving its blob).
/// - `delete` is idempotent: deleting an absent id succeeds silently.
/// - Each call runs in its own scoped transaction; callers never hold
///   locks across calls.
pub trait BlobStore: Send + Sync {
    /// Store a new blob and return its freshly generated id.
    fn put(&self, blob: ImageBlob) -> BlobResult<ImageId>;

    /// Retrieve a blob, or `Ok(None)` if no such id exists.
    fn get(&self, id: &ImageId) -> BlobResult<Option<ImageBlob>>;

    /// Remove a blob. Succeeds whether or not the id exists.
    fn delete(&self, id: &ImageId) -> BlobResult<()>;

    /// Remove every blob. Used for full reset.
    fn clear(&self) -> BlobResult<()>;

    /// Whether a blob exists for `id`.
    fn contains(&self, id: &ImageId) -> BlobResult<bool>;

    /// All ids currently stored, in unspecified order. Used by
    /// reconciliation to find orphans.
    fn ids(&self) -> BlobResult<Vec<ImageId>>;
}
