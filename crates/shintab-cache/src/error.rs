use shintab_blob::BlobError;
use shintab_types::ImageId;

/// Errors from display-handle resolution.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// No blob exists for the id. Batch renderers treat this as "skip
    /// this entry", never as a reason to abort the pass.
    #[error("no blob for id {0}")]
    NotFound(ImageId),

    /// The blob store itself failed.
    #[error("blob store error: {0}")]
    Blob(#[from] BlobError),
}

/// Result alias for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
