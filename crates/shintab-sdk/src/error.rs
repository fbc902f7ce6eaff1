use shintab_blob::BlobError;
use shintab_cache::CacheError;
use shintab_index::IndexError;
use shintab_prefs::PrefsError;

/// Errors surfaced by the dashboard facade.
#[derive(Debug, thiserror::Error)]
pub enum SdkError {
    /// Blob store failure.
    #[error(transparent)]
    Blob(#[from] BlobError),

    /// Configuration store failure.
    #[error(transparent)]
    Prefs(#[from] PrefsError),

    /// Image index failure.
    #[error(transparent)]
    Index(#[from] IndexError),

    /// Display-handle cache failure other than "not found" (which the
    /// facade converts to `None`).
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Result alias for dashboard operations.
pub type SdkResult<T> = Result<T, SdkError>;
