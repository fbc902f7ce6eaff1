//! Error types for the index crate.

use shintab_prefs::PrefsError;

/// Errors that can occur during index operations.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The underlying configuration store failed. Quota overruns from
    /// oversized preview hints surface here as
    /// [`PrefsError::QuotaExceeded`].
    #[error("configuration store error: {0}")]
    Prefs(#[from] PrefsError),
}

/// Convenience alias for index results.
pub type IndexResult<T> = Result<T, IndexError>;
