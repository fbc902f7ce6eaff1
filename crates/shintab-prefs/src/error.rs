use thiserror::Error;

/// Errors from configuration store operations.
#[derive(Debug, Error)]
pub enum PrefsError {
    /// The store cannot be opened (unreadable or corrupt document).
    #[error("configuration store unavailable: {0}")]
    Unavailable(String),

    /// The write would push the serialized document past its byte budget.
    /// Nothing was applied. Mitigation is structural: keep entries small
    /// (identifiers, not embedded preview data).
    #[error("quota exceeded: document would be {bytes} bytes, quota {quota}")]
    QuotaExceeded { bytes: usize, quota: usize },

    /// A write to the backing file failed.
    #[error("write failed: {0}")]
    WriteFailed(String),

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error from the backing file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for configuration store operations.
pub type PrefsResult<T> = Result<T, PrefsError>;
