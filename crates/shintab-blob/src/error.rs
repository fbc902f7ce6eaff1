use shintab_types::ImageId;

/// Errors from blob store operations.
#[derive(Debug, thiserror::Error)]
pub enum BlobError {
    /// The store could not be opened (missing permissions, corruption,
    /// unusable store directory).
    #[error("blob store unavailable: {0}")]
    Unavailable(String),

    /// The on-disk store was written by a newer schema version. The open
    /// is refused rather than risking a destructive downgrade; retry once
    /// the other consumer has finished.
    #[error("blob store blocked: on-disk version {found}, supported {supported}")]
    Blocked { found: u32, supported: u32 },

    /// A put/delete/clear transaction aborted.
    #[error("blob write failed: {0}")]
    WriteFailed(String),

    /// Stored bytes failed their integrity check.
    #[error("corrupt blob {id}: {reason}")]
    Corrupt { id: ImageId, reason: String },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for blob store operations.
pub type BlobResult<T> = Result<T, BlobError>;
