use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One stored image: raw bytes plus the content type they were uploaded
/// with.
///
/// `created_at` is recorded for potential future cleanup policies; nothing
/// else reads it today.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageBlob {
    /// Raw image bytes.
    pub data: Vec<u8>,
    /// MIME content type, e.g. `image/jpeg`.
    pub content_type: String,
    /// When the blob was first stored.
    pub created_at: DateTime<Utc>,
}

impl ImageBlob {
    /// Build a blob stamped with the current time.
    pub fn new(data: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            data,
            content_type: content_type.into(),
            created_at: Utc::now(),
        }
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` for a zero-byte payload.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
