use serde::{Deserialize, Serialize};
use shintab_types::ImageId;

/// One record in the uploaded-image index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Identifier of the blob this entry refers to. Referential
    /// integrity with the blob store is best-effort: an entry may
    /// outlive its blob and renderers must treat that as "skip".
    pub id: ImageId,
    /// Small derived preview (a thumbnail data URL in the dashboard).
    /// May be stale or absent without being an error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_hint: Option<String>,
}

impl IndexEntry {
    /// Identifier-only entry, the default shape.
    pub fn bare(id: ImageId) -> Self {
        Self {
            id,
            preview_hint: None,
        }
    }

    /// Entry carrying a preview hint.
    pub fn with_preview(id: ImageId, hint: impl Into<String>) -> Self {
        Self {
            id,
            preview_hint: Some(hint.into()),
        }
    }
}
