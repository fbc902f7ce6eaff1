use serde::{Deserialize, Serialize};

use crate::id::ImageId;

/// A renderable background image, either bundled with the extension or
/// uploaded by the user.
///
/// Earlier generations of the dashboard passed loosely-shaped records
/// around (sometimes carrying a `path`, sometimes an `id`, sometimes an
/// inlined data URL) and sniffed the shape at every use site. This enum
/// makes the two cases explicit and exhaustiveness-checked.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ImageSource {
    /// A default image shipped with the extension, addressed by its
    /// bundle-relative path (e.g. `images/1.jpg`).
    BundledAsset { path: String },
    /// A user-uploaded image stored in the blob store.
    StoredBlob { id: ImageId },
}

impl ImageSource {
    /// Construct a bundled-asset source.
    pub fn bundled(path: impl Into<String>) -> Self {
        Self::BundledAsset { path: path.into() }
    }

    /// Construct a stored-blob source.
    pub fn stored(id: ImageId) -> Self {
        Self::StoredBlob { id }
    }

    /// Returns `true` for bundled default images.
    pub fn is_bundled(&self) -> bool {
        matches!(self, Self::BundledAsset { .. })
    }

    /// Human-readable label for preview grids.
    pub fn display_name(&self) -> String {
        match self {
            Self::BundledAsset { path } => format!("Default {path}"),
            Self::StoredBlob { id } => format!("Uploaded {}", id.short()),
        }
    }
}
