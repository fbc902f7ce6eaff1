use std::collections::HashMap;

use crate::error::{AssetError, AssetResult};

/// A fetched asset: response bytes plus their content type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CachedAsset {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl CachedAsset {
    /// Build an asset record.
    pub fn new(bytes: Vec<u8>, content_type: impl Into<String>) -> Self {
        Self {
            bytes,
            content_type: content_type.into(),
        }
    }
}

/// Where assets come from when they are not cached: the extension bundle
/// during install, the network during steady-state serving.
///
/// Implementations report failure per path; the cache layer decides
/// whether that becomes a fallback serve or an error.
pub trait AssetSource: Send + Sync {
    /// Fetch the asset at `path`.
    fn fetch(&self, path: &str) -> AssetResult<CachedAsset>;
}

/// Fixed in-memory asset source.
///
/// Serves the role of the extension bundle in embedding and tests: a
/// known set of paths, everything else a fetch failure.
#[derive(Debug, Default)]
pub struct StaticAssetSource {
    assets: HashMap<String, CachedAsset>,
}

impl StaticAssetSource {
    /// An empty source (every fetch fails).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an asset under `path`.
    pub fn with(mut self, path: impl Into<String>, asset: CachedAsset) -> Self {
        self.assets.insert(path.into(), asset);
        self
    }
}

impl AssetSource for StaticAssetSource {
    fn fetch(&self, path: &str) -> AssetResult<CachedAsset> {
        self.assets
            .get(path)
            .cloned()
            .ok_or_else(|| AssetError::Fetch {
                path: path.to_string(),
                reason: "no such asset".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_source_serves_known_paths() {
        let source =
            StaticAssetSource::new().with("images/1.jpg", CachedAsset::new(vec![1], "image/jpeg"));
        assert_eq!(source.fetch("images/1.jpg").unwrap().bytes, vec![1]);
    }

    #[test]
    fn static_source_fails_unknown_paths() {
        let err = StaticAssetSource::new().fetch("nope.png").unwrap_err();
        assert!(matches!(err, AssetError::Fetch { .. }));
    }
}
