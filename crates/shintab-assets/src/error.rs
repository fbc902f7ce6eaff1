use thiserror::Error;

/// Errors from the asset cache layer.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The asset source (bundle or network) could not produce the path.
    #[error("fetch failed for {path}: {reason}")]
    Fetch { path: String, reason: String },

    /// Neither the cache, the source, nor the fallback asset could serve
    /// the request.
    #[error("asset unavailable: {path}")]
    Unavailable { path: String },
}

/// Result alias for asset operations.
pub type AssetResult<T> = Result<T, AssetError>;
