//! Error types shared by the foundation types.

use thiserror::Error;

/// Errors from parsing or validating foundation types.
#[derive(Debug, Error)]
pub enum TypeError {
    /// The string is not a valid image identifier.
    #[error("invalid image id: {0}")]
    InvalidImageId(String),

    /// The URL is not usable as a quick-link target.
    #[error("invalid url: {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// A settings field is out of its accepted range.
    #[error("invalid setting {field}: {reason}")]
    InvalidSetting { field: String, reason: String },
}
