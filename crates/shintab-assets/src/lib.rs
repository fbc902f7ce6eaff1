//! Cache-first serving for bundled default images.
//!
//! Independent of the blob store and index: this layer exists so the
//! dashboard can paint a default background instantly, offline included.
//! It models the hosting runtime's lifecycle --
//!
//! 1. **install**: pre-populate the image cache generation with the
//!    bundled defaults (all-or-nothing),
//! 2. **activate**: evict every cache generation other than the current
//!    named ones,
//! 3. **serving**: intercept image requests cache-first, populate on
//!    miss, and fall back to a designated asset when the network fails
//!    instead of propagating the error to the renderer.
//!
//! The lifecycle transitions are triggered by the host; this component
//! only reacts.

pub mod cache;
pub mod error;
pub mod source;

pub use cache::{AssetCache, Phase, ServeOrigin, ServedAsset};
pub use error::{AssetError, AssetResult};
pub use source::{AssetSource, CachedAsset, StaticAssetSource};

/// Generation holding the dashboard shell resources.
pub const SHELL_CACHE: &str = "shintab-cache-v1";

/// Generation holding image responses.
pub const IMAGE_CACHE: &str = "shintab-images-v1";

/// The bundled default backgrounds, pre-cached at install.
pub const BUNDLED_BACKGROUNDS: &[&str] = &["images/1.jpg", "images/2.jpg", "images/3.jpg"];

/// Served when an image fetch fails and the request is not cached.
pub const FALLBACK_ASSET: &str = "images/1.jpg";
