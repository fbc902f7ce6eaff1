//! Process-local memoization of display handles.
//!
//! Rendering surfaces should not re-read a blob from durable storage
//! every time they paint it. [`ImageCache`] hands out one revocable
//! [`DisplayHandle`] per image id and guarantees the revocation
//! discipline: at most one live handle per id, old handles revoked on
//! supersession, everything revoked on [`ImageCache::clear`] or drop.
//!
//! Nothing here persists; the cache belongs to a single page session.

pub mod cache;
pub mod error;
pub mod handle;

pub use cache::ImageCache;
pub use error::{CacheError, CacheResult};
pub use handle::DisplayHandle;
