//! High-level API for the shintab dashboard.
//!
//! [`Dashboard`] wires the blob store, the image index, the display-handle
//! cache, and the configuration store together and enforces the one rule
//! they share: the blob store is mutated before the index (write blob,
//! then append; delete blob, then remove), so the index never gains an
//! entry for a blob that was never durably written.
//!
//! This is the entry point for the rendering surfaces (new-tab page,
//! options page) and for embedding.

pub mod dashboard;
pub mod error;
pub mod report;

pub use dashboard::{Dashboard, DashboardConfig};
pub use error::{SdkError, SdkResult};
pub use report::{ReconcileReport, UploadReport};

// Re-export key types for consumers that only depend on the sdk.
pub use shintab_blob::{BlobStore, FsBlobStore, ImageBlob, InMemoryBlobStore};
pub use shintab_index::{IndexConfig, IndexEntry};
pub use shintab_prefs::{ChangeStream, FsPrefStore, InMemoryPrefStore, PrefChange, PrefStore};
pub use shintab_types::{ImageId, ImageSource, Settings, TimeFormat};
