//! The uploaded-image index.
//!
//! An ordered list of [`IndexEntry`] records persisted under one key of
//! the configuration store. The list defines both the membership and the
//! display order of "user-uploaded images", as distinct from the bundled
//! defaults. It references blobs by identifier only; the blob bytes live
//! in the separate blob store, and the two are kept consistent by
//! call-ordering discipline (blob write before index append, blob delete
//! before index remove), not by a transaction.
//!
//! Entries default to bare identifiers. Preview hints are supported but
//! optional: embedding thumbnails is what historically blew the
//! configuration store's quota.

pub mod entry;
pub mod error;
pub mod index;

pub use entry::IndexEntry;
pub use error::{IndexError, IndexResult};
pub use index::{ImageIndex, IndexConfig, DEFAULT_CAP};
