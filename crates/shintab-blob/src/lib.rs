//! Durable binary image storage for shintab.
//!
//! This crate is the foundation of the image subsystem: an unbounded-size
//! blob store keyed by generated [`ImageId`]s, deliberately separate from
//! the small-quota configuration store that holds settings and the image
//! index.
//!
//! # Backends
//!
//! All backends implement the [`BlobStore`] trait:
//!
//! - [`InMemoryBlobStore`] -- `HashMap`-based store for tests and embedding
//! - [`FsBlobStore`] -- one file per blob under a store directory, with a
//!   lazily-opened, reused handle
//!
//! # Design Rules
//!
//! 1. `id -> data` is immutable once written; there is no update-in-place.
//!    Replacing an image means delete + put under a fresh id.
//! 2. `put` never overwrites an existing id. Ids are minted fresh on every
//!    call, so two puts of identical bytes yield two distinct ids.
//! 3. Absence on `get` is `Ok(None)`, never an error: an index entry
//!    pointing at a deleted blob is an expected state.
//! 4. `delete` is idempotent.
//! 5. I/O failures are propagated, never silently ignored.
//!
//! [`ImageId`]: shintab_types::ImageId

pub mod blob;
pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use blob::ImageBlob;
pub use error::{BlobError, BlobResult};
pub use fs::FsBlobStore;
pub use memory::InMemoryBlobStore;
pub use traits::BlobStore;
