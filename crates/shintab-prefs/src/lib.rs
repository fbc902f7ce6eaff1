//! Quota-constrained key-value configuration store.
//!
//! This is the small, frequently-synced companion to the blob store: a
//! flat JSON namespace holding the settings record, the ordered image
//! index, quick links, todos, and the app grid. Keys are independent and
//! any subset may be absent -- absence always means "use defaults", never
//! an error.
//!
//! Two things distinguish it from a plain map:
//!
//! - **Quota**: the serialized document has a byte budget (default 5 MiB,
//!   matching the host storage area this models). A write that would
//!   exceed it fails with [`PrefsError::QuotaExceeded`] and leaves the
//!   store untouched.
//! - **Change notification**: consumers subscribe to a set of watched
//!   keys and receive old/new value pairs per mutation, so a rendering
//!   surface re-renders only the affected widget.

pub mod change;
pub mod error;
pub mod fs;
pub mod keys;
pub mod memory;
pub mod traits;

pub use change::{ChangeRouter, ChangeStream, PrefChange};
pub use error::{PrefsError, PrefsResult};
pub use fs::FsPrefStore;
pub use memory::InMemoryPrefStore;
pub use traits::{PrefStore, PrefStoreExt};

/// Default document byte budget.
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;
