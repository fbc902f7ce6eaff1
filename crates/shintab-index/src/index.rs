use std::sync::Arc;

use shintab_prefs::{keys, PrefStore, PrefStoreExt};
use shintab_types::ImageId;
use tracing::debug;

use crate::entry::IndexEntry;
use crate::error::IndexResult;

/// Default maximum number of index entries.
pub const DEFAULT_CAP: usize = 50;

/// Index sizing policy.
#[derive(Clone, Copy, Debug)]
pub struct IndexConfig {
    /// Maximum entry count; `None` means unbounded. When capped, an
    /// append that overflows evicts entries from the oldest end.
    pub cap: Option<usize>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            cap: Some(DEFAULT_CAP),
        }
    }
}

impl IndexConfig {
    /// An index with no size cap.
    pub fn unbounded() -> Self {
        Self { cap: None }
    }
}

/// Service object over the `uploadedImageIDs` key of the configuration
/// store.
///
/// The store holds the entries as a plain JSON array; every operation
/// reads the current list, mutates it, and writes it back in one prefs
/// transaction. Duplicate ids are not deduplicated here; callers only
/// ever append freshly minted ids.
pub struct ImageIndex {
    prefs: Arc<dyn PrefStore>,
    config: IndexConfig,
}

impl ImageIndex {
    /// Create an index over `prefs` with the default cap.
    pub fn new(prefs: Arc<dyn PrefStore>) -> Self {
        Self::with_config(prefs, IndexConfig::default())
    }

    /// Create an index with an explicit sizing policy.
    pub fn with_config(prefs: Arc<dyn PrefStore>, config: IndexConfig) -> Self {
        Self { prefs, config }
    }

    /// The active sizing policy.
    pub fn config(&self) -> IndexConfig {
        self.config
    }

    /// Current membership in display order; empty when the key is absent.
    pub fn list(&self) -> IndexResult<Vec<IndexEntry>> {
        Ok(self
            .prefs
            .get::<Vec<IndexEntry>>(keys::IMAGE_INDEX)?
            .unwrap_or_default())
    }

    /// Number of entries.
    pub fn len(&self) -> IndexResult<usize> {
        Ok(self.list()?.len())
    }

    /// Returns `true` when no entries exist.
    pub fn is_empty(&self) -> IndexResult<bool> {
        Ok(self.list()?.is_empty())
    }

    /// Whether `id` is a member.
    pub fn contains(&self, id: &ImageId) -> IndexResult<bool> {
        Ok(self.list()?.iter().any(|e| &e.id == id))
    }

    /// Append one entry at the end, evicting from the oldest end if the
    /// cap is exceeded.
    pub fn append(&self, entry: IndexEntry) -> IndexResult<()> {
        self.append_all(vec![entry])
    }

    /// Append several entries in order with a single store write.
    pub fn append_all(&self, entries: Vec<IndexEntry>) -> IndexResult<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let mut list = self.list()?;
        list.extend(entries);
        if let Some(cap) = self.config.cap {
            if list.len() > cap {
                let evicted = list.len() - cap;
                list.drain(..evicted);
                debug!(evicted, cap, "index cap reached, evicted oldest entries");
            }
        }
        self.prefs.set(keys::IMAGE_INDEX, &list)?;
        Ok(())
    }

    /// Remove the entry for `id`. Returns `Ok(false)` when absent.
    pub fn remove(&self, id: &ImageId) -> IndexResult<bool> {
        let mut list = self.list()?;
        let before = list.len();
        list.retain(|e| &e.id != id);
        if list.len() == before {
            return Ok(false);
        }
        self.prefs.set(keys::IMAGE_INDEX, &list)?;
        Ok(true)
    }

    /// Drop the index entirely. Does not touch blobs; callers clear the
    /// blob store separately to avoid orphans.
    pub fn clear(&self) -> IndexResult<()> {
        self.prefs.remove(keys::IMAGE_INDEX)?;
        Ok(())
    }
}

impl std::fmt::Debug for ImageIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageIndex")
            .field("config", &self.config)
            .finish()
    }
}
