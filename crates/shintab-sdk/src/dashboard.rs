use std::collections::HashSet;
use std::sync::Arc;

use shintab_assets::BUNDLED_BACKGROUNDS;
use shintab_blob::{BlobStore, ImageBlob, InMemoryBlobStore};
use shintab_cache::{CacheError, ImageCache};
use shintab_index::{ImageIndex, IndexConfig, IndexEntry};
use shintab_prefs::{keys, ChangeStream, InMemoryPrefStore, PrefStore, PrefStoreExt};
use shintab_types::{
    default_quick_links, ImageId, ImageSource, QuickLink, Settings, SettingsPatch, TodoItem,
    WebApp,
};
use tracing::{debug, warn};

use crate::error::SdkResult;
use crate::report::{ReconcileReport, UploadReport};

/// Dashboard wiring options.
#[derive(Clone, Copy, Debug, Default)]
pub struct DashboardConfig {
    /// Sizing policy for the image index.
    pub index: IndexConfig,
    /// Whether [`Dashboard::reconcile`] also deletes blobs no index
    /// entry references. Off by default; orphan blobs are harmless,
    /// only wasteful.
    pub sweep_orphan_blobs: bool,
}

/// The high-level dashboard API.
pub struct Dashboard {
    blobs: Arc<dyn BlobStore>,
    prefs: Arc<dyn PrefStore>,
    index: ImageIndex,
    cache: ImageCache,
    config: DashboardConfig,
}

impl Dashboard {
    /// Wire a dashboard over the given stores.
    pub fn new(
        blobs: Arc<dyn BlobStore>,
        prefs: Arc<dyn PrefStore>,
        config: DashboardConfig,
    ) -> Self {
        let index = ImageIndex::with_config(prefs.clone(), config.index);
        let cache = ImageCache::new(blobs.clone());
        Self {
            blobs,
            prefs,
            index,
            cache,
            config,
        }
    }

    /// Fully in-memory dashboard for tests and embedding.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryBlobStore::new()),
            Arc::new(InMemoryPrefStore::new()),
            DashboardConfig::default(),
        )
    }

    /// The underlying blob store.
    pub fn blobs(&self) -> &Arc<dyn BlobStore> {
        &self.blobs
    }

    /// The underlying configuration store.
    pub fn prefs(&self) -> &Arc<dyn PrefStore> {
        &self.prefs
    }

    // ---- Image operations ----

    /// Store one uploaded image: durable blob write first, index append
    /// second, so the index never points at bytes that were not written.
    pub fn upload_image(&self, data: Vec<u8>, content_type: &str) -> SdkResult<ImageId> {
        let id = self.blobs.put(ImageBlob::new(data, content_type))?;
        if let Err(e) = self.index.append(IndexEntry::bare(id)) {
            // The blob landed but the index did not; take the blob back
            // out so no orphan is left behind, then report the failure.
            if let Err(del) = self.blobs.delete(&id) {
                warn!(%id, error = %del, "orphan blob left after failed index append");
            }
            return Err(e.into());
        }
        debug!(%id, "uploaded image");
        Ok(id)
    }

    /// Store several files, each independently; a failed file is counted
    /// and the rest still land.
    pub fn upload_batch(&self, files: Vec<(Vec<u8>, String)>) -> UploadReport {
        let mut report = UploadReport::default();
        for (data, content_type) in files {
            match self.upload_image(data, &content_type) {
                Ok(id) => report.stored.push(id),
                Err(e) => {
                    warn!(error = %e, "upload failed for one file");
                    report.failed += 1;
                }
            }
        }
        report
    }

    /// Remove one uploaded image: blob delete first, then the index
    /// entry, then the cached display handle. Unknown ids succeed
    /// silently.
    pub fn remove_image(&self, id: &ImageId) -> SdkResult<()> {
        self.blobs.delete(id)?;
        self.index.remove(id)?;
        self.cache.invalidate(id);
        debug!(%id, "removed image");
        Ok(())
    }

    /// Remove every uploaded image and reset the index and cache.
    pub fn clear_images(&self) -> SdkResult<()> {
        self.blobs.clear()?;
        self.index.clear()?;
        self.cache.clear();
        Ok(())
    }

    /// Uploaded-image membership in display order.
    pub fn list_images(&self) -> SdkResult<Vec<IndexEntry>> {
        Ok(self.index.list()?)
    }

    /// A display URL for `id`, or `None` when the blob is gone. Stale
    /// ids are a normal outcome, not an error.
    pub fn resolve_display_url(&self, id: &ImageId) -> SdkResult<Option<String>> {
        match self.cache.resolve(id) {
            Ok(handle) => Ok(Some(handle.url().to_string())),
            Err(CacheError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Everything the background rotator can draw from: the bundled
    /// defaults followed by the uploaded images in index order.
    ///
    /// Index entries whose blob has vanished are skipped and self-healed
    /// out of the index; one bad entry never aborts the pass.
    pub fn background_playlist(&self) -> SdkResult<Vec<ImageSource>> {
        let mut playlist: Vec<ImageSource> = BUNDLED_BACKGROUNDS
            .iter()
            .map(|path| ImageSource::bundled(*path))
            .collect();

        for entry in self.index.list()? {
            if self.blobs.contains(&entry.id)? {
                playlist.push(ImageSource::stored(entry.id));
            } else {
                warn!(id = %entry.id, "index entry without blob, dropping");
                self.index.remove(&entry.id)?;
            }
        }
        Ok(playlist)
    }

    /// Cross-check the index against the blob store and repair drift:
    /// stale index entries are always dropped, orphan blobs only when
    /// configured.
    pub fn reconcile(&self) -> SdkResult<ReconcileReport> {
        let mut report = ReconcileReport::default();

        let entries = self.index.list()?;
        let mut referenced: HashSet<ImageId> = HashSet::new();
        for entry in &entries {
            referenced.insert(entry.id);
            if !self.blobs.contains(&entry.id)? {
                self.index.remove(&entry.id)?;
                report.stale_entries_dropped += 1;
            }
        }

        if self.config.sweep_orphan_blobs {
            for id in self.blobs.ids()? {
                if !referenced.contains(&id) {
                    self.blobs.delete(&id)?;
                    self.cache.invalidate(&id);
                    report.orphan_blobs_dropped += 1;
                }
            }
        }

        if !report.is_clean() {
            debug!(?report, "reconciled image stores");
        }
        Ok(report)
    }

    // ---- Configuration ----

    /// The settings record, merge-on-read: defaults overlaid with
    /// whatever fields the store holds. A missing or partial record is
    /// normal.
    pub fn settings(&self) -> SdkResult<Settings> {
        let patch = self
            .prefs
            .get::<SettingsPatch>(keys::SETTINGS)?
            .unwrap_or_default();
        Ok(Settings::merged(patch))
    }

    /// Replace the stored settings record wholesale.
    pub fn save_settings(&self, settings: &Settings) -> SdkResult<()> {
        self.prefs.set(keys::SETTINGS, settings)?;
        Ok(())
    }

    /// Quick links, seeded with the default three when unset.
    pub fn quick_links(&self) -> SdkResult<Vec<QuickLink>> {
        Ok(self
            .prefs
            .get::<Vec<QuickLink>>(keys::QUICK_LINKS)?
            .unwrap_or_else(default_quick_links))
    }

    /// Replace the quick-link list.
    pub fn save_quick_links(&self, links: &[QuickLink]) -> SdkResult<()> {
        self.prefs.set(keys::QUICK_LINKS, &links)?;
        Ok(())
    }

    /// The todo list; empty when unset.
    pub fn todos(&self) -> SdkResult<Vec<TodoItem>> {
        Ok(self
            .prefs
            .get::<Vec<TodoItem>>(keys::TODOS)?
            .unwrap_or_default())
    }

    /// Replace the todo list.
    pub fn save_todos(&self, todos: &[TodoItem]) -> SdkResult<()> {
        self.prefs.set(keys::TODOS, &todos)?;
        Ok(())
    }

    /// The app grid; empty when unset.
    pub fn apps(&self) -> SdkResult<Vec<WebApp>> {
        Ok(self
            .prefs
            .get::<Vec<WebApp>>(keys::APPS)?
            .unwrap_or_default())
    }

    /// Replace the app grid.
    pub fn save_apps(&self, apps: &[WebApp]) -> SdkResult<()> {
        self.prefs.set(keys::APPS, &apps)?;
        Ok(())
    }

    /// Subscribe to configuration changes for the given keys so a
    /// rendering surface can re-render only the affected widget.
    pub fn watch_changes(&self, watched: &[&str]) -> ChangeStream {
        self.prefs.watch(watched)
    }
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("config", &self.config)
            .finish()
    }
}
