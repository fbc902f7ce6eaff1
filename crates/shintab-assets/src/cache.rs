use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::{debug, info, warn};

use crate::error::{AssetError, AssetResult};
use crate::source::{AssetSource, CachedAsset};
use crate::{BUNDLED_BACKGROUNDS, FALLBACK_ASSET, IMAGE_CACHE, SHELL_CACHE};

/// Lifecycle phase of the cache layer. The host runtime owns the
/// transitions; the layer only records which have happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Constructed, nothing pre-cached yet.
    New,
    /// Bundled defaults pre-cached.
    Installed,
    /// Old generations evicted; steady-state serving.
    Active,
}

/// Where a served asset came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServeOrigin {
    /// Cache hit.
    Cache,
    /// Fetched from the source (and cached if an image).
    Network,
    /// Source failed; the designated fallback asset was served instead.
    Fallback,
}

/// The result of serving one request.
#[derive(Clone, Debug)]
pub struct ServedAsset {
    pub asset: CachedAsset,
    pub origin: ServeOrigin,
}

/// Named cache generations with a cache-first image strategy.
///
/// Generations are keyed by name; only [`SHELL_CACHE`] and
/// [`IMAGE_CACHE`] survive activation. Serving is permitted in any
/// phase -- an un-installed cache simply misses more often.
pub struct AssetCache {
    source: Arc<dyn AssetSource>,
    generations: RwLock<HashMap<String, HashMap<String, CachedAsset>>>,
    phase: RwLock<Phase>,
}

impl AssetCache {
    /// Create a cache over `source` with no pre-populated generations.
    pub fn new(source: Arc<dyn AssetSource>) -> Self {
        Self {
            source,
            generations: RwLock::new(HashMap::new()),
            phase: RwLock::new(Phase::New),
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        *self.phase.read().expect("lock poisoned")
    }

    /// Install: pre-populate the image generation with every bundled
    /// default. All-or-nothing; on any fetch failure nothing is cached
    /// and the phase does not advance.
    pub fn install(&self) -> AssetResult<()> {
        let mut staged = HashMap::new();
        for path in BUNDLED_BACKGROUNDS {
            let asset = self.source.fetch(path)?;
            staged.insert(path.to_string(), asset);
        }

        let count = staged.len();
        let mut generations = self.generations.write().expect("lock poisoned");
        generations
            .entry(IMAGE_CACHE.to_string())
            .or_default()
            .extend(staged);
        drop(generations);

        *self.phase.write().expect("lock poisoned") = Phase::Installed;
        info!(count, "installed bundled default images");
        Ok(())
    }

    /// Activate: delete every generation whose name is not one of the
    /// current ones.
    pub fn activate(&self) {
        let mut generations = self.generations.write().expect("lock poisoned");
        generations.retain(|name, _| {
            let keep = name == SHELL_CACHE || name == IMAGE_CACHE;
            if !keep {
                info!(generation = %name, "deleting old cache generation");
            }
            keep
        });
        drop(generations);

        *self.phase.write().expect("lock poisoned") = Phase::Active;
    }

    /// Serve one request.
    ///
    /// Image requests are cache-first: hit serves from cache, miss
    /// fetches and populates for next time, and a failed fetch serves
    /// [`FALLBACK_ASSET`] rather than surfacing the error. Everything
    /// else is network-first with cache fallback.
    pub fn serve(&self, path: &str) -> AssetResult<ServedAsset> {
        if is_image_request(path) {
            self.serve_image(path)
        } else {
            self.serve_network_first(path)
        }
    }

    /// Direct cache lookup for an image, bypassing the network entirely.
    /// `None` on a miss.
    pub fn cached_image(&self, path: &str) -> Option<CachedAsset> {
        let generations = self.generations.read().expect("lock poisoned");
        generations.get(IMAGE_CACHE)?.get(path).cloned()
    }

    /// Insert an asset into a named generation. The host runtime uses
    /// this when it carries responses over from a previous version.
    pub fn insert(&self, generation: &str, path: impl Into<String>, asset: CachedAsset) {
        let mut generations = self.generations.write().expect("lock poisoned");
        generations
            .entry(generation.to_string())
            .or_default()
            .insert(path.into(), asset);
    }

    /// Names of the generations currently present.
    pub fn generation_names(&self) -> Vec<String> {
        let generations = self.generations.read().expect("lock poisoned");
        let mut names: Vec<String> = generations.keys().cloned().collect();
        names.sort();
        names
    }

    fn serve_image(&self, path: &str) -> AssetResult<ServedAsset> {
        if let Some(asset) = self.cached_image(path) {
            debug!(%path, "serving image from cache");
            return Ok(ServedAsset {
                asset,
                origin: ServeOrigin::Cache,
            });
        }

        match self.source.fetch(path) {
            Ok(asset) => {
                self.insert(IMAGE_CACHE, path, asset.clone());
                Ok(ServedAsset {
                    asset,
                    origin: ServeOrigin::Network,
                })
            }
            Err(e) => {
                warn!(%path, error = %e, "image fetch failed, trying fallback");
                match self.cached_image(FALLBACK_ASSET) {
                    Some(asset) => Ok(ServedAsset {
                        asset,
                        origin: ServeOrigin::Fallback,
                    }),
                    None => Err(AssetError::Unavailable {
                        path: path.to_string(),
                    }),
                }
            }
        }
    }

    fn serve_network_first(&self, path: &str) -> AssetResult<ServedAsset> {
        match self.source.fetch(path) {
            Ok(asset) => Ok(ServedAsset {
                asset,
                origin: ServeOrigin::Network,
            }),
            Err(e) => {
                let generations = self.generations.read().expect("lock poisoned");
                let cached = generations.values().find_map(|g| g.get(path).cloned());
                match cached {
                    Some(asset) => Ok(ServedAsset {
                        asset,
                        origin: ServeOrigin::Cache,
                    }),
                    None => Err(e),
                }
            }
        }
    }
}

/// Request classification: image by extension.
fn is_image_request(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower.ends_with(".jpg") || lower.ends_with(".jpeg") || lower.ends_with(".png")
}

impl std::fmt::Debug for AssetCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetCache")
            .field("phase", &self.phase())
            .field("generations", &self.generation_names())
            .finish()
    }
}
