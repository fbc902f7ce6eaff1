//! File-backed configuration store.
//!
//! The whole namespace lives in one JSON document, loaded lazily on first
//! use and rewritten atomically (temp file + rename) on every mutation.
//! A missing file is an empty store; an unparseable file refuses to open.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde_json::Value;
use tracing::debug;

use crate::change::{ChangeRouter, ChangeStream, PrefChange};
use crate::error::{PrefsError, PrefsResult};
use crate::memory::check_quota;
use crate::traits::PrefStore;
use crate::DEFAULT_QUOTA_BYTES;

/// Durable configuration store backed by a single JSON file.
pub struct FsPrefStore {
    path: PathBuf,
    /// `None` until the document has been loaded.
    entries: RwLock<Option<BTreeMap<String, Value>>>,
    router: ChangeRouter,
    quota_bytes: usize,
}

impl FsPrefStore {
    /// Create a handle over `path` with the default quota. No I/O happens
    /// until the first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_quota(path, DEFAULT_QUOTA_BYTES)
    }

    /// Create a handle with an explicit byte budget.
    pub fn with_quota(path: impl Into<PathBuf>, quota_bytes: usize) -> Self {
        Self {
            path: path.into(),
            entries: RwLock::new(None),
            router: ChangeRouter::new(),
            quota_bytes,
        }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_document(&self) -> PrefsResult<BTreeMap<String, Value>> {
        match fs::read(&self.path) {
            Ok(raw) => serde_json::from_slice(&raw).map_err(|e| {
                PrefsError::Unavailable(format!("{}: {e}", self.path.display()))
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(PrefsError::Unavailable(format!(
                "{}: {e}",
                self.path.display()
            ))),
        }
    }

    /// Run `f` over the loaded document, loading it first if needed.
    fn with_loaded<T>(
        &self,
        f: impl FnOnce(&mut BTreeMap<String, Value>) -> PrefsResult<T>,
    ) -> PrefsResult<T> {
        let mut guard = self.entries.write().expect("lock poisoned");
        if guard.is_none() {
            *guard = Some(self.load_document()?);
            debug!(path = %self.path.display(), "opened configuration store");
        }
        f(guard.as_mut().expect("just loaded"))
    }

    fn persist(&self, map: &BTreeMap<String, Value>) -> PrefsResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .map_err(|e| PrefsError::WriteFailed(e.to_string()))?;
            }
        }
        let parent = self.path.parent().filter(|p| !p.as_os_str().is_empty());
        let mut tmp = match parent {
            Some(dir) => tempfile::NamedTempFile::new_in(dir),
            None => tempfile::NamedTempFile::new(),
        }
        .map_err(|e| PrefsError::WriteFailed(e.to_string()))?;

        let pretty = serde_json::to_vec_pretty(map)?;
        tmp.write_all(&pretty)
            .map_err(|e| PrefsError::WriteFailed(e.to_string()))?;
        tmp.persist(&self.path)
            .map_err(|e| PrefsError::WriteFailed(e.to_string()))?;
        Ok(())
    }
}

impl PrefStore for FsPrefStore {
    fn get_raw(&self, key: &str) -> PrefsResult<Option<Value>> {
        self.with_loaded(|map| Ok(map.get(key).cloned()))
    }

    fn set_raw(&self, key: &str, value: Value) -> PrefsResult<()> {
        let change = self.with_loaded(|map| {
            let old = map.get(key).cloned();
            if old.as_ref() == Some(&value) {
                return Ok(None);
            }

            let mut candidate = map.clone();
            candidate.insert(key.to_string(), value.clone());
            check_quota(&candidate, self.quota_bytes)?;

            self.persist(&candidate)?;
            *map = candidate;
            Ok(Some(PrefChange {
                key: key.to_string(),
                old,
                new: Some(value),
            }))
        })?;

        if let Some(change) = change {
            self.router.route(change);
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> PrefsResult<bool> {
        let change = self.with_loaded(|map| {
            if !map.contains_key(key) {
                return Ok(None);
            }
            let mut candidate = map.clone();
            let old = candidate.remove(key);
            self.persist(&candidate)?;
            *map = candidate;
            Ok(Some(PrefChange {
                key: key.to_string(),
                old,
                new: None,
            }))
        })?;

        match change {
            Some(change) => {
                self.router.route(change);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn keys(&self) -> PrefsResult<Vec<String>> {
        self.with_loaded(|map| Ok(map.keys().cloned().collect()))
    }

    fn watch(&self, keys: &[&str]) -> ChangeStream {
        self.router.subscribe(keys)
    }
}

impl std::fmt::Debug for FsPrefStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsPrefStore")
            .field("path", &self.path)
            .field("quota_bytes", &self.quota_bytes)
            .finish()
    }
}
