//! File-backed blob store.
//!
//! Each blob lives in its own file under `<root>/objects/<id>`, framed
//! with a length + CRC32 header around a bincode-encoded [`ImageBlob`].
//! The store directory is opened lazily on first use and the open is
//! idempotent, mirroring the open-once-reuse connection discipline of the
//! durable store this replaces.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use shintab_types::ImageId;
use tracing::{debug, warn};

use crate::blob::ImageBlob;
use crate::error::{BlobError, BlobResult};
use crate::traits::BlobStore;

/// On-disk schema version. The only migration behavior is "create the
/// store if absent"; a higher version on disk refuses to open.
const SCHEMA_VERSION: u32 = 1;

const VERSION_FILE: &str = "VERSION";
const OBJECTS_DIR: &str = "objects";

/// Header size: 4 bytes payload length + 4 bytes CRC32, little-endian.
const HEADER_SIZE: usize = 8;

/// Durable blob store backed by a directory of one-file-per-blob objects.
///
/// Writes go through a temp file in the same directory followed by an
/// atomic rename, so a crashed write never leaves a half-written blob
/// under a valid id.
pub struct FsBlobStore {
    root: PathBuf,
    /// Latched once the store directory has been created and the schema
    /// version verified. Later calls skip both checks.
    opened: Mutex<bool>,
}

impl FsBlobStore {
    /// Create a handle rooted at `root`. No I/O happens until the first
    /// operation.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            opened: Mutex::new(false),
        }
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the store layout if absent and verify the schema version.
    /// Idempotent: after the first success this is a flag check.
    fn ensure_open(&self) -> BlobResult<()> {
        let mut opened = self.opened.lock().expect("lock poisoned");
        if *opened {
            return Ok(());
        }

        fs::create_dir_all(self.objects_dir())
            .map_err(|e| BlobError::Unavailable(format!("{}: {e}", self.root.display())))?;

        let version_path = self.root.join(VERSION_FILE);
        match fs::read_to_string(&version_path) {
            Ok(raw) => {
                let found: u32 = raw.trim().parse().map_err(|_| {
                    BlobError::Unavailable(format!("unreadable version marker: {raw:?}"))
                })?;
                if found > SCHEMA_VERSION {
                    return Err(BlobError::Blocked {
                        found,
                        supported: SCHEMA_VERSION,
                    });
                }
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                fs::write(&version_path, format!("{SCHEMA_VERSION}\n"))?;
            }
            Err(e) => return Err(e.into()),
        }

        debug!(root = %self.root.display(), "opened blob store");
        *opened = true;
        Ok(())
    }

    fn objects_dir(&self) -> PathBuf {
        self.root.join(OBJECTS_DIR)
    }

    fn blob_path(&self, id: &ImageId) -> PathBuf {
        self.objects_dir().join(id.to_string())
    }

    fn encode(blob: &ImageBlob) -> BlobResult<Vec<u8>> {
        let payload =
            bincode::serialize(blob).map_err(|e| BlobError::Serialization(e.to_string()))?;
        let crc = crc32fast::hash(&payload);
        let mut out = Vec::with_capacity(HEADER_SIZE + payload.len());
        out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        out.extend_from_slice(&crc.to_le_bytes());
        out.extend_from_slice(&payload);
        Ok(out)
    }

    fn decode(id: &ImageId, raw: &[u8]) -> BlobResult<ImageBlob> {
        if raw.len() < HEADER_SIZE {
            return Err(BlobError::Corrupt {
                id: *id,
                reason: format!("file shorter than header ({} bytes)", raw.len()),
            });
        }
        let len = u32::from_le_bytes(raw[0..4].try_into().expect("slice length")) as usize;
        let crc = u32::from_le_bytes(raw[4..8].try_into().expect("slice length"));
        let payload = &raw[HEADER_SIZE..];
        if payload.len() != len {
            return Err(BlobError::Corrupt {
                id: *id,
                reason: format!("length mismatch: header {len}, payload {}", payload.len()),
            });
        }
        if crc32fast::hash(payload) != crc {
            return Err(BlobError::Corrupt {
                id: *id,
                reason: "crc mismatch".to_string(),
            });
        }
        bincode::deserialize(payload).map_err(|e| BlobError::Corrupt {
            id: *id,
            reason: format!("decode: {e}"),
        })
    }
}

impl BlobStore for FsBlobStore {
    fn put(&self, blob: ImageBlob) -> BlobResult<ImageId> {
        self.ensure_open()?;

        let mut id = ImageId::generate();
        while self.blob_path(&id).exists() {
            id = ImageId::generate();
        }

        let encoded = Self::encode(&blob)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.root)
            .map_err(|e| BlobError::WriteFailed(e.to_string()))?;
        tmp.write_all(&encoded)
            .map_err(|e| BlobError::WriteFailed(e.to_string()))?;
        tmp.persist(self.blob_path(&id))
            .map_err(|e| BlobError::WriteFailed(e.to_string()))?;

        debug!(%id, bytes = blob.len(), "stored blob");
        Ok(id)
    }

    fn get(&self, id: &ImageId) -> BlobResult<Option<ImageBlob>> {
        self.ensure_open()?;
        match fs::read(self.blob_path(id)) {
            Ok(raw) => Self::decode(id, &raw).map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn delete(&self, id: &ImageId) -> BlobResult<()> {
        self.ensure_open()?;
        match fs::remove_file(self.blob_path(id)) {
            Ok(()) => {
                debug!(%id, "deleted blob");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BlobError::WriteFailed(e.to_string())),
        }
    }

    fn clear(&self) -> BlobResult<()> {
        self.ensure_open()?;
        for entry in fs::read_dir(self.objects_dir())? {
            let entry = entry?;
            fs::remove_file(entry.path()).map_err(|e| BlobError::WriteFailed(e.to_string()))?;
        }
        debug!("cleared blob store");
        Ok(())
    }

    fn contains(&self, id: &ImageId) -> BlobResult<bool> {
        self.ensure_open()?;
        Ok(self.blob_path(id).exists())
    }

    fn ids(&self) -> BlobResult<Vec<ImageId>> {
        self.ensure_open()?;
        let mut ids = Vec::new();
        for entry in fs::read_dir(self.objects_dir())? {
            let entry = entry?;
            let name = entry.file_name();
            match name.to_string_lossy().parse::<ImageId>() {
                Ok(id) => ids.push(id),
                Err(_) => {
                    warn!(file = %name.to_string_lossy(), "skipping foreign file in objects dir");
                }
            }
        }
        Ok(ids)
    }
}

impl std::fmt::Debug for FsBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FsBlobStore")
            .field("root", &self.root)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpeg(bytes: &[u8]) -> ImageBlob {
        ImageBlob::new(bytes.to_vec(), "image/jpeg")
    }

    #[test]
    fn put_then_get_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());
        let id = store.put(jpeg(b"hello disk")).unwrap();

        let back = store.get(&id).unwrap().expect("should exist");
        assert_eq!(back.data, b"hello disk");
        assert_eq!(back.content_type, "image/jpeg");
    }

    #[test]
    fn blobs_survive_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let id = {
            let store = FsBlobStore::new(dir.path());
            store.put(jpeg(b"durable")).unwrap()
        };

        // A fresh handle over the same directory sees the blob.
        let store = FsBlobStore::new(dir.path());
        let back = store.get(&id).unwrap().unwrap();
        assert_eq!(back.data, b"durable");
    }

    #[test]
    fn open_is_lazy_and_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("store");
        let store = FsBlobStore::new(&root);
        // Construction does no I/O.
        assert!(!root.exists());

        store.ids().unwrap();
        assert!(root.join(VERSION_FILE).exists());
        // Second operation reuses the opened state.
        store.ids().unwrap();
    }

    #[test]
    fn get_missing_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());
        assert!(store.get(&ImageId::generate()).unwrap().is_none());
    }

    #[test]
    fn delete_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());
        let id = store.put(jpeg(b"bye")).unwrap();

        store.delete(&id).unwrap();
        store.delete(&id).unwrap();
        assert!(store.get(&id).unwrap().is_none());
    }

    #[test]
    fn clear_removes_every_blob() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());
        let ids: Vec<ImageId> = (0..5)
            .map(|i| store.put(jpeg(&[i as u8])).unwrap())
            .collect();

        store.clear().unwrap();
        for id in ids {
            assert!(store.get(&id).unwrap().is_none());
        }
        assert!(store.ids().unwrap().is_empty());
    }

    #[test]
    fn identical_payloads_get_distinct_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());
        let id1 = store.put(jpeg(b"twin")).unwrap();
        let id2 = store.put(jpeg(b"twin")).unwrap();
        assert_ne!(id1, id2);
    }

    #[test]
    fn corrupt_file_is_reported_not_returned() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());
        let id = store.put(jpeg(b"soon mangled")).unwrap();

        // Flip payload bytes behind the store's back.
        let path = store.blob_path(&id);
        let mut raw = fs::read(&path).unwrap();
        let last = raw.len() - 1;
        raw[last] ^= 0xff;
        fs::write(&path, raw).unwrap();

        let err = store.get(&id).unwrap_err();
        assert!(matches!(err, BlobError::Corrupt { .. }), "got {err}");
    }

    #[test]
    fn newer_schema_version_blocks_open() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join(OBJECTS_DIR)).unwrap();
        fs::write(dir.path().join(VERSION_FILE), "99\n").unwrap();

        let store = FsBlobStore::new(dir.path());
        let err = store.ids().unwrap_err();
        assert!(matches!(
            err,
            BlobError::Blocked {
                found: 99,
                supported: SCHEMA_VERSION
            }
        ));
    }

    #[test]
    fn ids_skips_foreign_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path());
        let id = store.put(jpeg(b"real")).unwrap();
        fs::write(store.objects_dir().join("not-an-id"), b"junk").unwrap();

        assert_eq!(store.ids().unwrap(), vec![id]);
    }
}
