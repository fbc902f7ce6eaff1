use std::collections::BTreeMap;
use std::sync::RwLock;

use serde_json::Value;

use crate::change::{ChangeRouter, ChangeStream, PrefChange};
use crate::error::{PrefsError, PrefsResult};
use crate::traits::PrefStore;
use crate::DEFAULT_QUOTA_BYTES;

/// In-memory configuration store for tests and embedding.
///
/// Enforces the same quota and emits the same change events as the
/// file-backed store; only durability differs.
pub struct InMemoryPrefStore {
    entries: RwLock<BTreeMap<String, Value>>,
    router: ChangeRouter,
    quota_bytes: usize,
}

impl InMemoryPrefStore {
    /// Create an empty store with the default quota.
    pub fn new() -> Self {
        Self::with_quota(DEFAULT_QUOTA_BYTES)
    }

    /// Create an empty store with an explicit byte budget.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            router: ChangeRouter::new(),
            quota_bytes,
        }
    }

    /// Serialized size of the whole document.
    pub fn document_bytes(&self) -> usize {
        let map = self.entries.read().expect("lock poisoned");
        serde_json::to_vec(&*map).map(|v| v.len()).unwrap_or(0)
    }
}

impl Default for InMemoryPrefStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Quota check on a candidate document. Shared with the fs backend.
pub(crate) fn check_quota(
    map: &BTreeMap<String, Value>,
    quota_bytes: usize,
) -> PrefsResult<Vec<u8>> {
    let encoded = serde_json::to_vec(map)?;
    if encoded.len() > quota_bytes {
        return Err(PrefsError::QuotaExceeded {
            bytes: encoded.len(),
            quota: quota_bytes,
        });
    }
    Ok(encoded)
}

impl PrefStore for InMemoryPrefStore {
    fn get_raw(&self, key: &str) -> PrefsResult<Option<Value>> {
        let map = self.entries.read().expect("lock poisoned");
        Ok(map.get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: Value) -> PrefsResult<()> {
        let change = {
            let mut map = self.entries.write().expect("lock poisoned");
            let old = map.get(key).cloned();
            if old.as_ref() == Some(&value) {
                return Ok(());
            }

            let mut candidate = map.clone();
            candidate.insert(key.to_string(), value.clone());
            check_quota(&candidate, self.quota_bytes)?;

            *map = candidate;
            PrefChange {
                key: key.to_string(),
                old,
                new: Some(value),
            }
        };
        self.router.route(change);
        Ok(())
    }

    fn remove(&self, key: &str) -> PrefsResult<bool> {
        let change = {
            let mut map = self.entries.write().expect("lock poisoned");
            match map.remove(key) {
                Some(old) => PrefChange {
                    key: key.to_string(),
                    old: Some(old),
                    new: None,
                },
                None => return Ok(false),
            }
        };
        self.router.route(change);
        Ok(true)
    }

    fn keys(&self) -> PrefsResult<Vec<String>> {
        let map = self.entries.read().expect("lock poisoned");
        Ok(map.keys().cloned().collect())
    }

    fn watch(&self, keys: &[&str]) -> ChangeStream {
        self.router.subscribe(keys)
    }
}

impl std::fmt::Debug for InMemoryPrefStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.entries.read().expect("lock poisoned").len();
        f.debug_struct("InMemoryPrefStore")
            .field("keys", &count)
            .field("quota_bytes", &self.quota_bytes)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys;
    use crate::traits::PrefStoreExt;
    use serde_json::json;

    // -----------------------------------------------------------------------
    // Basic key-value behavior
    // -----------------------------------------------------------------------

    #[test]
    fn set_then_get() {
        let store = InMemoryPrefStore::new();
        store.set_raw(keys::SETTINGS, json!({"blur": 4})).unwrap();
        assert_eq!(
            store.get_raw(keys::SETTINGS).unwrap(),
            Some(json!({"blur": 4}))
        );
    }

    #[test]
    fn absent_key_is_none_not_error() {
        let store = InMemoryPrefStore::new();
        assert!(store.get_raw(keys::TODOS).unwrap().is_none());
    }

    #[test]
    fn remove_reports_presence() {
        let store = InMemoryPrefStore::new();
        store.set_raw("k", json!(1)).unwrap();
        assert!(store.remove("k").unwrap());
        assert!(!store.remove("k").unwrap());
    }

    #[test]
    fn keys_are_sorted() {
        let store = InMemoryPrefStore::new();
        store.set_raw("zeta", json!(1)).unwrap();
        store.set_raw("alpha", json!(2)).unwrap();
        assert_eq!(store.keys().unwrap(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn typed_helpers_round_trip() {
        let store = InMemoryPrefStore::new();
        store.set(keys::QUICK_LINKS, &vec!["a", "b"]).unwrap();
        let back: Vec<String> = store.get(keys::QUICK_LINKS).unwrap().unwrap();
        assert_eq!(back, vec!["a", "b"]);
    }

    // -----------------------------------------------------------------------
    // Quota
    // -----------------------------------------------------------------------

    #[test]
    fn oversized_write_fails_and_leaves_store_untouched() {
        let store = InMemoryPrefStore::with_quota(128);
        store.set_raw("small", json!("ok")).unwrap();

        let big = "x".repeat(256);
        let err = store.set_raw("big", json!(big)).unwrap_err();
        assert!(matches!(err, PrefsError::QuotaExceeded { .. }), "got {err}");

        // The failed write applied nothing.
        assert!(store.get_raw("big").unwrap().is_none());
        assert_eq!(store.get_raw("small").unwrap(), Some(json!("ok")));
    }

    #[test]
    fn quota_counts_the_whole_document() {
        let store = InMemoryPrefStore::with_quota(64);
        store.set_raw("a", json!("0123456789012345678901234567890123456789")).unwrap();
        // Individually fine, but together past the budget.
        let err = store
            .set_raw("b", json!("0123456789012345678901234567890123456789"))
            .unwrap_err();
        assert!(matches!(err, PrefsError::QuotaExceeded { .. }));
    }

    // -----------------------------------------------------------------------
    // Change notification
    // -----------------------------------------------------------------------

    #[test]
    fn set_emits_old_and_new() {
        let store = InMemoryPrefStore::new();
        let mut rx = store.watch(&[keys::SETTINGS]);

        store.set_raw(keys::SETTINGS, json!({"blur": 1})).unwrap();
        store.set_raw(keys::SETTINGS, json!({"blur": 2})).unwrap();

        let first = rx.try_recv().unwrap();
        assert_eq!(first.old, None);
        assert_eq!(first.new, Some(json!({"blur": 1})));

        let second = rx.try_recv().unwrap();
        assert_eq!(second.old, Some(json!({"blur": 1})));
        assert_eq!(second.new, Some(json!({"blur": 2})));
    }

    #[test]
    fn rewriting_the_same_value_emits_nothing() {
        let store = InMemoryPrefStore::new();
        let mut rx = store.watch(&[]);

        store.set_raw("k", json!(7)).unwrap();
        store.set_raw("k", json!(7)).unwrap();

        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn remove_emits_new_none() {
        let store = InMemoryPrefStore::new();
        store.set_raw(keys::IMAGE_INDEX, json!(["a"])).unwrap();
        let mut rx = store.watch(&[keys::IMAGE_INDEX]);

        store.remove(keys::IMAGE_INDEX).unwrap();
        let got = rx.try_recv().unwrap();
        assert_eq!(got.old, Some(json!(["a"])));
        assert_eq!(got.new, None);
    }

    #[test]
    fn watcher_only_sees_its_keys() {
        let store = InMemoryPrefStore::new();
        let mut rx = store.watch(&[keys::QUICK_LINKS]);

        store.set_raw(keys::TODOS, json!([])).unwrap();
        store.set_raw(keys::QUICK_LINKS, json!([])).unwrap();

        let got = rx.try_recv().unwrap();
        assert_eq!(got.key, keys::QUICK_LINKS);
        assert!(rx.try_recv().is_err());
    }
}
