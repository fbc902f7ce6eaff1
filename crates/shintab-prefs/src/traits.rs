use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::change::ChangeStream;
use crate::error::PrefsResult;

/// Flat key-value configuration store.
///
/// Implementations must be `Send + Sync`, enforce their byte quota on
/// every write, and emit a change event per effective mutation (writing
/// the value a key already holds emits nothing). Each call is its own
/// isolated transaction.
pub trait PrefStore: Send + Sync {
    /// Read the raw JSON value for `key`, or `Ok(None)` if absent.
    fn get_raw(&self, key: &str) -> PrefsResult<Option<Value>>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// Fails with `QuotaExceeded` (store unchanged) if the resulting
    /// document would exceed the byte budget.
    fn set_raw(&self, key: &str, value: Value) -> PrefsResult<()>;

    /// Remove `key`. Returns `Ok(true)` if it existed.
    fn remove(&self, key: &str) -> PrefsResult<bool>;

    /// All keys currently present, sorted.
    fn keys(&self) -> PrefsResult<Vec<String>>;

    /// Subscribe to changes of the given keys (empty slice = all keys).
    fn watch(&self, keys: &[&str]) -> ChangeStream;
}

/// Typed accessors over any [`PrefStore`].
pub trait PrefStoreExt: PrefStore {
    /// Read and deserialize the value under `key`; `Ok(None)` when the
    /// key is absent.
    fn get<T: DeserializeOwned>(&self, key: &str) -> PrefsResult<Option<T>> {
        match self.get_raw(key)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Serialize and write `value` under `key`.
    fn set<T: Serialize>(&self, key: &str, value: &T) -> PrefsResult<()> {
        self.set_raw(key, serde_json::to_value(value)?)
    }
}

impl<S: PrefStore + ?Sized> PrefStoreExt for S {}
