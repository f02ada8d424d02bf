use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

use tracing::debug;
use wasm_bindgen::JsValue;

use crate::error::PrefsError;

/// String-valued key/value store that survives page loads.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, PrefsError>;
    fn set(&self, key: &str, value: &str) -> Result<(), PrefsError>;
}

pub(crate) fn js_reason(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

/// `window.localStorage`. Access can be denied (privacy mode, disabled
/// storage); every call then reports `StorageUnavailable`.
pub struct LocalStorageStore {
    storage: Result<web_sys::Storage, PrefsError>,
}

impl LocalStorageStore {
    pub fn new() -> Self {
        let storage = web_sys::window()
            .ok_or_else(|| PrefsError::StorageUnavailable("no window".to_string()))
            .and_then(|window| {
                window
                    .local_storage()
                    .map_err(|e| PrefsError::StorageUnavailable(js_reason(&e)))
            })
            .and_then(|storage| {
                storage.ok_or_else(|| {
                    PrefsError::StorageUnavailable("localStorage is disabled".to_string())
                })
            });
        if let Err(e) = &storage {
            debug!("Local storage not available: {}", e);
        }
        Self { storage }
    }

    fn storage(&self) -> Result<&web_sys::Storage, PrefsError> {
        self.storage.as_ref().map_err(Clone::clone)
    }
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, PrefsError> {
        self.storage()?
            .get_item(key)
            .map_err(|e| PrefsError::StorageRead {
                key: key.to_string(),
                reason: js_reason(&e),
            })
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PrefsError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| PrefsError::StorageWrite {
                key: key.to_string(),
                reason: js_reason(&e),
            })
    }
}

/// In-memory store. Reads and writes can be made to fail independently
/// to simulate quota errors or disabled storage.
#[derive(Default)]
pub struct MemoryStore {
    values: RefCell<BTreeMap<String, String>>,
    writes: RefCell<Vec<(String, String)>>,
    fail_reads: Cell<bool>,
    fail_writes: Cell<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<'a>(values: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let store = Self::new();
        store.values.borrow_mut().extend(
            values
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );
        store
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.set(fail);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }

    /// Current value without going through the failure switches.
    pub fn peek(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.values.borrow().clone()
    }

    /// Every successful write, in order.
    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes.borrow().clone()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PrefsError> {
        if self.fail_reads.get() {
            return Err(PrefsError::StorageRead {
                key: key.to_string(),
                reason: "read failure".to_string(),
            });
        }
        Ok(self.peek(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PrefsError> {
        if self.fail_writes.get() {
            return Err(PrefsError::StorageWrite {
                key: key.to_string(),
                reason: "quota exceeded".to_string(),
            });
        }
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.writes
            .borrow_mut()
            .push((key.to_string(), value.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_get_and_set() {
        let store = MemoryStore::new();
        assert_eq!(store.get("ui:theme").unwrap(), None);

        store.set("ui:theme", "dark").unwrap();
        assert_eq!(store.get("ui:theme").unwrap().as_deref(), Some("dark"));
        assert_eq!(
            store.writes(),
            vec![("ui:theme".to_string(), "dark".to_string())]
        );
    }

    #[test]
    fn test_memory_store_failures() {
        let store = MemoryStore::with_values([("ui:theme", "light")]);
        store.set_fail_reads(true);
        assert!(matches!(
            store.get("ui:theme"),
            Err(PrefsError::StorageRead { .. })
        ));

        store.set_fail_writes(true);
        assert!(matches!(
            store.set("ui:theme", "dark"),
            Err(PrefsError::StorageWrite { .. })
        ));
        assert_eq!(store.peek("ui:theme").as_deref(), Some("light"));
        assert!(store.writes().is_empty());
    }
}
