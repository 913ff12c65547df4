//! Durable key/value storage and the layout of the persisted session.

use crate::{error::StorageError, session::Session};
use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap, rc::Rc};

/// Key holding the persisted session blob.
pub const SESSION_KEY: &str = "auth-storage";

/// Keys written by the storage scheme that predates the session blob.
pub const LEGACY_KEYS: [&str; 3] = ["token", "user", "isSystemAdmin"];

/// Version written alongside the session blob.
pub const CURRENT_VERSION: u32 = 1;

/// String key/value storage that survives page reloads.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

/// Storage that lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.borrow().keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// The blob stored under [`SESSION_KEY`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub state: Session,
    #[serde(default)]
    pub version: u32,
}

/// Reads and writes the session blob.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionStorage<S> {
    store: S,
}

impl<S: KeyValueStore> SessionStorage<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn read(&self) -> Result<Option<PersistedSession>, StorageError> {
        let Some(raw) = self.store.get(SESSION_KEY)? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|err| StorageError::Corrupt(err.to_string()))
    }

    /// The persisted session, or an anonymous one if there is nothing usable stored.
    pub fn load(&self) -> Session {
        match self.read() {
            Ok(Some(persisted)) => persisted.state,
            Ok(None) => Session::anonymous(),
            Err(err) => {
                tracing::warn!("Failed to read the stored session: {err}");
                Session::anonymous()
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<(), StorageError> {
        let persisted = PersistedSession {
            state: session.clone(),
            version: CURRENT_VERSION,
        };
        let json =
            serde_json::to_string(&persisted).map_err(|err| StorageError::Write(err.to_string()))?;
        self.store.set(SESSION_KEY, &json)
    }

    /// The token of the persisted session.
    pub fn token(&self) -> Option<String> {
        self.load().token().map(str::to_string)
    }

    /// Removes the session blob and every legacy key.
    ///
    /// Every key is attempted even if an earlier removal fails; the first failure is returned.
    pub fn purge(&self) -> Result<(), StorageError> {
        let mut result = Ok(());
        for key in std::iter::once(SESSION_KEY).chain(LEGACY_KEYS) {
            if let Err(err) = self.store.remove(key) {
                tracing::warn!("Failed to remove {key} from storage: {err}");
                if result.is_ok() {
                    result = Err(err);
                }
            }
        }
        result
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testing;

    #[test]
    fn saved_sessions_load_back() {
        let storage = SessionStorage::new(MemoryStore::new());
        let session = Session::authenticated(testing::user(), "t0k".into());
        storage.save(&session).unwrap();

        assert_eq!(storage.load(), session);
        assert_eq!(storage.token().as_deref(), Some("t0k"));
        let persisted = storage.read().unwrap().unwrap();
        assert_eq!(persisted.version, CURRENT_VERSION);
    }

    #[test]
    fn corrupt_blob_loads_as_anonymous() {
        let storage = SessionStorage::new(MemoryStore::new());
        storage.store().set(SESSION_KEY, "{not json").unwrap();

        assert!(matches!(storage.read(), Err(StorageError::Corrupt(_))));
        assert!(!storage.load().is_authenticated());
        assert!(storage.token().is_none());
    }

    #[test]
    fn purge_removes_current_and_legacy_keys() {
        let store = MemoryStore::new();
        let storage = SessionStorage::new(&store);
        storage
            .save(&Session::authenticated(testing::user(), "t0k".into()))
            .unwrap();
        for key in LEGACY_KEYS {
            store.set(key, "stale").unwrap();
        }
        store.set("theme", "dark").unwrap();

        storage.purge().unwrap();
        assert_eq!(store.keys(), vec!["theme".to_string()]);
    }
}
