//! Session context for authentication.

use cms::{
    guard::{Access, Guard},
    storage::KeyValueStore,
    Credentials, SessionStore, StorageError, User,
};
use leptos::prelude::*;

/// The browser's `localStorage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage(&self) -> Result<web_sys::Storage, StorageError> {
        leptos::prelude::window()
            .local_storage()
            .map_err(|err| StorageError::Unavailable(format!("{err:?}")))?
            .ok_or_else(|| StorageError::Unavailable("localStorage is disabled".to_string()))
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?
            .get_item(key)
            .map_err(|err| StorageError::Unavailable(format!("{err:?}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|err| StorageError::Write(format!("{err:?}")))
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.storage()?
            .remove_item(key)
            .map_err(|err| StorageError::Write(format!("{err:?}")))
    }
}

/// The session store in a signal, so that guards and the layout follow logins and logouts.
#[derive(Clone, Copy)]
pub struct Session {
    store: RwSignal<SessionStore<BrowserStorage>>,
}

impl Session {
    pub fn new() -> Self {
        let store = SessionStore::open(BrowserStorage);
        tracing::info!(
            "Session restored, logged in: {}",
            store.session().is_authenticated()
        );
        Self {
            store: RwSignal::new(store),
        }
    }

    pub fn logged_in(&self) -> bool {
        self.store.with(|store| store.session().is_authenticated())
    }

    pub fn user(&self) -> Option<User> {
        self.store.with(|store| store.session().user().cloned())
    }

    pub fn check(&self, guard: Guard) -> Access {
        self.store.with(|store| guard.check(store.session()))
    }

    pub fn login(&self, user: User, token: String) -> Result<(), StorageError> {
        self.store
            .try_update(|store| store.login(user, token))
            .unwrap_or_else(|| {
                tracing::warn!("Login dropped, the session is no longer mounted");
                Err(StorageError::Unavailable(
                    "the session is no longer mounted".to_string(),
                ))
            })
    }

    pub fn logout(&self) {
        let result = self.store.try_update(|store| store.logout());
        if let Some(Err(err)) = result {
            tracing::warn!("Failed to clear the stored session: {err}");
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Credentials for Session {
    fn bearer_token(&self) -> Option<String> {
        self.store
            .with_untracked(|store| store.storage().token())
    }

    fn revoke(&self) {
        self.logout();
    }
}
