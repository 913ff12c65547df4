//! The session store: the in-memory session backed by durable storage.

use crate::{
    error::StorageError,
    migration,
    session::{Session, User},
    storage::{KeyValueStore, SessionStorage},
};

#[derive(Debug, Clone)]
pub struct SessionStore<S> {
    storage: SessionStorage<S>,
    session: Session,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Migrates the storage if needed and restores the persisted session.
    pub fn open(store: S) -> Self {
        let storage = SessionStorage::new(store);
        match migration::migrate(&storage) {
            Ok(report) if report.is_noop() => {}
            Ok(report) => tracing::info!("Migrated stored session: {report:?}"),
            Err(err) => tracing::warn!("Failed to migrate stored session: {err}"),
        }
        let session = storage.load();
        tracing::debug!(
            "Restored session, authenticated: {}",
            session.is_authenticated()
        );
        Self { storage, session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn storage(&self) -> &SessionStorage<S> {
        &self.storage
    }

    /// Authenticates the session. The in-memory session is updated even if persisting it fails.
    pub fn login(&mut self, user: User, token: String) -> Result<(), StorageError> {
        tracing::info!("Logging in as {}", user.email);
        self.session = Session::authenticated(user, token);
        self.storage.save(&self.session)
    }

    /// Clears the session and removes everything it persisted.
    pub fn logout(&mut self) -> Result<(), StorageError> {
        tracing::info!("Logging out");
        self.session = Session::anonymous();
        self.storage.purge()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        storage::{MemoryStore, LEGACY_KEYS, SESSION_KEY},
        testing,
    };

    #[test]
    fn login_is_persisted_and_restored() {
        let store = MemoryStore::new();
        let mut session_store = SessionStore::open(&store);
        assert!(!session_store.session().is_authenticated());

        session_store
            .login(testing::user(), "t0k".into())
            .unwrap();
        assert!(session_store.session().is_authenticated());
        assert_eq!(session_store.session().user(), Some(&testing::user()));

        let reopened = SessionStore::open(&store);
        assert_eq!(reopened.session(), session_store.session());
    }

    #[test]
    fn logout_leaves_no_session_data() {
        let store = MemoryStore::new();
        let mut session_store = SessionStore::open(&store);
        session_store
            .login(testing::user(), "t0k".into())
            .unwrap();
        // written by something else after the store was opened
        for key in LEGACY_KEYS {
            store.set(key, "stale").unwrap();
        }

        session_store.logout().unwrap();
        assert!(!session_store.session().is_authenticated());
        assert!(session_store.session().token().is_none());
        assert!(store.get(SESSION_KEY).unwrap().is_none());
        for key in LEGACY_KEYS {
            assert!(store.get(key).unwrap().is_none(), "{key} left behind");
        }
        assert!(!SessionStore::open(&store).session().is_authenticated());
    }
}
