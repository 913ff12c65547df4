//! Brings persisted session data up to the current storage layout.
//!
//! Runs once when the session store is opened:
//! - a token and user left under the legacy keys are folded into the session
//!   blob if there is no blob yet,
//! - legacy keys are removed,
//! - a blob written with an older version is rewritten at [`CURRENT_VERSION`],
//! - a blob that cannot be parsed is discarded.
//!
//! Running it again on already migrated storage does nothing.

use crate::{
    error::StorageError,
    session::{Session, User},
    storage::{KeyValueStore, SessionStorage, CURRENT_VERSION, LEGACY_KEYS, SESSION_KEY},
};

const LEGACY_TOKEN_KEY: &str = LEGACY_KEYS[0];
const LEGACY_USER_KEY: &str = LEGACY_KEYS[1];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// A session was recovered from the legacy keys.
    pub imported_legacy: bool,
    pub removed_legacy_keys: Vec<&'static str>,
    /// Version of a blob that was rewritten.
    pub upgraded_from: Option<u32>,
    pub discarded_corrupt: bool,
}

impl MigrationReport {
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

pub fn migrate<S: KeyValueStore>(
    storage: &SessionStorage<S>,
) -> Result<MigrationReport, StorageError> {
    let mut report = MigrationReport::default();

    let existing = match storage.read() {
        Ok(existing) => existing,
        Err(StorageError::Corrupt(err)) => {
            tracing::warn!("Discarding unreadable session blob: {err}");
            storage.store().remove(SESSION_KEY)?;
            report.discarded_corrupt = true;
            None
        }
        Err(err) => return Err(err),
    };

    match existing {
        Some(persisted) if persisted.version < CURRENT_VERSION => {
            tracing::info!(
                "Upgrading stored session from version {} to {CURRENT_VERSION}",
                persisted.version
            );
            storage.save(&persisted.state)?;
            report.upgraded_from = Some(persisted.version);
        }
        Some(persisted) if persisted.version > CURRENT_VERSION => {
            tracing::warn!(
                "Stored session has version {}, newer than {CURRENT_VERSION}; leaving it as is",
                persisted.version
            );
        }
        Some(_) => {}
        None => {
            if let Some(session) = read_legacy(storage.store())? {
                tracing::info!("Importing session stored under the legacy keys");
                storage.save(&session)?;
                report.imported_legacy = true;
            }
        }
    }

    for key in LEGACY_KEYS {
        if storage.store().get(key)?.is_some() {
            storage.store().remove(key)?;
            report.removed_legacy_keys.push(key);
        }
    }

    Ok(report)
}

fn read_legacy<S: KeyValueStore>(store: &S) -> Result<Option<Session>, StorageError> {
    let (Some(token), Some(user)) = (store.get(LEGACY_TOKEN_KEY)?, store.get(LEGACY_USER_KEY)?)
    else {
        return Ok(None);
    };
    let user = match serde_json::from_str::<User>(&user) {
        Ok(user) => user,
        Err(err) => {
            tracing::warn!("Ignoring unreadable legacy user: {err}");
            return Ok(None);
        }
    };
    // the token was sometimes stored JSON encoded
    let token = serde_json::from_str::<String>(&token).unwrap_or(token);
    let session = Session::authenticated(user, token);
    Ok(session.is_authenticated().then_some(session))
}
