//! The session store: bearer token and signed-in profile.
//!
//! The token is stored raw (an opaque string), the profile as JSON. Reads
//! fail soft; writes raise.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::StorageKeys;
use crate::error::Transience;
use crate::storage::{StorageBackend, StorageError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("the sign-in details could not be stored")]
    Persistence(#[source] StorageError),
}

impl SessionError {
    pub fn transience(&self) -> Transience {
        Transience::Retryable
    }
}

/// The signed-in user as the auth API reports it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
}

/// Persisted auth session (token + profile).
pub struct SessionStore {
    storage: Arc<dyn StorageBackend>,
    token_key: String,
    profile_key: String,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn StorageBackend>, keys: &StorageKeys) -> Self {
        Self {
            storage,
            token_key: keys.token.clone(),
            profile_key: keys.profile.clone(),
        }
    }

    /// The stored bearer token, if any.
    pub fn token(&self) -> Option<String> {
        match self.storage.get(&self.token_key) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(err) => {
                tracing::error!("failed to read the auth token from storage: {err}");
                None
            }
        }
    }

    pub fn set_token(&self, token: &str) -> Result<(), SessionError> {
        self.storage
            .set(&self.token_key, token)
            .map_err(SessionError::Persistence)
    }

    pub fn is_signed_in(&self) -> bool {
        self.token().is_some()
    }

    /// The stored profile, or `None` on absence or any parse failure.
    pub fn profile(&self) -> Option<Profile> {
        let stored = match self.storage.get(&self.profile_key) {
            Ok(stored) => stored?,
            Err(err) => {
                tracing::error!("failed to read the profile from storage: {err}");
                return None;
            }
        };
        serde_json::from_str(&stored).ok()
    }

    pub fn set_profile(&self, profile: &Profile) -> Result<(), SessionError> {
        let payload = serde_json::to_string(profile).map_err(|e| {
            SessionError::Persistence(StorageError::Write {
                key: self.profile_key.clone(),
                reason: e.to_string(),
            })
        })?;
        self.storage
            .set(&self.profile_key, &payload)
            .map_err(SessionError::Persistence)
    }

    /// Sign out: remove both keys. Best-effort.
    pub fn clear(&self) {
        for key in [&self.token_key, &self.profile_key] {
            if let Err(err) = self.storage.remove(key) {
                tracing::error!("failed to clear `{key}` from storage: {err}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::storage::MemoryStorage;

    fn store() -> (Arc<MemoryStorage>, SessionStore) {
        let storage = Arc::new(MemoryStorage::new());
        let session = SessionStore::new(storage.clone(), &StorageKeys::default());
        (storage, session)
    }

    #[test]
    fn token_round_trip() {
        let (_, session) = store();
        assert!(!session.is_signed_in());

        session.set_token("abc123").unwrap();
        assert_eq!(session.token().as_deref(), Some("abc123"));
        assert!(session.is_signed_in());
    }

    #[test]
    fn profile_round_trip_and_soft_reads() {
        let (storage, session) = store();
        assert_eq!(session.profile(), None);

        let profile = Profile {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            avatar: None,
        };
        session.set_profile(&profile).unwrap();
        assert_eq!(session.profile(), Some(profile));

        storage
            .set(&StorageKeys::default().profile, "{broken")
            .unwrap();
        assert_eq!(session.profile(), None);
    }

    #[test]
    fn clear_signs_out() {
        let (_, session) = store();
        session.set_token("abc123").unwrap();
        session
            .set_profile(&Profile::default())
            .unwrap();

        session.clear();
        assert!(!session.is_signed_in());
        assert_eq!(session.profile(), None);
    }
}
