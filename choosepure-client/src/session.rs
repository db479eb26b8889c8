//! Session persistence
//!
//! The session lives in memory and is mirrored to [`Storage`] under the
//! `token` and `user` keys so it survives restarts. Token and user are
//! always written and cleared together.

use std::sync::{Arc, RwLock};

use choosepure_core::{AuthToken, Session, UserProfile};

use crate::error::{ClientError, ClientResult};
use crate::storage::{Storage, TOKEN_KEY, USER_KEY};

pub struct SessionStore {
    storage: Arc<dyn Storage>,
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    /// Create an empty store; call [`SessionStore::restore`] to load a persisted session
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self {
            storage,
            current: RwLock::new(None),
        }
    }

    /// Load the persisted session, if any.
    ///
    /// A missing half or an unreadable profile clears both keys and leaves the
    /// store unauthenticated. The token is not checked against the server
    /// here; a stale token surfaces as a 401 on the first call that uses it.
    pub fn restore(&self) -> Option<Session> {
        let token = self.read_key(TOKEN_KEY);
        let user = self.read_key(USER_KEY);

        let session = match (token, user) {
            (Some(token), Some(user)) => match serde_json::from_str::<UserProfile>(&user) {
                Ok(user) => Some(Session::new(AuthToken::new(token), user)),
                Err(e) => {
                    tracing::warn!(error = %e, "Stored user profile is unreadable, clearing session");
                    None
                }
            },
            (None, None) => None,
            _ => {
                tracing::warn!("Stored session is incomplete, clearing it");
                None
            }
        };

        if session.is_none() {
            self.clear();
        } else {
            tracing::debug!("Restored session from storage");
        }

        *self.current.write().unwrap() = session.clone();
        session
    }

    pub fn current(&self) -> Option<Session> {
        self.current.read().unwrap().clone()
    }

    pub fn token(&self) -> Option<AuthToken> {
        self.current
            .read()
            .unwrap()
            .as_ref()
            .map(|session| session.token.clone())
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.current
            .read()
            .unwrap()
            .as_ref()
            .map(|session| session.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.read().unwrap().is_some()
    }

    /// Persist a new session and make it current
    pub fn establish(&self, session: Session) -> ClientResult<()> {
        let user = serde_json::to_string(&session.user)
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        self.storage.set(TOKEN_KEY, session.token.as_str())?;
        if let Err(e) = self.storage.set(USER_KEY, &user) {
            let _ = self.storage.remove(TOKEN_KEY);
            return Err(e);
        }

        tracing::info!(user_id = %session.user.id, "Session established");
        *self.current.write().unwrap() = Some(session);
        Ok(())
    }

    /// Replace the stored profile, keeping the token
    pub fn update_user(&self, user: UserProfile) -> ClientResult<()> {
        let mut current = self.current.write().unwrap();
        if let Some(session) = current.as_mut() {
            let serialized = serde_json::to_string(&user)
                .map_err(|e| ClientError::Storage(e.to_string()))?;
            self.storage.set(USER_KEY, &serialized)?;
            session.user = user;
        }
        Ok(())
    }

    /// Drop the session from memory and storage.
    ///
    /// Storage failures are logged; the in-memory session is always cleared.
    pub fn clear(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!(key, error = %e, "Failed to remove stored session key");
            }
        }
        *self.current.write().unwrap() = None;
    }

    /// A stored value; read failures count as absent
    fn read_key(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read stored session key");
                None
            }
        }
    }
}
