use std::sync::Arc;

use thiserror::Error;

use super::SessionState;
use crate::models::{AccessToken, Profile};
use crate::store::{Store, StoreError};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";
pub const ADMIN_KEY: &str = "admin";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("stored {key} profile is not valid: {source}")]
    Corrupt {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("stored session is inconsistent: {0}")]
    Inconsistent(&'static str),
}

/// Maps [`SessionState`] onto three independent string entries:
/// `token` (raw), `user` and `admin` (JSON profiles).
#[derive(Clone)]
pub struct SessionStorage {
    store: Arc<dyn Store>,
}

impl SessionStorage {
    pub fn new(store: Arc<dyn Store>) -> Self {
        SessionStorage { store }
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_enabled()
    }

    /// Read the persisted session. Anything other than "nothing stored" or
    /// "a token plus exactly one parseable profile" is an error.
    pub fn load(&self) -> Result<SessionState, StorageError> {
        let token = self.store.get(TOKEN_KEY)?;
        let user = self.store.get(USER_KEY)?;
        let admin = self.store.get(ADMIN_KEY)?;

        match (token, user, admin) {
            (None, None, None) => Ok(SessionState::Anonymous),
            (None, _, _) => Err(StorageError::Inconsistent("profile stored without a token")),
            (Some(token), _, _) if token.trim().is_empty() => {
                Err(StorageError::Inconsistent("stored token is empty"))
            }
            (Some(_), None, None) => {
                Err(StorageError::Inconsistent("token stored without a profile"))
            }
            (Some(_), Some(_), Some(_)) => Err(StorageError::Inconsistent(
                "both a user and an admin profile are stored",
            )),
            (Some(token), Some(user), None) => Ok(SessionState::User {
                token: AccessToken::new(token),
                profile: parse_profile(USER_KEY, &user)?,
            }),
            (Some(token), None, Some(admin)) => Ok(SessionState::Admin {
                token: AccessToken::new(token),
                profile: parse_profile(ADMIN_KEY, &admin)?,
            }),
        }
    }

    /// Persist `state`, removing whichever entries it does not use.
    pub fn save(&self, state: &SessionState) -> Result<(), StorageError> {
        match state {
            SessionState::Anonymous => self.clear(),
            SessionState::User { token, profile } => {
                let json = encode_profile(USER_KEY, profile)?;
                self.store.set(TOKEN_KEY, token.as_str())?;
                self.store.set(USER_KEY, &json)?;
                self.store.remove(ADMIN_KEY)?;
                Ok(())
            }
            SessionState::Admin { token, profile } => {
                let json = encode_profile(ADMIN_KEY, profile)?;
                self.store.set(TOKEN_KEY, token.as_str())?;
                self.store.set(ADMIN_KEY, &json)?;
                self.store.remove(USER_KEY)?;
                Ok(())
            }
        }
    }

    /// Remove all three entries. Every removal is attempted even if an
    /// earlier one fails; the first failure is returned.
    pub fn clear(&self) -> Result<(), StorageError> {
        let results = [
            self.store.remove(TOKEN_KEY),
            self.store.remove(USER_KEY),
            self.store.remove(ADMIN_KEY),
        ];
        for result in results {
            result?;
        }
        Ok(())
    }
}

fn parse_profile(key: &'static str, raw: &str) -> Result<Profile, StorageError> {
    serde_json::from_str(raw).map_err(|source| StorageError::Corrupt { key, source })
}

fn encode_profile(key: &'static str, profile: &Profile) -> Result<String, StorageError> {
    serde_json::to_string(profile).map_err(|source| StorageError::Corrupt { key, source })
}
