use std::fmt;

use serde::{Deserialize, Serialize};

use super::Profile;

/// Opaque bearer credential issued by the backend.
///
/// The value is never shown in `Debug` output so it cannot leak into logs.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        AccessToken(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

/// Successful `/login` or `/register` response.
#[derive(Deserialize, Debug, Clone)]
pub struct UserGrant {
    pub access_token: AccessToken,
    #[serde(default)]
    pub token_type: Option<String>,
    pub user: Profile,
}

/// Successful `/admin/login` response.
#[derive(Deserialize, Debug, Clone)]
pub struct AdminGrant {
    pub access_token: AccessToken,
    #[serde(default)]
    pub token_type: Option<String>,
    pub admin: Profile,
}
