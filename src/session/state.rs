use std::fmt;

use crate::models::{AccessToken, Profile};

/// Whether startup verification has finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    Ready,
}

/// Kind of signed-in identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => f.write_str("user"),
            Role::Admin => f.write_str("admin"),
        }
    }
}

/// The current identity. A token never exists without exactly one profile.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    Anonymous,
    User {
        token: AccessToken,
        profile: Profile,
    },
    Admin {
        token: AccessToken,
        profile: Profile,
    },
}

impl SessionState {
    pub fn role(&self) -> Option<Role> {
        match self {
            SessionState::Anonymous => None,
            SessionState::User { .. } => Some(Role::User),
            SessionState::Admin { .. } => Some(Role::Admin),
        }
    }

    /// Short name for logs and output: `anonymous`, `user` or `admin`.
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Anonymous => "anonymous",
            SessionState::User { .. } => "user",
            SessionState::Admin { .. } => "admin",
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, SessionState::Anonymous)
    }

    pub fn token(&self) -> Option<&AccessToken> {
        match self {
            SessionState::Anonymous => None,
            SessionState::User { token, .. } | SessionState::Admin { token, .. } => Some(token),
        }
    }

    pub fn profile(&self) -> Option<&Profile> {
        match self {
            SessionState::Anonymous => None,
            SessionState::User { profile, .. } | SessionState::Admin { profile, .. } => {
                Some(profile)
            }
        }
    }

    pub fn user(&self) -> Option<&Profile> {
        match self {
            SessionState::User { profile, .. } => Some(profile),
            _ => None,
        }
    }

    pub fn admin(&self) -> Option<&Profile> {
        match self {
            SessionState::Admin { profile, .. } => Some(profile),
            _ => None,
        }
    }

    /// Swap in a fresher copy of the current profile, keeping token and role.
    /// Returns false (and changes nothing) when anonymous.
    pub fn replace_profile(&mut self, fresh: Profile) -> bool {
        match self {
            SessionState::Anonymous => false,
            SessionState::User { profile, .. } | SessionState::Admin { profile, .. } => {
                *profile = fresh;
                true
            }
        }
    }
}
