use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Backend identifier, kept in the JSON form it arrived in (number or string)
/// so a stored profile is written back exactly as the backend sent it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum ProfileId {
    Number(Number),
    Text(String),
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProfileId::Number(n) => f.pad(&n.to_string()),
            ProfileId::Text(s) => f.pad(s),
        }
    }
}

impl From<&str> for ProfileId {
    fn from(id: &str) -> Self {
        ProfileId::Text(id.to_string())
    }
}

impl From<String> for ProfileId {
    fn from(id: String) -> Self {
        ProfileId::Text(id)
    }
}

/// Compares by printed form, so `1` and `"1"` both equal `"1"`.
impl PartialEq<&str> for ProfileId {
    fn eq(&self, other: &&str) -> bool {
        match self {
            ProfileId::Text(s) => s == other,
            ProfileId::Number(n) => n.to_string() == *other,
        }
    }
}

/// The identity returned by the backend for a signed-in user or administrator.
///
/// Only `id`, `name` and `email` are required. Everything else the backend sends
/// (`is_active`, `created_at`, `last_login`, ...) is kept in `extra` so it survives
/// a round trip through storage unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: ProfileId,
    pub name: String,
    pub email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Profile {
    pub fn new(id: impl Into<ProfileId>, name: impl Into<String>, email: impl Into<String>) -> Self {
        Profile {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            extra: Map::new(),
        }
    }

    /// Look up a backend-defined field.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    pub fn is_active(&self) -> Option<bool> {
        self.field("is_active").and_then(Value::as_bool)
    }

    pub fn created_at(&self) -> Option<&str> {
        self.field("created_at").and_then(Value::as_str)
    }

    pub fn last_login(&self) -> Option<&str> {
        self.field("last_login").and_then(Value::as_str)
    }
}
