//! Payloads and query parameters for the administrator endpoints.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::Profile;
use crate::utils::value::{deserialize_id, deserialize_optional_id};

/// Returned when a command-line or config value does not name a known option.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown {kind} '{value}', expected one of: {expected}")]
pub struct ParseOptionError {
    kind: &'static str,
    value: String,
    expected: &'static str,
}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal, default = $default:ident {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// The value the backend expects on the wire.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseOptionError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($wire => Ok(Self::$variant),)+
                    _ => Err(ParseOptionError {
                        kind: $kind,
                        value: s.to_string(),
                        expected: concat!($($wire, " "),+).trim_end(),
                    }),
                }
            }
        }
    };
}

wire_enum! {
    /// Column used to order the user listing.
    UserSortKey, "sort key", default = CreatedAt {
        CreatedAt => "created_at",
        Name => "name",
        Email => "email",
        LastLogin => "last_login",
    }
}

wire_enum! {
    SortOrder, "sort order", default = Desc {
        Asc => "asc",
        Desc => "desc",
    }
}

wire_enum! {
    /// Category of activity-log entries to return.
    ActivityFilter, "activity filter", default = All {
        All => "all",
        Login => "login",
        Posts => "posts",
        Profile => "profile",
        Security => "security",
    }
}

wire_enum! {
    /// How far back the activity log should reach.
    TimeRange, "time range", default = Day {
        Hour => "1h",
        Day => "24h",
        Week => "7d",
        Month => "30d",
        All => "all",
    }
}

/// `GET /admin/users` response.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserList {
    pub users: Vec<Profile>,
    pub total: usize,
}

/// One entry of the backend's activity log.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Activity {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_optional_id")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    #[serde(default)]
    pub details: Option<Value>,
    #[serde(default)]
    pub ip_address: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    pub timestamp: String,
}

/// `GET /admin/activities` response.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ActivityList {
    pub activities: Vec<Activity>,
    pub total: usize,
}
