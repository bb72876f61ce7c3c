use std::fmt;

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::ApiError;
use crate::models::{AccessToken, AdminGrant, Profile, UserGrant};

/// Email/password pair sent to `/login` and `/admin/login`.
#[derive(Serialize, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Body of `/register`.
#[derive(Serialize, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl Registration {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        name: impl Into<String>,
    ) -> Self {
        Registration {
            email: email.into(),
            password: password.into(),
            name: name.into(),
        }
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("name", &self.name)
            .finish()
    }
}

/// Everything about a generic backend call except its endpoint and token.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub query: Vec<(String, String)>,
    /// Extra headers; these override the defaults (including `Content-Type`).
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new(Method::GET)
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        RequestOptions {
            method,
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn put() -> Self {
        Self::new(Method::PUT)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// The REST backend as seen by the session manager.
///
/// Every method resolves to a typed result; implementations never panic on
/// transport or payload problems.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// `POST /login`
    async fn login(&self, credentials: &Credentials) -> Result<UserGrant, ApiError>;

    /// `POST /admin/login`
    async fn admin_login(&self, credentials: &Credentials) -> Result<AdminGrant, ApiError>;

    /// `POST /register`
    async fn register(&self, registration: &Registration) -> Result<UserGrant, ApiError>;

    /// `GET /me`
    async fn current_user(&self, token: &AccessToken) -> Result<Profile, ApiError>;

    /// `GET /admin/me`
    async fn current_admin(&self, token: &AccessToken) -> Result<Profile, ApiError>;

    /// Any other call. The bearer token is attached when one is given.
    async fn request(
        &self,
        endpoint: &str,
        options: RequestOptions,
        token: Option<&AccessToken>,
    ) -> Result<Value, ApiError>;
}
