use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::storage::SessionStorage;
use super::{Phase, Role, SessionError, SessionState};
use crate::api::{ApiError, Backend, Credentials, Registration, RequestOptions};
use crate::models::{AccessToken, Profile};
use crate::store::Store;

/// Owns the current identity and keeps it consistent with the backend and
/// with durable storage.
///
/// One instance per process, built explicitly and handed to whoever needs it.
/// All mutation goes through `&mut self`; there is no interior locking.
pub struct SessionManager {
    backend: Arc<dyn Backend>,
    storage: SessionStorage,
    phase: Phase,
    state: SessionState,
}

impl SessionManager {
    /// A manager in the `Initializing` phase. Call [`SessionManager::init`] once
    /// before using it.
    pub fn new(backend: Arc<dyn Backend>, store: Arc<dyn Store>) -> Self {
        SessionManager {
            backend,
            storage: SessionStorage::new(store),
            phase: Phase::Initializing,
            state: SessionState::Anonymous,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_initializing(&self) -> bool {
        self.phase == Phase::Initializing
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn token(&self) -> Option<&AccessToken> {
        self.state.token()
    }

    pub fn user(&self) -> Option<&Profile> {
        self.state.user()
    }

    pub fn admin(&self) -> Option<&Profile> {
        self.state.admin()
    }

    pub(crate) fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }

    /// True once initialized with a token and a (user or admin) profile.
    pub fn is_authenticated(&self) -> bool {
        self.phase == Phase::Ready && !self.state.is_anonymous()
    }

    /// True once initialized with a token and an admin profile.
    pub fn is_admin(&self) -> bool {
        self.phase == Phase::Ready && self.state.role() == Some(Role::Admin)
    }

    /// Restore the persisted session and confirm it with the backend.
    ///
    /// The stored profile is put in place before the verification call so the
    /// identity is known while it is in flight; any failure clears memory and
    /// storage and leaves the manager anonymous. Runs once; later calls are
    /// no-ops.
    pub async fn init(&mut self) -> &SessionState {
        if self.phase == Phase::Ready {
            debug!("Session manager already initialized");
            return &self.state;
        }

        if let Some(role) = self.restore() {
            self.verify(role).await;
        }

        self.phase = Phase::Ready;
        info!(
            event_name = "session.init.completed",
            event_domain = "session",
            role = self.state.label(),
            "session initialized"
        );
        &self.state
    }

    fn restore(&mut self) -> Option<Role> {
        match self.storage.load() {
            Ok(SessionState::Anonymous) => {
                debug!("No persisted session found");
                None
            }
            Ok(state) => {
                self.state = state;
                debug!(
                    event_name = "session.init.restored",
                    event_domain = "session",
                    role = self.state.label(),
                    "restored persisted session, verifying with backend"
                );
                self.state.role()
            }
            Err(e) => {
                warn!(
                    event_name = "session.init.discarded",
                    event_domain = "session",
                    error = %e,
                    "persisted session unreadable, clearing"
                );
                self.fail_closed();
                None
            }
        }
    }

    async fn verify(&mut self, role: Role) {
        let Some(token) = self.state.token().cloned() else {
            self.fail_closed();
            return;
        };

        let verified = match role {
            Role::User => self.backend.current_user(&token).await,
            Role::Admin => self.backend.current_admin(&token).await,
        };

        match verified {
            Ok(profile) => {
                info!(
                    event_name = "session.init.verified",
                    event_domain = "session",
                    role = %role,
                    profile_id = %profile.id,
                    "persisted session confirmed by backend"
                );
                self.state.replace_profile(profile);
                self.persist();
            }
            Err(e) => {
                // Stale sessions are resolved silently: no error reaches the caller.
                info!(
                    event_name = "session.init.rejected",
                    event_domain = "session",
                    role = %role,
                    error = %e,
                    "persisted session failed verification, signing out"
                );
                self.fail_closed();
            }
        }
    }

    /// Sign in as a regular user.
    pub async fn login(&mut self, email: &str, password: &str) -> Result<Profile, SessionError> {
        self.ensure_ready()?;
        debug!("Attempting user login for: {}", email);

        let grant = self
            .backend
            .login(&Credentials::new(email, password))
            .await
            .map_err(|e| log_failure("session.login.failed", e))?;

        let profile = grant.user.clone();
        self.establish(SessionState::User {
            token: grant.access_token,
            profile: grant.user,
        });
        info!(
            event_name = "session.login.succeeded",
            event_domain = "session",
            role = "user",
            profile_id = %profile.id,
            "user signed in"
        );
        Ok(profile)
    }

    /// Sign in as an administrator. Any user session is replaced.
    pub async fn admin_login(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<Profile, SessionError> {
        self.ensure_ready()?;
        debug!("Attempting admin login for: {}", email);

        let grant = self
            .backend
            .admin_login(&Credentials::new(email, password))
            .await
            .map_err(|e| log_failure("session.admin_login.failed", e))?;

        let profile = grant.admin.clone();
        self.establish(SessionState::Admin {
            token: grant.access_token,
            profile: grant.admin,
        });
        info!(
            event_name = "session.admin_login.succeeded",
            event_domain = "session",
            role = "admin",
            profile_id = %profile.id,
            "administrator signed in"
        );
        Ok(profile)
    }

    /// Register a new account and sign in as it.
    pub async fn signup(
        &mut self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Profile, SessionError> {
        self.ensure_ready()?;
        debug!("Attempting user signup for: {}", email);

        let grant = self
            .backend
            .register(&Registration::new(email, password, name))
            .await
            .map_err(|e| log_failure("session.signup.failed", e))?;

        let profile = grant.user.clone();
        self.establish(SessionState::User {
            token: grant.access_token,
            profile: grant.user,
        });
        info!(
            event_name = "session.signup.succeeded",
            event_domain = "session",
            role = "user",
            profile_id = %profile.id,
            "account registered and signed in"
        );
        Ok(profile)
    }

    /// Forget the current identity, in memory and in storage. Never fails and
    /// may be called in any state.
    pub fn logout(&mut self) {
        let previous = self.state.label();
        self.state = SessionState::Anonymous;
        if let Err(e) = self.storage.clear() {
            warn!("Failed to clear persisted session on logout: {}", e);
        }
        info!(
            event_name = "session.logout",
            event_domain = "session",
            previous_role = previous,
            "signed out"
        );
    }

    /// Full teardown of the session. Equivalent to [`SessionManager::logout`].
    pub fn reset(&mut self) {
        self.logout();
    }

    /// Call any backend endpoint, with the bearer token attached when signed in.
    pub async fn authenticated_request(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Value, SessionError> {
        self.backend
            .request(endpoint, options, self.state.token())
            .await
            .map_err(|e| {
                debug!("Request to {} failed: {}", endpoint, e);
                SessionError::from(e)
            })
    }

    /// [`SessionManager::authenticated_request`], decoded into `T`.
    pub(crate) async fn authenticated_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, SessionError> {
        let data = self.authenticated_request(endpoint, options).await?;
        serde_json::from_value(data).map_err(|e| ApiError::Decode(e.to_string()).into())
    }

    pub(crate) fn require_user(&self) -> Result<&AccessToken, SessionError> {
        self.ensure_ready()?;
        match &self.state {
            SessionState::User { token, .. } => Ok(token),
            SessionState::Admin { .. } => Err(SessionError::UserRequired),
            SessionState::Anonymous => Err(SessionError::NotAuthenticated),
        }
    }

    pub(crate) fn require_admin(&self) -> Result<&AccessToken, SessionError> {
        self.ensure_ready()?;
        match &self.state {
            SessionState::Admin { token, .. } => Ok(token),
            SessionState::User { .. } => Err(SessionError::AdminRequired),
            SessionState::Anonymous => Err(SessionError::NotAuthenticated),
        }
    }

    /// Replace the current profile (same role and token) and persist it.
    pub(crate) fn refresh_profile(&mut self, profile: Profile) {
        if self.state.replace_profile(profile) {
            self.persist();
        }
    }

    fn ensure_ready(&self) -> Result<(), SessionError> {
        match self.phase {
            Phase::Ready => Ok(()),
            Phase::Initializing => Err(SessionError::Initializing),
        }
    }

    fn establish(&mut self, state: SessionState) {
        self.state = state;
        self.persist();
    }

    /// In-memory state stays authoritative when storage cannot be written.
    fn persist(&self) {
        if let Err(e) = self.storage.save(&self.state) {
            warn!("Failed to persist session: {}", e);
        }
    }

    fn fail_closed(&mut self) {
        self.state = SessionState::Anonymous;
        if let Err(e) = self.storage.clear() {
            warn!("Failed to clear persisted session: {}", e);
        }
    }
}

fn log_failure(event: &'static str, error: ApiError) -> SessionError {
    warn!(
        event_name = event,
        event_domain = "session",
        kind = ?error.kind(),
        error = %error,
        "authentication request failed"
    );
    SessionError::Api(error)
}
