//! Operations available to a signed-in user, plus the public health probe.

use serde_json::Value;

use super::{SessionError, SessionManager};
use crate::api::RequestOptions;
use crate::models::Profile;

impl SessionManager {
    /// Re-fetch the signed-in user's profile from `/me` and store it.
    pub async fn refresh_user(&mut self) -> Result<Profile, SessionError> {
        let token = self.require_user()?.clone();
        let profile = self.backend().current_user(&token).await?;
        self.refresh_profile(profile.clone());
        Ok(profile)
    }

    /// Re-fetch the signed-in administrator's profile from `/admin/me` and store it.
    pub async fn refresh_admin(&mut self) -> Result<Profile, SessionError> {
        let token = self.require_admin()?.clone();
        let profile = self.backend().current_admin(&token).await?;
        self.refresh_profile(profile.clone());
        Ok(profile)
    }

    /// `GET /dashboard`
    pub async fn dashboard(&self) -> Result<Value, SessionError> {
        self.require_user()?;
        self.authenticated_request("/dashboard", RequestOptions::get())
            .await
    }

    /// Change the user's display name. The updated profile replaces the stored one.
    pub async fn update_profile(&mut self, name: &str) -> Result<Profile, SessionError> {
        self.require_user()?;
        let profile: Profile = self
            .authenticated_json("/profile", RequestOptions::put().with_query("name", name))
            .await?;
        self.refresh_profile(profile.clone());
        Ok(profile)
    }

    /// `GET /health`, sent without credentials.
    pub async fn health(&self) -> Result<Value, SessionError> {
        Ok(self
            .backend()
            .request("/health", RequestOptions::get(), None)
            .await?)
    }
}
