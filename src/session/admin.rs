//! Administrator-only operations. Each one refuses to run without an admin
//! session instead of letting the backend reject it.

use serde_json::Value;

use super::{SessionError, SessionManager};
use crate::api::{ApiError, RequestOptions};
use crate::models::admin::{
    ActivityFilter, ActivityList, SortOrder, TimeRange, UserList, UserSortKey,
};

impl SessionManager {
    /// `GET /admin/dashboard`
    pub async fn admin_dashboard(&self) -> Result<Value, SessionError> {
        self.require_admin()?;
        self.authenticated_request("/admin/dashboard", RequestOptions::get())
            .await
    }

    pub async fn list_users(
        &self,
        sort_by: UserSortKey,
        order: SortOrder,
    ) -> Result<UserList, SessionError> {
        self.require_admin()?;
        let options = RequestOptions::get()
            .with_query("sort_by", sort_by.as_str())
            .with_query("sort_order", order.as_str());
        self.authenticated_json("/admin/users", options).await
    }

    pub async fn activities(
        &self,
        filter: ActivityFilter,
        range: TimeRange,
    ) -> Result<ActivityList, SessionError> {
        self.require_admin()?;
        let options = RequestOptions::get()
            .with_query("filter", filter.as_str())
            .with_query("time_range", range.as_str());
        self.authenticated_json("/admin/activities", options).await
    }

    pub async fn user_details(&self, user_id: &str) -> Result<Value, SessionError> {
        self.require_admin()?;
        let path = user_path(user_id, None)?;
        self.authenticated_request(&path, RequestOptions::get()).await
    }

    pub async fn activate_user(&self, user_id: &str) -> Result<Value, SessionError> {
        self.require_admin()?;
        let path = user_path(user_id, Some("activate"))?;
        self.authenticated_request(&path, RequestOptions::post()).await
    }

    pub async fn deactivate_user(&self, user_id: &str) -> Result<Value, SessionError> {
        self.require_admin()?;
        let path = user_path(user_id, Some("deactivate"))?;
        self.authenticated_request(&path, RequestOptions::post()).await
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<Value, SessionError> {
        self.require_admin()?;
        let path = user_path(user_id, None)?;
        self.authenticated_request(&path, RequestOptions::delete())
            .await
    }
}

/// `/admin/users/{id}[/{action}]`.
///
/// The id must stay a single path segment after URL normalization, so only
/// ASCII letters, digits, `-`, `_` and `.` are accepted, and dot-only ids are
/// refused. Percent escapes are refused too, since `%2e%2e` normalizes to `..`.
fn user_path(user_id: &str, action: Option<&str>) -> Result<String, SessionError> {
    let id = user_id.trim();
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.');
    if id.is_empty() || !id.chars().all(allowed) || id.chars().all(|c| c == '.') {
        return Err(ApiError::InvalidRequest(format!("invalid user id '{}'", user_id)).into());
    }
    Ok(match action {
        Some(action) => format!("/admin/users/{}/{}", id, action),
        None => format!("/admin/users/{}", id),
    })
}
