use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use super::{ApiError, Backend, Credentials, Registration, RequestOptions};
use crate::config::ApiConfig;
use crate::models::{AccessToken, AdminGrant, Profile, UserGrant};
use crate::utils::value::value_to_string;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// A [`Backend`] that talks to the REST API over HTTP.
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        info!("Creating HTTP backend for '{}'", config.base_url);
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
        Ok(Self::with_client(client, &config.base_url))
    }

    pub fn with_client(client: Client, base_url: &str) -> Self {
        HttpBackend {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        builder.send().await.map_err(ApiError::from_transport)
    }

    async fn post_json<B, T>(&self, endpoint: &str, body: &B, fallback: &str) -> Result<T, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(endpoint);
        debug!("Sending POST request to: {}", url);
        let response = self.send(self.client.post(&url).json(body)).await?;
        read_typed(response, fallback).await
    }

    async fn get_authorized<T>(&self, endpoint: &str, token: &AccessToken) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let url = self.url(endpoint);
        debug!("Sending GET request to: {}", url);
        let builder = self.client.get(&url).bearer_auth(token.as_str());
        let response = self.send(builder).await?;
        read_typed(response, "Session verification failed").await
    }
}

/// Pull a human-readable message out of an error body's `detail` field.
///
/// `detail` is usually a string; validation failures send a list of
/// `{ "msg": ... }` entries, which are joined.
pub fn detail_message(body: &Value) -> Option<String> {
    match body.get("detail")? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .map(|item| match item.get("msg").and_then(Value::as_str) {
                    Some(msg) => msg.to_string(),
                    None => value_to_string(item.clone()),
                })
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join("; "))
            }
        }
        other => Some(value_to_string(other.clone())),
    }
}

fn rejection(status: StatusCode, body: &str, fallback: &str) -> ApiError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .as_ref()
        .and_then(detail_message)
        .unwrap_or_else(|| fallback.to_string());
    debug!("Backend rejected request with status {}: {}", status, message);
    ApiError::Rejected {
        status: status.as_u16(),
        message,
    }
}

async fn read_typed<T: DeserializeOwned>(response: Response, fallback: &str) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await.map_err(ApiError::from_transport)?;
    if !status.is_success() {
        return Err(rejection(status, &body, fallback));
    }
    serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

fn check_token(token: &AccessToken) -> Result<(), ApiError> {
    if token.is_empty() {
        return Err(ApiError::Decode(
            "response did not include an access token".to_string(),
        ));
    }
    Ok(())
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.contains("application/json"))
        .unwrap_or(false)
}

fn build_headers(extra: &[(String, String)]) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    for (name, value) in extra {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ApiError::InvalidRequest(format!("header name '{}': {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ApiError::InvalidRequest(format!("header '{}': {}", name, e)))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

#[async_trait::async_trait]
impl Backend for HttpBackend {
    async fn login(&self, credentials: &Credentials) -> Result<UserGrant, ApiError> {
        let grant: UserGrant = self.post_json("/login", credentials, "Login failed").await?;
        check_token(&grant.access_token)?;
        Ok(grant)
    }

    async fn admin_login(&self, credentials: &Credentials) -> Result<AdminGrant, ApiError> {
        let grant: AdminGrant = self
            .post_json("/admin/login", credentials, "Admin login failed")
            .await?;
        check_token(&grant.access_token)?;
        Ok(grant)
    }

    async fn register(&self, registration: &Registration) -> Result<UserGrant, ApiError> {
        let grant: UserGrant = self
            .post_json("/register", registration, "Registration failed")
            .await?;
        check_token(&grant.access_token)?;
        Ok(grant)
    }

    async fn current_user(&self, token: &AccessToken) -> Result<Profile, ApiError> {
        self.get_authorized("/me", token).await
    }

    async fn current_admin(&self, token: &AccessToken) -> Result<Profile, ApiError> {
        self.get_authorized("/admin/me", token).await
    }

    async fn request(
        &self,
        endpoint: &str,
        options: RequestOptions,
        token: Option<&AccessToken>,
    ) -> Result<Value, ApiError> {
        let url = self.url(endpoint);
        debug!(
            method = %options.method,
            url = url.as_str(),
            authorized = token.is_some(),
            "Sending backend request"
        );

        let mut builder = self.client.request(options.method.clone(), &url);
        if let Some(token) = token {
            builder = builder.bearer_auth(token.as_str());
        }
        // Applied after the bearer header so callers may override anything.
        builder = builder.headers(build_headers(&options.headers)?);
        if !options.query.is_empty() {
            builder = builder.query(&options.query);
        }
        if let Some(body) = &options.body {
            builder = builder.body(body.to_string());
        }

        let response = self.send(builder).await?;
        let status = response.status();
        let json = is_json(&response);
        let text = response.text().await.map_err(ApiError::from_transport)?;
        debug!("Backend responded to {} with status {}", endpoint, status);

        if json {
            let parsed = if text.trim().is_empty() {
                Ok(Value::Null)
            } else {
                serde_json::from_str::<Value>(&text)
            };
            if !status.is_success() {
                let message = parsed
                    .ok()
                    .as_ref()
                    .and_then(detail_message)
                    .unwrap_or_else(|| format!("HTTP error! status: {}", status.as_u16()));
                return Err(ApiError::Rejected {
                    status: status.as_u16(),
                    message,
                });
            }
            return parsed.map_err(|e| ApiError::Decode(e.to_string()));
        }

        if !status.is_success() {
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message: format!("HTTP error! status: {} - {}", status.as_u16(), text.trim()),
            });
        }
        Ok(Value::String(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ErrorKind;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn backend_for(server: &Server) -> HttpBackend {
        HttpBackend::with_client(Client::new(), &server.url())
    }

    /// Test that a successful login returns the token and the user profile.
    #[tokio::test]
    async fn test_login_success() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/login")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "email": "ada@example.com",
                "password": "secret"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"access_token":"tok-1","token_type":"bearer",
                    "user":{"id":"u1","name":"Ada","email":"ada@example.com","is_active":true}}"#,
            )
            .create_async()
            .await;

        let grant = backend_for(&server)
            .login(&Credentials::new("ada@example.com", "secret"))
            .await
            .unwrap();
        m.assert_async().await;
        assert_eq!(grant.access_token.as_str(), "tok-1");
        assert_eq!(grant.user.email, "ada@example.com");
    }

    /// Test that the backend's `detail` message is surfaced verbatim.
    #[tokio::test]
    async fn test_login_rejection_uses_detail() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/login")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"detail":"Invalid credentials"}"#)
            .create_async()
            .await;

        let err = backend_for(&server)
            .login(&Credentials::new("user@example.com", "wrongpass"))
            .await
            .unwrap_err();
        m.assert_async().await;
        assert_eq!(err.kind(), ErrorKind::Credential);
        assert_eq!(err.to_string(), "Invalid credentials");
        assert_eq!(err.status(), Some(401));
    }

    #[tokio::test]
    async fn test_rejection_without_detail_uses_fallback() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/admin/login")
            .with_status(500)
            .with_body("Internal Server Error")
            .create_async()
            .await;

        let err = backend_for(&server)
            .admin_login(&Credentials::new("root@example.com", "pw"))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Admin login failed");
    }

    #[tokio::test]
    async fn test_validation_details_are_joined() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/register")
            .with_status(422)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"detail":[{"loc":["body","email"],"msg":"value is not a valid email address"},
                              {"loc":["body","name"],"msg":"field required"}]}"#,
            )
            .create_async()
            .await;

        let err = backend_for(&server)
            .register(&Registration::new("nope", "pw", ""))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "value is not a valid email address; field required"
        );
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_a_decode_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/login")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let err = backend_for(&server)
            .login(&Credentials::new("a@b.c", "pw"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[tokio::test]
    async fn test_empty_access_token_is_a_decode_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/login")
            .with_status(200)
            .with_body(r#"{"access_token":"","user":{"id":"1","name":"A","email":"a@b.c"}}"#)
            .create_async()
            .await;

        let err = backend_for(&server)
            .login(&Credentials::new("a@b.c", "pw"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[tokio::test]
    async fn test_current_user_sends_bearer_token() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/me")
            .match_header("authorization", "Bearer tok-1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"u1","name":"Ada","email":"ada@example.com"}"#)
            .create_async()
            .await;

        let profile = backend_for(&server)
            .current_user(&AccessToken::new("tok-1"))
            .await
            .unwrap();
        m.assert_async().await;
        assert_eq!(profile.id, "u1");
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_a_network_error() {
        // Nothing listens on port 1.
        let backend = HttpBackend::with_client(Client::new(), "http://127.0.0.1:1");
        let err = backend
            .login(&Credentials::new("a@b.c", "pw"))
            .await
            .unwrap_err();
        assert!(err.is_network());
        assert!(err.to_string().starts_with("Network error"));
    }

    #[tokio::test]
    async fn test_generic_request_returns_json_and_forwards_query() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/admin/users")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("sort_by".into(), "name".into()),
                Matcher::UrlEncoded("sort_order".into(), "asc".into()),
            ]))
            .match_header("authorization", "Bearer admin-tok")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"users":[],"total":0}"#)
            .create_async()
            .await;

        let options = RequestOptions::get()
            .with_query("sort_by", "name")
            .with_query("sort_order", "asc");
        let data = backend_for(&server)
            .request("admin/users", options, Some(&AccessToken::new("admin-tok")))
            .await
            .unwrap();
        m.assert_async().await;
        assert_eq!(data, json!({"users": [], "total": 0}));
    }

    #[tokio::test]
    async fn test_generic_request_without_token_sends_no_authorization() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/health")
            .match_header("authorization", Matcher::Missing)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":"healthy"}"#)
            .create_async()
            .await;

        let data = backend_for(&server)
            .request("/health", RequestOptions::get(), None)
            .await
            .unwrap();
        m.assert_async().await;
        assert_eq!(data["status"], "healthy");
    }

    #[tokio::test]
    async fn test_generic_request_text_responses() {
        let mut server = Server::new_async().await;
        let _ok = server
            .mock("GET", "/")
            .with_status(200)
            .with_header("content-type", "text/plain")
            .with_body("welcome")
            .create_async()
            .await;
        let _err = server
            .mock("DELETE", "/admin/users/42")
            .with_status(404)
            .with_header("content-type", "text/plain")
            .with_body("Not Found")
            .create_async()
            .await;

        let backend = backend_for(&server);
        let data = backend
            .request("/", RequestOptions::get(), None)
            .await
            .unwrap();
        assert_eq!(data, Value::String("welcome".to_string()));

        let err = backend
            .request("/admin/users/42", RequestOptions::delete(), None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "HTTP error! status: 404 - Not Found");
    }

    #[tokio::test]
    async fn test_generic_request_json_error_uses_detail_or_status() {
        let mut server = Server::new_async().await;
        let _detail = server
            .mock("POST", "/admin/users/7/activate")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(r#"{"detail":"User not found"}"#)
            .create_async()
            .await;
        let _bare = server
            .mock("GET", "/dashboard")
            .with_status(503)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":"down"}"#)
            .create_async()
            .await;

        let backend = backend_for(&server);
        let err = backend
            .request("/admin/users/7/activate", RequestOptions::post(), None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "User not found");

        let err = backend
            .request("/dashboard", RequestOptions::get(), None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "HTTP error! status: 503");
    }

    #[tokio::test]
    async fn test_invalid_header_is_rejected_before_sending() {
        let backend = HttpBackend::with_client(Client::new(), "http://127.0.0.1:1");
        let options = RequestOptions::get().with_header("bad header", "x");
        let err = backend.request("/me", options, None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }

    #[test]
    fn test_url_joining_tolerates_slashes() {
        let backend = HttpBackend::with_client(Client::new(), "http://api.test/");
        assert_eq!(backend.url("/me"), "http://api.test/me");
        assert_eq!(backend.url("admin/me"), "http://api.test/admin/me");
    }
}
