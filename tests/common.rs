#![allow(dead_code)]

use std::sync::Arc;

use mindbridge::api::HttpBackend;
use mindbridge::session::{SessionManager, ADMIN_KEY, TOKEN_KEY, USER_KEY};
use mindbridge::store::memory_store::MemoryStore;
use mockito::{Mock, ServerGuard};
use reqwest::Client;
use serde_json::{json, Value};

/// Nothing listens here, so every request fails at the transport level.
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:1";

pub fn user_json() -> Value {
    json!({
        "id": 1,
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "is_active": true,
        "created_at": "2024-05-01T10:00:00",
        "last_login": null
    })
}

pub fn admin_json() -> Value {
    json!({
        "id": 100,
        "name": "Root",
        "email": "root@example.com",
        "is_active": true
    })
}

pub fn manager(url: &str, store: Arc<MemoryStore>) -> SessionManager {
    let backend = Arc::new(HttpBackend::with_client(Client::new(), url));
    SessionManager::new(backend, store)
}

/// A manager that has already finished startup verification.
pub async fn ready_manager(url: &str, store: Arc<MemoryStore>) -> SessionManager {
    let mut manager = manager(url, store);
    manager.init().await;
    manager
}

pub fn stored_user_session(token: &str) -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_entries([
        (TOKEN_KEY, token.to_string()),
        (USER_KEY, user_json().to_string()),
    ]))
}

pub fn stored_admin_session(token: &str) -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_entries([
        (TOKEN_KEY, token.to_string()),
        (ADMIN_KEY, admin_json().to_string()),
    ]))
}

pub async fn mock_json(
    server: &mut ServerGuard,
    method: &str,
    path: &str,
    status: usize,
    body: Value,
) -> Mock {
    server
        .mock(method, path)
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await
}

pub async fn mock_login(server: &mut ServerGuard, token: &str) -> Mock {
    mock_json(
        server,
        "POST",
        "/login",
        200,
        json!({"access_token": token, "token_type": "bearer", "user": user_json()}),
    )
    .await
}

pub async fn mock_admin_login(server: &mut ServerGuard, token: &str) -> Mock {
    mock_json(
        server,
        "POST",
        "/admin/login",
        200,
        json!({"access_token": token, "token_type": "bearer", "admin": admin_json()}),
    )
    .await
}
