//! Test utilities for integration tests
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, body::Body};
use tempfile::TempDir;
use tokio_rusqlite::Connection;

use chatter::api::AppState;
use chatter::api::app;
use chatter::auth::{create_auth_session, get_or_create_user};
use chatter::core::AppConfig;
use chatter::core::db::{async_db, initialize_db};

pub const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";

/// A router backed by a fresh database in a temporary directory. The
/// directory is removed when this is dropped so keep it alive for the
/// whole test.
pub struct TestApp {
    pub app: Router,
    pub db: Connection,
    _dir: TempDir,
}

pub async fn test_app(gemini_url: &str) -> TestApp {
    test_app_with_cap(gemini_url, 20).await
}

pub async fn test_app_with_cap(gemini_url: &str, context_cap: usize) -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("db");
    std::fs::create_dir_all(&db_path).expect("Failed to create db directory");
    let db_path = db_path.display().to_string();

    let db = async_db(&db_path)
        .await
        .expect("Failed to connect to async db");
    db.call(|conn| {
        initialize_db(conn).expect("Failed to migrate db");
        Ok(())
    })
    .await
    .unwrap();

    let app_config = AppConfig {
        db_path,
        gemini_api_hostname: gemini_url.to_string(),
        gemini_api_key: String::from("test-api-key"),
        gemini_model: String::from("gemini-2.5-flash"),
        gemini_timeout: Duration::from_secs(5),
        system_message: None,
        context_cap,
        session_ttl: chrono::Duration::days(1),
    };
    let app_state = AppState::new(db.clone(), app_config).expect("Failed to build app state");

    TestApp {
        app: app(Arc::new(app_state)),
        db,
        _dir: dir,
    }
}

/// Create a user and return a valid session token for them
pub async fn login(db: &Connection, email: &str) -> (String, String) {
    let user = get_or_create_user(db, email, None).await.unwrap();
    let session = create_auth_session(db, &user.id, chrono::Duration::days(1))
        .await
        .unwrap();
    (user.id, session.token)
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// A successful `generateContent` response body
pub fn gemini_reply(text: &str) -> String {
    serde_json::json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP",
            "index": 0
        }]
    })
    .to_string()
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_to_json(body: Body) -> serde_json::Value {
    serde_json::from_str(&body_to_string(body).await).unwrap()
}
