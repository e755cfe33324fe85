//! Common test utilities and helpers.

#![allow(dead_code)]

use axum::{http::HeaderValue, Router};
use axum_test::TestServer;
use chat_api::api;
use chat_api::config::{CatalogConfig, Config};
use chat_api::db::{self, DbPool};
use chat_api::middleware::session_id_from_secret;
use chat_api::models::{ObjectId, Session, Tool, User};
use chat_api::AppState;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;

/// Id of the config tool in the test catalog.
pub const CONFIG_TOOL_ID: &str = "00000000000000000000000a";

/// Two models (one unlisted), one retired model and one config tool.
pub fn test_catalog() -> CatalogConfig {
    let models = serde_json::from_value(json!([
        {"name": "zephyr", "displayName": "Zephyr", "tools": true},
        {"name": "internal", "unlisted": true}
    ]))
    .expect("valid models");
    let old_models = serde_json::from_value(json!([
        {"name": "starcoder", "transferTo": "zephyr"}
    ]))
    .expect("valid old models");
    let tools: Vec<Tool> = serde_json::from_value(json!([{
        "_id": CONFIG_TOOL_ID,
        "type": "config",
        "displayName": "Image editing",
        "name": "image_editing",
        "description": "Edit images",
        "inputs": [
            {"name": "image", "paramType": "required", "type": "file", "mimeTypes": ["image/png"]}
        ]
    }]))
    .expect("valid tools");

    CatalogConfig::new(models, old_models, tools).expect("valid catalog")
}

pub fn test_config() -> Config {
    Config::with_catalog(test_catalog())
}

/// Build a test server over an in-memory database.
pub async fn build_test_app() -> (TestServer, AppState) {
    build_test_app_with(test_config()).await
}

pub async fn build_test_app_with(config: Config) -> (TestServer, AppState) {
    build_test_app_full(config, None).await
}

/// Like [`build_test_app`], rendering `/metrics` through `prometheus`.
pub async fn build_test_app_with_metrics(prometheus: PrometheusHandle) -> (TestServer, AppState) {
    build_test_app_full(test_config(), Some(prometheus)).await
}

async fn build_test_app_full(
    config: Config,
    prometheus: Option<PrometheusHandle>,
) -> (TestServer, AppState) {
    let pool = setup_test_db().await;
    let state = AppState::with_pool(pool, config, prometheus);

    let app = Router::new()
        .merge(api::routes(state.clone()))
        .with_state(state.clone());

    let server = TestServer::new(app).expect("Failed to create test server");
    (server, state)
}

pub async fn setup_test_db() -> DbPool {
    let pool = db::init_pool(":memory:")
        .await
        .expect("Failed to create test database");
    db::initialize_schema(&pool)
        .await
        .expect("Failed to apply schema");
    pool
}

/// `Cookie` header carrying the given session secret.
pub fn session_cookie(secret: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("hf-chat={}", secret)).expect("valid cookie")
}

/// Session id the server derives from a cookie secret.
pub fn session_id(secret: &str) -> String {
    session_id_from_secret(secret)
}

/// Store a user and a login session bound to `secret`.
pub async fn login(pool: &DbPool, name: &str, secret: &str) -> User {
    let user = User::new(name);
    db::save_user(pool, &user).await.expect("save user");
    let session = Session::new(session_id(secret), user.id, chrono::Duration::days(1));
    db::save_session(pool, &session).await.expect("save session");
    user
}

pub fn object_id(hex: &str) -> ObjectId {
    ObjectId::parse_str(hex).expect("valid object id")
}
