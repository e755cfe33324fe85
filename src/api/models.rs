//! Model listing routes.
//!
//! Routes:
//! - GET /models - Listed chat models
//! - GET /models/old - Retired models

use axum::{extract::State, routing::get, Json, Router};

use crate::{
    models::{ChatModel, OldModel},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_models))
        .route("/old", get(list_old_models))
}

/// Every configured model that is not unlisted.
async fn list_models(State(state): State<AppState>) -> Json<Vec<ChatModel>> {
    Json(state.catalog.listed_models().cloned().collect())
}

async fn list_old_models(State(state): State<AppState>) -> Json<Vec<OldModel>> {
    Json(state.catalog.old_models().to_vec())
}
