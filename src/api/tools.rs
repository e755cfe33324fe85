//! Tool routes.
//!
//! Routes:
//! - GET /tools/count - Number of approved community tools

use axum::{extract::State, routing::get, Json, Router};

use crate::{db, error::Result, AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/count", get(count_tools))
}

async fn count_tools(State(state): State<AppState>) -> Result<Json<i64>> {
    let count = db::count_approved_community_tools(&state.db).await?;
    Ok(Json(count))
}
