//! Page-load routes.
//!
//! Routes:
//! - GET /layout - Sidebar data for the current visitor
//! - GET /feature-flags - Feature flags for the current visitor

use axum::{extract::State, routing::get, Extension, Json, Router};

use crate::{
    error::Result,
    middleware::Locals,
    services::{FeatureFlags, LayoutPayload},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/layout", get(get_layout))
        .route("/feature-flags", get(get_feature_flags))
}

/// Everything the sidebar renders on page load.
///
/// GET /layout
async fn get_layout(
    State(state): State<AppState>,
    Extension(locals): Extension<Locals>,
) -> Result<Json<LayoutPayload>> {
    let payload = state
        .layout
        .load(&locals.owner(), locals.user.as_ref())
        .await?;
    Ok(Json(payload))
}

async fn get_feature_flags(
    State(state): State<AppState>,
    Extension(locals): Extension<Locals>,
) -> Json<FeatureFlags> {
    Json(state.account.feature_flags(locals.is_admin))
}
