//! Current user endpoints.
//!
//! Routes:
//! - GET /user - The logged-in user, or `null` for anonymous sessions
//! - GET /user/settings - The caller's settings merged over defaults

use axum::{extract::State, routing::get, Extension, Json, Router};

use crate::{
    error::Result,
    middleware::Locals,
    services::{SettingsPayload, UserPayload},
    AppState,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_user))
        .route("/settings", get(get_settings))
}

async fn get_user(Extension(locals): Extension<Locals>) -> Json<Option<UserPayload>> {
    Json(locals.user.as_ref().map(UserPayload::from))
}

async fn get_settings(
    State(state): State<AppState>,
    Extension(locals): Extension<Locals>,
) -> Result<Json<SettingsPayload>> {
    let settings = state.account.find_settings(&locals.owner()).await?;
    Ok(Json(state.account.settings_payload(settings.as_ref())))
}
