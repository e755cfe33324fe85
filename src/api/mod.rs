//! API Routes for the chat API
//!
//! This module combines all API routes into a single router.
//! Routes are organized by domain and apply appropriate middleware.

mod conversations;
mod layout;
mod models;
pub mod status;
mod tools;
mod users;

use axum::{middleware, Router};

use crate::middleware::{resolve_session, track_metrics};
use crate::AppState;

/// Build the complete API router.
///
/// Route structure:
/// - /health, /metrics - Health checks (public, no session)
/// - /api/v2/conversations/* - Conversation retrieval
/// - /api/v2/layout, /api/v2/feature-flags - Page-load data
/// - /api/v2/models/* - Model listings
/// - /api/v2/tools/* - Tool counts
/// - /api/v2/user/* - Current user and settings
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Health and status endpoints (public)
        .merge(status::routes())
        // Session-scoped API
        .nest("/api/v2", v2_routes(state))
        .layer(middleware::from_fn(track_metrics))
}

/// Routes that see the visitor's session.
fn v2_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/conversations", conversations::routes(state.clone()))
        .merge(layout::routes())
        .nest("/models", models::routes())
        .nest("/tools", tools::routes())
        .nest("/user", users::routes())
        // Resolve session and user for every route above
        .layer(middleware::from_fn_with_state(state, resolve_session))
}
