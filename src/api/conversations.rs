//! Conversation Routes
//!
//! Routes:
//! - GET /conversations - List the caller's conversations
//! - POST /conversations - Create a conversation (not implemented)
//! - GET /conversations/:id - Get a conversation
//! - POST /conversations/:id - Post a message (not implemented)
//! - GET /conversations/:id/output/:sha256 - Download a generated file (not implemented)
//! - POST /conversations/:id/share - Share a conversation (not implemented)
//! - POST /conversations/:id/stop-generating - Stop generation (not implemented)
//! - GET|DELETE /conversations/:id/messages/:message_id - Read or delete a message (not implemented)
//! - GET /conversations/:id/messages/:message_id/prompt - Rendered prompt (not implemented)
//! - POST /conversations/:id/messages/:message_id/vote - Vote on a message (not implemented)
//!
//! Every `/:id` route resolves the conversation first, so access errors win
//! over "not implemented".

use axum::{
    extract::{Query, State},
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;

use crate::{
    error::{Error, Result},
    middleware::{require_conversation_access, Locals},
    services::{ConversationListItem, ConversationPayload, ResolvedConversation},
    AppState,
};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing conversations.
#[derive(Debug, Deserialize, Default)]
pub struct ListConversationsQuery {
    #[serde(default)]
    pub p: u32,
}

// ============================================================================
// Routes
// ============================================================================

pub fn routes(state: AppState) -> Router<AppState> {
    let by_id = Router::new()
        .route("/:id", get(get_conversation).post(post_message))
        .route("/:id/output/:sha256", get(get_output))
        .route("/:id/share", post(share_conversation))
        .route("/:id/stop-generating", post(stop_generating))
        .route(
            "/:id/messages/:message_id",
            get(get_message).delete(delete_message),
        )
        .route("/:id/messages/:message_id/prompt", get(get_prompt))
        .route("/:id/messages/:message_id/vote", post(vote_message))
        .route_layer(middleware::from_fn_with_state(
            state,
            require_conversation_access,
        ));

    Router::new()
        .route("/", get(list_conversations).post(create_conversation))
        .merge(by_id)
}

// ============================================================================
// Handlers
// ============================================================================

/// List the caller's conversations.
///
/// GET /conversations?p=0
async fn list_conversations(
    State(state): State<AppState>,
    Extension(locals): Extension<Locals>,
    Query(query): Query<ListConversationsQuery>,
) -> Result<Json<Vec<ConversationListItem>>> {
    let items = state.conversations.list(&locals.owner(), query.p).await?;
    Ok(Json(items))
}

/// Get a conversation with its message tree.
///
/// GET /conversations/:id
async fn get_conversation(
    State(state): State<AppState>,
    Extension(conversation): Extension<ResolvedConversation>,
) -> Result<Json<ConversationPayload>> {
    let payload = state.conversations.payload(conversation).await?;
    Ok(Json(payload))
}

async fn create_conversation() -> Result<Json<()>> {
    Err(not_implemented("create conversation"))
}

async fn post_message() -> Result<Json<()>> {
    Err(not_implemented("post message"))
}

async fn get_output() -> Result<Json<()>> {
    Err(not_implemented("conversation output"))
}

async fn share_conversation() -> Result<Json<()>> {
    Err(not_implemented("share conversation"))
}

async fn stop_generating() -> Result<Json<()>> {
    Err(not_implemented("stop generating"))
}

async fn get_message() -> Result<Json<()>> {
    Err(not_implemented("get message"))
}

async fn delete_message() -> Result<Json<()>> {
    Err(not_implemented("delete message"))
}

async fn get_prompt() -> Result<Json<()>> {
    Err(not_implemented("message prompt"))
}

async fn vote_message() -> Result<Json<()>> {
    Err(not_implemented("vote on message"))
}

fn not_implemented(what: &str) -> Error {
    Error::NotImplemented(what.to_string())
}
