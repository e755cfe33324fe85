//! Conversation-level access control middleware.
//!
//! Resolves the `:id` path parameter of every conversation route before the
//! handler runs, so unknown, malformed and foreign ids are rejected the same
//! way whichever route was hit.

use axum::{
    body::Body,
    extract::{Path, Request, State},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use tracing::debug;

use crate::{error::Error, middleware::Locals, AppState};

/// Extract the conversation id from path parameters.
#[derive(Deserialize)]
pub struct ConversationIdParams {
    id: String,
}

/// Middleware that requires read access to the conversation named by `:id`.
///
/// Must run after `resolve_session`. Injects the
/// [`ResolvedConversation`](crate::services::ResolvedConversation) into
/// request extensions.
///
/// # Errors
///
/// Returns 400 Bad Request if the id is neither a short share id nor an ObjectId.
/// Returns 403 Forbidden if the conversation belongs to someone else.
/// Returns 404 Not Found if no such conversation exists.
pub async fn require_conversation_access(
    State(state): State<AppState>,
    Path(params): Path<ConversationIdParams>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Error> {
    let locals = req
        .extensions()
        .get::<Locals>()
        .cloned()
        .ok_or(Error::Unauthenticated)?;

    let conversation = state
        .conversations
        .resolve(&params.id, &locals.owner())
        .await?;

    debug!(
        conversation_id = %conversation.id,
        shared = conversation.shared,
        "Conversation access granted"
    );

    req.extensions_mut().insert(conversation);
    Ok(next.run(req).await)
}
