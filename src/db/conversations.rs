//! Conversation and shared conversation queries.

use crate::models::{Conversation, ObjectId, Owner, SharedConversation};
use crate::Result;

use super::documents::{decode, decode_all, encode, owner_filter, sort_key};
use super::DbPool;

// ============================================================================
// Conversations
// ============================================================================

/// Insert or replace a conversation document.
pub async fn save_conversation(pool: &DbPool, conversation: &Conversation) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO conversations (id, user_id, session_id, assistant_id, updated_at, doc)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            user_id = excluded.user_id,
            session_id = excluded.session_id,
            assistant_id = excluded.assistant_id,
            updated_at = excluded.updated_at,
            doc = excluded.doc
        "#,
    )
    .bind(conversation.id.to_hex())
    .bind(conversation.user_id.map(|id| id.to_hex()))
    .bind(&conversation.session_id)
    .bind(conversation.assistant_id.map(|id| id.to_hex()))
    .bind(sort_key(&conversation.updated_at))
    .bind(encode(conversation)?)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get a conversation by id, only if it belongs to `owner`.
pub async fn find_owned_conversation(
    pool: &DbPool,
    id: &ObjectId,
    owner: &Owner,
) -> Result<Option<Conversation>> {
    let (column, value) = owner_filter(owner);
    let query = format!("SELECT doc FROM conversations WHERE id = ? AND {} = ?", column);

    let row: Option<(String,)> = sqlx::query_as(&query)
        .bind(id.to_hex())
        .bind(value)
        .fetch_optional(pool)
        .await?;

    row.map(|(raw,)| decode(&raw)).transpose()
}

/// Whether a conversation with this id exists for anyone.
pub async fn conversation_exists(pool: &DbPool, id: &ObjectId) -> Result<bool> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM conversations WHERE id = ?")
        .bind(id.to_hex())
        .fetch_one(pool)
        .await?;

    Ok(count != 0)
}

/// Count the conversations belonging to `owner`.
pub async fn count_conversations(pool: &DbPool, owner: &Owner) -> Result<i64> {
    let (column, value) = owner_filter(owner);
    let query = format!("SELECT COUNT(*) FROM conversations WHERE {} = ?", column);

    let (count,): (i64,) = sqlx::query_as(&query).bind(value).fetch_one(pool).await?;

    Ok(count)
}

/// List an owner's conversations, most recently updated first.
pub async fn list_conversations(
    pool: &DbPool,
    owner: &Owner,
    limit: i64,
    offset: i64,
) -> Result<Vec<Conversation>> {
    let (column, value) = owner_filter(owner);
    let query = format!(
        "SELECT doc FROM conversations WHERE {} = ? ORDER BY updated_at DESC, id DESC LIMIT ? OFFSET ?",
        column
    );

    let rows: Vec<(String,)> = sqlx::query_as(&query)
        .bind(value)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;

    decode_all(rows)
}

// ============================================================================
// Shared conversations
// ============================================================================

/// Insert or replace a shared conversation snapshot.
pub async fn save_shared_conversation(pool: &DbPool, shared: &SharedConversation) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO shared_conversations (id, hash, doc)
        VALUES (?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET hash = excluded.hash, doc = excluded.doc
        "#,
    )
    .bind(&shared.id)
    .bind(&shared.hash)
    .bind(encode(shared)?)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get a shared conversation by its public id.
pub async fn get_shared_conversation(pool: &DbPool, id: &str) -> Result<Option<SharedConversation>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT doc FROM shared_conversations WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    row.map(|(raw,)| decode(&raw)).transpose()
}
