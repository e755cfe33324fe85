//! Assistant queries.

use crate::models::{Assistant, ObjectId};
use crate::Result;

use super::documents::{decode, decode_all, encode, placeholders};
use super::DbPool;

/// Insert or replace an assistant document.
pub async fn save_assistant(pool: &DbPool, assistant: &Assistant) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO assistants (id, created_by_id, review, doc)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            created_by_id = excluded.created_by_id,
            review = excluded.review,
            doc = excluded.doc
        "#,
    )
    .bind(assistant.id.to_hex())
    .bind(&assistant.created_by_id)
    .bind(assistant.review.as_str())
    .bind(encode(assistant)?)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get an assistant by id.
pub async fn get_assistant(pool: &DbPool, id: &ObjectId) -> Result<Option<Assistant>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT doc FROM assistants WHERE id = ?")
        .bind(id.to_hex())
        .fetch_optional(pool)
        .await?;

    row.map(|(raw,)| decode(&raw)).transpose()
}

/// Get every assistant whose id is in `ids`. Unknown ids are skipped.
pub async fn find_assistants(pool: &DbPool, ids: &[ObjectId]) -> Result<Vec<Assistant>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let query = format!(
        "SELECT doc FROM assistants WHERE id IN ({}) ORDER BY rowid",
        placeholders(ids.len())
    );
    let mut q = sqlx::query_as::<_, (String,)>(&query);
    for id in ids {
        q = q.bind(id.to_hex());
    }

    decode_all(q.fetch_all(pool).await?)
}
