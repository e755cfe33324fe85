//! Community tool queries.

use crate::models::{ObjectId, ReviewStatus, Tool, ToolType};
use crate::Result;

use super::documents::{decode_all, encode, placeholders};
use super::DbPool;

/// Insert or replace a tool document.
pub async fn save_tool(pool: &DbPool, tool: &Tool) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO tools (id, type, review, doc)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            type = excluded.type,
            review = excluded.review,
            doc = excluded.doc
        "#,
    )
    .bind(tool.id.to_hex())
    .bind(tool.tool_type.as_str())
    .bind(tool.review.as_str())
    .bind(encode(tool)?)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get every tool whose id is in `ids`, in insertion order.
pub async fn find_tools(pool: &DbPool, ids: &[ObjectId]) -> Result<Vec<Tool>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let query = format!(
        "SELECT doc FROM tools WHERE id IN ({}) ORDER BY rowid",
        placeholders(ids.len())
    );
    let mut q = sqlx::query_as::<_, (String,)>(&query);
    for id in ids {
        q = q.bind(id.to_hex());
    }

    decode_all(q.fetch_all(pool).await?)
}

/// Count community tools that passed review.
pub async fn count_approved_community_tools(pool: &DbPool) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tools WHERE type = ? AND review = ?")
        .bind(ToolType::Community.as_str())
        .bind(ReviewStatus::Approved.as_str())
        .fetch_one(pool)
        .await?;

    Ok(count)
}
