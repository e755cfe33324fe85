//! Settings queries. At most one settings document per owner.

use crate::models::{Owner, Settings};
use crate::Result;

use super::documents::{decode, encode, owner_filter};
use super::DbPool;

/// Insert or replace an owner's settings document.
pub async fn save_settings(pool: &DbPool, settings: &Settings) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO settings (id, user_id, session_id, doc)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            user_id = excluded.user_id,
            session_id = excluded.session_id,
            doc = excluded.doc
        "#,
    )
    .bind(settings.id.to_hex())
    .bind(settings.user_id.map(|id| id.to_hex()))
    .bind(&settings.session_id)
    .bind(encode(settings)?)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get the settings document belonging to `owner`, if one was saved.
pub async fn find_settings(pool: &DbPool, owner: &Owner) -> Result<Option<Settings>> {
    let (column, value) = owner_filter(owner);
    let query = format!("SELECT doc FROM settings WHERE {} = ?", column);

    let row: Option<(String,)> = sqlx::query_as(&query)
        .bind(value)
        .fetch_optional(pool)
        .await?;

    row.map(|(raw,)| decode(&raw)).transpose()
}
