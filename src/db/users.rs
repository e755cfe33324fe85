//! User and login session queries.

use crate::models::{ObjectId, Session, User};
use crate::Result;

use super::documents::{decode, encode, sort_key};
use super::DbPool;

/// Insert or replace a user document.
pub async fn save_user(pool: &DbPool, user: &User) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO users (id, doc) VALUES (?, ?)
        ON CONFLICT(id) DO UPDATE SET doc = excluded.doc
        "#,
    )
    .bind(user.id.to_hex())
    .bind(encode(user)?)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get a user by id.
pub async fn get_user(pool: &DbPool, id: &ObjectId) -> Result<Option<User>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT doc FROM users WHERE id = ?")
        .bind(id.to_hex())
        .fetch_optional(pool)
        .await?;

    row.map(|(raw,)| decode(&raw)).transpose()
}

/// Insert or replace a login session.
pub async fn save_session(pool: &DbPool, session: &Session) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO sessions (session_id, user_id, expires_at, doc)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(session_id) DO UPDATE SET
            user_id = excluded.user_id,
            expires_at = excluded.expires_at,
            doc = excluded.doc
        "#,
    )
    .bind(&session.session_id)
    .bind(session.user_id.to_hex())
    .bind(sort_key(&session.expires_at))
    .bind(encode(session)?)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get a login session by hashed session id. Expired sessions are returned
/// as stored; callers decide what expiry means.
pub async fn find_session(pool: &DbPool, session_id: &str) -> Result<Option<Session>> {
    let row: Option<(String,)> = sqlx::query_as("SELECT doc FROM sessions WHERE session_id = ?")
        .bind(session_id)
        .fetch_optional(pool)
        .await?;

    row.map(|(raw,)| decode(&raw)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_pool, initialize_schema};

    #[tokio::test]
    async fn test_session_resolves_to_user() {
        let pool = init_pool(":memory:").await.unwrap();
        initialize_schema(&pool).await.unwrap();

        let user = User::new("Ada");
        save_user(&pool, &user).await.unwrap();
        let session = Session::new("hashed", user.id, chrono::Duration::days(1));
        save_session(&pool, &session).await.unwrap();

        let found = find_session(&pool, "hashed").await.unwrap().unwrap();
        assert_eq!(found.user_id, user.id);
        assert_eq!(get_user(&pool, &found.user_id).await.unwrap(), Some(user));
        assert!(find_session(&pool, "other").await.unwrap().is_none());
    }
}
