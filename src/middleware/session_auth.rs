//! Session resolution middleware.
//!
//! Every visitor gets a session, logged in or not.
//!
//! # Session Flow
//!
//! 1. The browser presents the session cookie; a visitor without one gets a
//!    fresh random secret in a new cookie
//! 2. The session id is the sha256 hex of that secret, so the raw cookie
//!    value never reaches the database
//! 3. A stored, unexpired login session with that id attaches its user
//! 4. Handlers read the result as [`Locals`]

use axum::{
    body::Body,
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::config::SessionConfig;
use crate::db;
use crate::error::Error;
use crate::models::{Owner, User};
use crate::AppState;

/// Request-scoped identity injected by [`resolve_session`].
#[derive(Clone, Debug)]
pub struct Locals {
    /// sha256 hex of the cookie secret.
    pub session_id: String,
    pub user: Option<User>,
    pub is_admin: bool,
}

impl Locals {
    #[cfg(test)]
    pub fn anonymous(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            user: None,
            is_admin: false,
        }
    }

    /// The owner condition applied to owned-record queries.
    pub fn owner(&self) -> Owner {
        match &self.user {
            Some(user) => Owner::User(user.id),
            None => Owner::Session(self.session_id.clone()),
        }
    }

    /// Compared against `createdById` of assistants and tools.
    pub fn owner_key(&self) -> String {
        self.owner().key()
    }
}

/// Hash a cookie secret into a session id.
pub fn session_id_from_secret(secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

fn session_cookie(config: &SessionConfig, secret: String) -> Cookie<'static> {
    Cookie::build((config.cookie_name.clone(), secret))
        .path("/")
        .http_only(true)
        .secure(config.secure)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(config.max_age_seconds as i64))
        .build()
}

/// Middleware that resolves the visitor's session and user.
///
/// Injects [`Locals`] into request extensions. Sets the session cookie when
/// the request carried none.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, middleware};
/// use chat_api::middleware::resolve_session;
///
/// let app = Router::new()
///     .route("/user", get(get_user))
///     .layer(middleware::from_fn_with_state(state.clone(), resolve_session));
/// ```
pub async fn resolve_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Error> {
    let session_config = &state.config.session;

    let (secret, new_cookie) = match jar.get(&session_config.cookie_name) {
        Some(cookie) if !cookie.value().is_empty() => (cookie.value().to_string(), None),
        _ => {
            let secret = uuid::Uuid::new_v4().to_string();
            let cookie = session_cookie(session_config, secret.clone());
            (secret, Some(cookie))
        }
    };

    let session_id = session_id_from_secret(&secret);
    let user = find_session_user(&state, &session_id).await?;

    let locals = Locals {
        is_admin: user.as_ref().is_some_and(|u| u.is_admin),
        session_id,
        user,
    };

    debug!(
        session_id = %locals.session_id,
        user_id = ?locals.user.as_ref().map(|u| u.id.to_hex()),
        new_session = new_cookie.is_some(),
        "Session resolved"
    );

    req.extensions_mut().insert(locals);
    let response = next.run(req).await;

    Ok(match new_cookie {
        Some(cookie) => (jar.add(cookie), response).into_response(),
        None => response,
    })
}

/// User bound to a live login session, if any.
async fn find_session_user(state: &AppState, session_id: &str) -> Result<Option<User>, Error> {
    let Some(session) = db::find_session(&state.db, session_id).await? else {
        return Ok(None);
    };

    if session.is_expired() {
        debug!(session_id = %session_id, "Ignoring expired session");
        return Ok(None);
    }

    db::get_user(&state.db, &session.user_id).await
}
