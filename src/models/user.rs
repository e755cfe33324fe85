//! Users and their login sessions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ObjectId;

/// A logged-in user. Created by the login flow, read here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub hf_user_id: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_early_access: bool,
    /// Set for users provisioned by a trusted upstream that owns logout.
    #[serde(default)]
    pub logout_disabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(name: impl Into<String>) -> Self {
        let ts = super::now();
        Self {
            id: ObjectId::new(),
            username: None,
            name: name.into(),
            email: None,
            avatar_url: None,
            hf_user_id: String::new(),
            is_admin: false,
            is_early_access: false,
            logout_disabled: false,
            created_at: ts,
            updated_at: ts,
        }
    }
}

/// Binds a hashed browser session id to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// sha256 hex of the cookie secret.
    pub session_id: String,
    pub user_id: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn new(session_id: impl Into<String>, user_id: ObjectId, ttl: chrono::Duration) -> Self {
        let ts = super::now();
        Self {
            id: ObjectId::new(),
            session_id: session_id.into(),
            user_id,
            user_agent: None,
            ip: None,
            expires_at: ts + ttl,
            created_at: ts,
            updated_at: ts,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}
