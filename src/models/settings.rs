//! Per-owner user settings.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ObjectId, Owner};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default = "default_true")]
    pub share_conversations_with_model_authors: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ethics_modal_accepted_at: Option<DateTime<Utc>>,
    /// A configured model id, or an assistant id when an assistant is active.
    #[serde(default)]
    pub active_model: String,
    #[serde(default)]
    pub hide_emoji_on_sidebar: bool,
    /// Model id to custom system prompt.
    #[serde(default)]
    pub custom_prompts: BTreeMap<String, String>,
    #[serde(default)]
    pub assistants: Vec<ObjectId>,
    /// Enabled tool ids, config and community alike.
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub disable_stream: bool,
    #[serde(default)]
    pub direct_paste: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

impl Settings {
    pub fn new(owner: &Owner, active_model: impl Into<String>) -> Self {
        let ts = super::now();
        let (user_id, session_id) = match owner {
            Owner::User(id) => (Some(*id), None),
            Owner::Session(sid) => (None, Some(sid.clone())),
        };
        Self {
            id: ObjectId::new(),
            user_id,
            session_id,
            share_conversations_with_model_authors: true,
            ethics_modal_accepted_at: None,
            active_model: active_model.into(),
            hide_emoji_on_sidebar: false,
            custom_prompts: BTreeMap::new(),
            assistants: Vec::new(),
            tools: Vec::new(),
            disable_stream: false,
            direct_paste: false,
            created_at: ts,
            updated_at: ts,
        }
    }
}
