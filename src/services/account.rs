//! Per-request account views: the user, their settings and feature flags.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::FeatureConfig;
use crate::db::{self, DbPool};
use crate::error::Result;
use crate::models::{ObjectId, Owner, Settings, User};

use super::CatalogService;

/// Public view of the logged-in user.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub id: ObjectId,
    pub username: Option<String>,
    pub avatar_url: Option<String>,
    pub email: Option<String>,
    pub logout_disabled: bool,
    pub is_admin: bool,
    pub is_early_access: bool,
}

impl From<&User> for UserPayload {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            avatar_url: user.avatar_url.clone(),
            email: user.email.clone(),
            logout_disabled: user.logout_disabled,
            is_admin: user.is_admin,
            is_early_access: user.is_early_access,
        }
    }
}

/// Settings with defaults filled in for owners who never saved any.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsPayload {
    pub ethics_modal_accepted: bool,
    pub ethics_modal_accepted_at: Option<DateTime<Utc>>,
    pub active_model: String,
    pub hide_emoji_on_sidebar: bool,
    pub share_conversations_with_model_authors: bool,
    pub custom_prompts: BTreeMap<String, String>,
    pub assistants: Vec<ObjectId>,
    pub tools: Vec<String>,
    pub disable_stream: bool,
    pub direct_paste: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureFlags {
    #[serde(rename = "searchEnabled")]
    pub search_enabled: bool,
    #[serde(rename = "enableAssistants")]
    pub enable_assistants: bool,
    #[serde(rename = "enableAssistantsRAG")]
    pub enable_assistants_rag: bool,
    #[serde(rename = "enableCommunityTools")]
    pub enable_community_tools: bool,
    #[serde(rename = "loginEnabled")]
    pub login_enabled: bool,
    #[serde(rename = "loginRequired")]
    pub login_required: bool,
    #[serde(rename = "guestMode")]
    pub guest_mode: bool,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

#[derive(Clone)]
pub struct AccountService {
    db: DbPool,
    catalog: CatalogService,
    features: FeatureConfig,
}

impl AccountService {
    pub fn new(db: DbPool, catalog: CatalogService, features: FeatureConfig) -> Self {
        Self {
            db,
            catalog,
            features,
        }
    }

    pub async fn find_settings(&self, owner: &Owner) -> Result<Option<Settings>> {
        db::find_settings(&self.db, owner).await
    }

    /// Merge stored settings over the defaults.
    pub fn settings_payload(&self, settings: Option<&Settings>) -> SettingsPayload {
        match settings {
            Some(s) => SettingsPayload {
                ethics_modal_accepted: s.ethics_modal_accepted_at.is_some(),
                ethics_modal_accepted_at: s.ethics_modal_accepted_at,
                active_model: if s.active_model.is_empty() {
                    self.catalog.default_model().id.clone()
                } else {
                    s.active_model.clone()
                },
                hide_emoji_on_sidebar: s.hide_emoji_on_sidebar,
                share_conversations_with_model_authors: s.share_conversations_with_model_authors,
                custom_prompts: s.custom_prompts.clone(),
                assistants: s.assistants.clone(),
                tools: s.tools.clone(),
                disable_stream: s.disable_stream,
                direct_paste: s.direct_paste,
            },
            None => SettingsPayload {
                ethics_modal_accepted: false,
                ethics_modal_accepted_at: None,
                active_model: self.catalog.default_model().id.clone(),
                hide_emoji_on_sidebar: false,
                share_conversations_with_model_authors: self
                    .features
                    .share_conversations_with_model_authors,
                custom_prompts: BTreeMap::new(),
                assistants: Vec::new(),
                tools: Vec::new(),
                disable_stream: false,
                direct_paste: false,
            },
        }
    }

    pub fn feature_flags(&self, is_admin: bool) -> FeatureFlags {
        let f = &self.features;
        FeatureFlags {
            search_enabled: f.search_enabled,
            enable_assistants: f.enable_assistants,
            enable_assistants_rag: f.enable_assistants_rag,
            enable_community_tools: f.community_tools,
            login_enabled: f.login_enabled,
            login_required: f.automatic_login
                || (f.login_enabled && f.messages_before_login == 0),
            guest_mode: f.login_enabled && f.messages_before_login > 0,
            is_admin,
        }
    }
}
