//! Sidebar aggregation.
//!
//! Everything the web client needs on page load, in one payload:
//! conversation summaries, models, tools, assistants, the user, their
//! settings and the feature flags.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::db::{self, DbPool};
use crate::error::Result;
use crate::models::{
    Assistant, ChatModel, ObjectId, OldModel, Owner, Settings, Tool, ToolColor, ToolIcon, ToolType,
    User,
};

use super::{
    AccountService, CatalogService, ConversationListItem, ConversationService, FeatureFlags,
    SettingsPayload, ToolUsageTracker, UserPayload,
};

static EMOJI: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{Emoji}").expect("valid emoji regex"));

/// Sidebar entry for one conversation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SidebarConversation {
    pub id: String,
    pub title: String,
    pub model: String,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assistant_id: Option<ObjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

/// Tool as offered to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSummary {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(rename = "type")]
    pub tool_type: ToolType,
    pub display_name: String,
    pub name: String,
    pub description: String,
    pub mime_types: Vec<String>,
    pub is_on_by_default: bool,
    pub is_locked: bool,
    #[serde(rename = "timeToUseMS")]
    pub time_to_use_ms: f64,
    pub color: ToolColor,
    pub icon: ToolIcon,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPayload {
    pub n_conversations: i64,
    pub conversations: Vec<SidebarConversation>,
    pub models: Vec<ChatModel>,
    pub old_models: Vec<OldModel>,
    pub tools: Vec<ToolSummary>,
    pub community_tool_count: i64,
    /// Assistant documents without `createdById`, plus `createdByMe`.
    pub assistants: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assistant: Option<Assistant>,
    pub user: Option<UserPayload>,
    pub settings: SettingsPayload,
    #[serde(flatten)]
    pub flags: FeatureFlags,
}

/// Remove emoji (when asked) and U+FFFD, then leading whitespace and BOMs.
pub fn sanitize_title(title: &str, hide_emoji: bool) -> String {
    let title = if hide_emoji {
        EMOJI.replace_all(title, "").into_owned()
    } else {
        title.to_string()
    };
    title
        .replace('\u{FFFD}', "")
        .trim_start_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
        .to_string()
}

#[derive(Clone)]
pub struct LayoutService {
    db: DbPool,
    catalog: CatalogService,
    tool_usage: ToolUsageTracker,
    conversations: ConversationService,
    account: AccountService,
}

impl LayoutService {
    pub fn new(
        db: DbPool,
        catalog: CatalogService,
        tool_usage: ToolUsageTracker,
        conversations: ConversationService,
        account: AccountService,
    ) -> Self {
        Self {
            db,
            catalog,
            tool_usage,
            conversations,
            account,
        }
    }

    /// Assemble the sidebar payload for an owner.
    pub async fn load(&self, owner: &Owner, user: Option<&User>) -> Result<LayoutPayload> {
        let (settings, n_conversations, community_tool_count) = futures::try_join!(
            self.account.find_settings(owner),
            self.conversations.count(owner),
            db::count_approved_community_tools(&self.db),
        )?;

        let conversations = if n_conversations > 0 {
            let hide_emoji = settings.as_ref().is_some_and(|s| s.hide_emoji_on_sidebar);
            self.sidebar_conversations(owner, hide_emoji).await?
        } else {
            Vec::new()
        };

        let assistant = self.active_assistant(settings.as_ref()).await?;
        let tools = self.tools(settings.as_ref(), assistant.as_ref()).await?;
        let assistants = self.assistants(settings.as_ref(), &owner.key()).await?;

        debug!(
            owner = %owner.key(),
            n_conversations,
            tools = tools.len(),
            assistants = assistants.len(),
            "Loaded layout"
        );

        Ok(LayoutPayload {
            n_conversations,
            conversations,
            models: self.catalog.listed_models().cloned().collect(),
            old_models: self.catalog.old_models().to_vec(),
            tools,
            community_tool_count,
            assistants,
            assistant,
            user: user.map(UserPayload::from),
            settings: self.account.settings_payload(settings.as_ref()),
            flags: self
                .account
                .feature_flags(user.is_some_and(|u| u.is_admin)),
        })
    }

    async fn sidebar_conversations(
        &self,
        owner: &Owner,
        hide_emoji: bool,
    ) -> Result<Vec<SidebarConversation>> {
        let items = self.conversations.list(owner, 0).await?;

        let mut assistant_ids: Vec<ObjectId> =
            items.iter().filter_map(|c| c.assistant_id).collect();
        assistant_ids.sort();
        assistant_ids.dedup();
        let avatars: HashMap<ObjectId, String> = db::find_assistants(&self.db, &assistant_ids)
            .await?
            .into_iter()
            .filter_map(|a| a.avatar_url().map(|url| (a.id, url)))
            .collect();

        let default_model = &self.catalog.default_model().id;
        Ok(items
            .into_iter()
            .map(|item: ConversationListItem| SidebarConversation {
                id: item.id.to_hex(),
                title: sanitize_title(&item.title, hide_emoji),
                model: item.model.unwrap_or_else(|| default_model.clone()),
                updated_at: item.updated_at,
                avatar_url: item.assistant_id.and_then(|id| avatars.get(&id).cloned()),
                assistant_id: item.assistant_id,
            })
            .collect())
    }

    /// The assistant named by `activeModel`, when it is not a model id.
    async fn active_assistant(&self, settings: Option<&Settings>) -> Result<Option<Assistant>> {
        let Some(active) = settings.map(|s| s.active_model.as_str()) else {
            return Ok(None);
        };
        if self.catalog.find_model(active).is_some() {
            return Ok(None);
        }
        match ObjectId::parse_str(active) {
            Ok(id) => db::get_assistant(&self.db, &id).await,
            Err(_) => Ok(None),
        }
    }

    async fn tools(
        &self,
        settings: Option<&Settings>,
        assistant: Option<&Assistant>,
    ) -> Result<Vec<ToolSummary>> {
        let community_ids: Vec<ObjectId> = settings
            .map(|s| s.tools.as_slice())
            .unwrap_or_default()
            .iter()
            .filter(|id| !self.catalog.is_config_tool(id))
            .chain(assistant.map(|a| a.tools.as_slice()).unwrap_or_default())
            .filter_map(|id| ObjectId::parse_str(id).ok())
            .collect();

        let community = db::find_tools(&self.db, &community_ids)
            .await?
            .into_iter()
            .map(|tool| Tool {
                is_hidden: Some(false),
                is_on_by_default: Some(true),
                is_locked: Some(true),
                ..tool
            });

        Ok(self
            .catalog
            .config_tools()
            .iter()
            .cloned()
            .chain(community)
            .filter(|tool| !tool.is_hidden.unwrap_or(false))
            .map(|tool| self.summarize(tool))
            .collect())
    }

    fn summarize(&self, tool: Tool) -> ToolSummary {
        ToolSummary {
            mime_types: tool.mime_types(),
            time_to_use_ms: self.tool_usage.time_to_use_ms(&tool.id.to_hex()),
            id: tool.id,
            tool_type: tool.tool_type,
            display_name: tool.display_name,
            name: tool.name,
            description: tool.description,
            is_on_by_default: tool.is_on_by_default.unwrap_or(true),
            is_locked: tool.is_locked.unwrap_or(true),
            color: tool.color,
            icon: tool.icon,
        }
    }

    async fn assistants(&self, settings: Option<&Settings>, owner_key: &str) -> Result<Vec<Value>> {
        let ids = settings.map(|s| s.assistants.as_slice()).unwrap_or_default();

        db::find_assistants(&self.db, ids)
            .await?
            .into_iter()
            .map(|assistant| -> Result<Value> {
                let created_by_me = assistant.created_by_id == owner_key;
                let mut value = serde_json::to_value(&assistant)?;
                if let Value::Object(map) = &mut value {
                    map.remove("createdById");
                    map.insert("createdByMe".to_string(), Value::Bool(created_by_me));
                }
                Ok(value)
            })
            .collect()
    }
}
