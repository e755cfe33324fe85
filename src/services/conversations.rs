//! Conversation resolution and retrieval.
//!
//! Resolution decides, for a path id and an owner, which conversation the
//! request addresses: a shared snapshot (7-character id) or an owned
//! conversation (ObjectId). Every `/conversations/:id` route goes through it.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::db::{self, DbPool};
use crate::error::{Error, Result};
use crate::models::{
    Assistant, Conversation, Message, ObjectId, Owner, SharedConversation, SHARED_ID_LEN,
};

use super::CatalogService;

/// Conversations per list page.
pub const CONVERSATIONS_PER_PAGE: i64 = 300;

const ACCESS_DENIED: &str = "You don't have access to this conversation. If someone gave you this link, ask them to use the 'share' feature instead.";

/// A conversation reachable by the current request, already converted to a
/// message tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConversation {
    /// ObjectId hex for owned conversations, the short id for shared ones.
    pub id: String,
    pub title: String,
    pub root_message_id: Option<String>,
    pub messages: Vec<Message>,
    pub model: Option<String>,
    pub preprompt: Option<String>,
    pub assistant_id: Option<ObjectId>,
    pub updated_at: DateTime<Utc>,
    pub shared: bool,
}

impl From<Conversation> for ResolvedConversation {
    fn from(conv: Conversation) -> Self {
        let conv = conv.into_converted();
        Self {
            id: conv.id.to_hex(),
            title: conv.title,
            root_message_id: conv.root_message_id,
            messages: conv.messages,
            model: conv.model,
            preprompt: conv.preprompt,
            assistant_id: conv.assistant_id,
            updated_at: conv.updated_at,
            shared: false,
        }
    }
}

impl From<SharedConversation> for ResolvedConversation {
    fn from(conv: SharedConversation) -> Self {
        let conv = conv.into_converted();
        Self {
            id: conv.id,
            title: conv.title,
            root_message_id: conv.root_message_id,
            messages: conv.messages,
            model: conv.model,
            preprompt: conv.preprompt,
            assistant_id: conv.assistant_id,
            updated_at: conv.updated_at,
            shared: true,
        }
    }
}

/// Body of `GET /conversations/:id`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationPayload {
    pub messages: Vec<Message>,
    pub title: String,
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preprompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_message_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assistant: Option<Assistant>,
    pub id: String,
    pub updated_at: DateTime<Utc>,
    pub model_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assistant_id: Option<ObjectId>,
    pub model_tools: bool,
    pub shared: bool,
}

/// Entry of `GET /conversations`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationListItem {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub updated_at: DateTime<Utc>,
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assistant_id: Option<ObjectId>,
}

impl From<Conversation> for ConversationListItem {
    fn from(conv: Conversation) -> Self {
        Self {
            id: conv.id,
            title: conv.title,
            updated_at: conv.updated_at,
            model: conv.model,
            assistant_id: conv.assistant_id,
        }
    }
}

/// Service for reading conversations.
#[derive(Clone)]
pub struct ConversationService {
    db: DbPool,
    catalog: CatalogService,
}

impl ConversationService {
    /// Create a new conversation service.
    pub fn new(db: DbPool, catalog: CatalogService) -> Self {
        Self { db, catalog }
    }

    /// Resolve a path id to a conversation the owner may read.
    ///
    /// Short ids address shared snapshots and skip the ownership check.
    /// Anything else must be an ObjectId owned by `owner`; a conversation
    /// that exists under another owner is reported as forbidden.
    pub async fn resolve(&self, id: &str, owner: &Owner) -> Result<ResolvedConversation> {
        if id.chars().count() == SHARED_ID_LEN {
            let shared = db::get_shared_conversation(&self.db, id)
                .await?
                .ok_or_else(|| Error::NotFound("Conversation not found".to_string()))?;
            debug!(conversation_id = %id, "Resolved shared conversation");
            return Ok(shared.into());
        }

        let object_id = ObjectId::parse_str(id)
            .map_err(|_| Error::InvalidInput("Invalid conversation ID format".to_string()))?;

        if let Some(conv) = db::find_owned_conversation(&self.db, &object_id, owner).await? {
            return Ok(conv.into());
        }

        if db::conversation_exists(&self.db, &object_id).await? {
            warn!(
                conversation_id = %object_id,
                owner = %owner.key(),
                "Conversation access denied"
            );
            return Err(Error::Forbidden(ACCESS_DENIED.to_string()));
        }

        Err(Error::NotFound("Conversation not found.".to_string()))
    }

    /// Build the full payload for a resolved conversation.
    pub async fn payload(&self, conv: ResolvedConversation) -> Result<ConversationPayload> {
        let assistant = match &conv.assistant_id {
            Some(id) => db::get_assistant(&self.db, id).await?,
            None => None,
        };
        let model_tools = conv
            .model
            .as_deref()
            .map(|id| self.catalog.model_supports_tools(id))
            .unwrap_or(false);

        Ok(ConversationPayload {
            messages: conv.messages,
            title: conv.title,
            model_id: conv.model.clone(),
            model: conv.model,
            preprompt: conv.preprompt,
            root_message_id: conv.root_message_id,
            assistant,
            id: conv.id,
            updated_at: conv.updated_at,
            assistant_id: conv.assistant_id,
            model_tools,
            shared: conv.shared,
        })
    }

    /// One page of the owner's conversations, most recently updated first.
    pub async fn list(&self, owner: &Owner, page: u32) -> Result<Vec<ConversationListItem>> {
        let offset = i64::from(page) * CONVERSATIONS_PER_PAGE;
        let conversations =
            db::list_conversations(&self.db, owner, CONVERSATIONS_PER_PAGE, offset).await?;
        Ok(conversations.into_iter().map(Into::into).collect())
    }

    /// Number of conversations the owner has.
    pub async fn count(&self, owner: &Owner) -> Result<i64> {
        db::count_conversations(&self.db, owner).await
    }
}
