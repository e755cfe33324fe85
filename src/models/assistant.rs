//! Assistant documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ObjectId;

/// Moderation state shared by assistants and community tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReviewStatus {
    #[default]
    Private,
    Pending,
    Approved,
    Denied,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "PRIVATE",
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::Denied => "DENIED",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantRag {
    #[serde(default)]
    pub allowed_links: Vec<String>,
    #[serde(default)]
    pub allowed_domains: Vec<String>,
    #[serde(default)]
    pub allow_all_domains: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GenerateSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repetition_penalty: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
}

/// A persona wrapping a model with its own system prompt and tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assistant {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// User id hex for logged-in creators, session id otherwise.
    pub created_by_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by_name: Option<String>,
    /// Content hash of the avatar image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub model_id: String,
    #[serde(default)]
    pub example_inputs: Vec<String>,
    #[serde(default)]
    pub preprompt: String,
    #[serde(default)]
    pub user_count: u64,
    #[serde(default)]
    pub review: ReviewStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rag: Option<AssistantRag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generate_settings: Option<GenerateSettings>,
    #[serde(default)]
    pub dynamic_prompt: bool,
    /// Community tool ids enabled for this assistant.
    #[serde(default)]
    pub tools: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assistant {
    pub fn new(
        created_by_id: impl Into<String>,
        name: impl Into<String>,
        model_id: impl Into<String>,
    ) -> Self {
        let ts = super::now();
        Self {
            id: ObjectId::new(),
            created_by_id: created_by_id.into(),
            created_by_name: None,
            avatar: None,
            name: name.into(),
            description: None,
            model_id: model_id.into(),
            example_inputs: Vec::new(),
            preprompt: String::new(),
            user_count: 0,
            review: ReviewStatus::Private,
            rag: None,
            generate_settings: None,
            dynamic_prompt: false,
            tools: Vec::new(),
            created_at: ts,
            updated_at: ts,
        }
    }

    /// Sidebar avatar path, cache-busted by the avatar hash.
    pub fn avatar_url(&self) -> Option<String> {
        self.avatar
            .as_ref()
            .map(|hash| format!("/settings/assistants/{}/avatar.jpg?hash={}", self.id, hash))
    }
}
