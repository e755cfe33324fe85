//! Conversation documents and the message tree.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{now, ObjectId, Owner};

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageFrom {
    User,
    Assistant,
    System,
}

/// File attached to a message. `value` is a content hash or inline base64.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageFile {
    #[serde(rename = "type")]
    pub kind: MessageFileKind,
    pub name: String,
    pub value: String,
    pub mime: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageFileKind {
    Hash,
    Base64,
}

/// A single node in a conversation's message tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub from: MessageFrom,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ancestors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<MessageFile>,
    /// Streaming updates recorded during generation, kept opaque.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub updates: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interrupted: Option<bool>,
    /// -1, 0 or 1
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<i8>,
}

impl Message {
    pub fn new(from: MessageFrom, content: impl Into<String>) -> Self {
        let ts = now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            from,
            content: content.into(),
            created_at: Some(ts),
            updated_at: Some(ts),
            ancestors: None,
            children: None,
            files: Vec::new(),
            updates: Vec::new(),
            interrupted: None,
            score: None,
        }
    }
}

/// A conversation owned by a user or an anonymous session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub title: String,
    /// Absent on legacy conversations that predate the message tree.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_message_id: Option<String>,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preprompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant_id: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Fresh, empty conversation for the given owner.
    pub fn new(owner: &Owner, title: impl Into<String>, model: impl Into<String>) -> Self {
        let ts = now();
        let (user_id, session_id) = match owner {
            Owner::User(id) => (Some(*id), None),
            Owner::Session(sid) => (None, Some(sid.clone())),
        };
        Self {
            id: ObjectId::new(),
            user_id,
            session_id,
            title: title.into(),
            root_message_id: None,
            messages: Vec::new(),
            model: Some(model.into()),
            preprompt: None,
            assistant_id: None,
            embedding_model: None,
            user_agent: None,
            created_at: ts,
            updated_at: ts,
        }
    }
}

/// Frozen copy of a conversation published under a short public id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedConversation {
    /// Seven characters.
    #[serde(rename = "_id")]
    pub id: String,
    /// Hash of the source conversation content, used to dedupe shares.
    #[serde(default)]
    pub hash: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_message_id: Option<String>,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preprompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant_id: Option<ObjectId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Length of a shared conversation's public id.
pub const SHARED_ID_LEN: usize = 7;

/// Rebuild a flat legacy message list as a linear tree.
///
/// Returns the inputs untouched when a root already exists or there are no
/// messages. Otherwise a system message carrying the preprompt becomes the
/// root and each message points at all earlier ones as ancestors and at the
/// next one as its only child.
pub fn convert_legacy_messages(
    root_message_id: Option<String>,
    messages: Vec<Message>,
    preprompt: Option<&str>,
) -> (Option<String>, Vec<Message>) {
    if root_message_id.is_some() || messages.is_empty() {
        return (root_message_id, messages);
    }

    let mut all = Vec::with_capacity(messages.len() + 1);
    all.push(Message::new(MessageFrom::System, preprompt.unwrap_or_default()));
    all.extend(messages);

    let ids: Vec<String> = all.iter().map(|m| m.id.clone()).collect();
    let root = ids[0].clone();

    let converted = all
        .into_iter()
        .enumerate()
        .map(|(index, mut message)| {
            message.ancestors = Some(ids[..index].to_vec());
            message.children = Some(ids.get(index + 1).cloned().into_iter().collect());
            message
        })
        .collect();

    (Some(root), converted)
}

impl Conversation {
    pub fn into_converted(mut self) -> Self {
        let messages = std::mem::take(&mut self.messages);
        let (root, messages) = convert_legacy_messages(
            self.root_message_id.take(),
            messages,
            self.preprompt.as_deref(),
        );
        self.root_message_id = root;
        self.messages = messages;
        self
    }
}

impl SharedConversation {
    pub fn into_converted(mut self) -> Self {
        let messages = std::mem::take(&mut self.messages);
        let (root, messages) = convert_legacy_messages(
            self.root_message_id.take(),
            messages,
            self.preprompt.as_deref(),
        );
        self.root_message_id = root;
        self.messages = messages;
        self
    }
}
