//! Data models for the chat API.
//!
//! Defines the documents stored in the database (conversations,
//! assistants, tools, settings, users) and the configured chat models.

mod assistant;
mod chat_model;
mod conversation;
mod object_id;
mod settings;
mod tool;
mod user;

pub use assistant::*;
pub use chat_model::*;
pub use conversation::*;
pub use object_id::*;
pub use settings::*;
pub use tool::*;
pub use user::*;

use chrono::{DateTime, Utc};

/// Who a record belongs to: a logged-in user or an anonymous browser session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Owner {
    User(ObjectId),
    Session(String),
}

impl Owner {
    /// String compared against `created_by_id` fields.
    pub fn key(&self) -> String {
        match self {
            Owner::User(id) => id.to_hex(),
            Owner::Session(sid) => sid.clone(),
        }
    }
}

/// Current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}
