//! Service layer for the chat API.
//!
//! Contains the logic behind the HTTP handlers:
//! - Catalog (configured models, old models and config tools)
//! - ToolUsage (tool latency tracking)
//! - Conversations (resolution, payloads and listing)
//! - Account (user, settings and feature flag views)
//! - Layout (sidebar aggregation)

mod account;
mod catalog;
mod conversations;
mod layout;
mod tool_usage;

pub use account::{AccountService, FeatureFlags, SettingsPayload, UserPayload};
pub use catalog::CatalogService;
pub use conversations::{
    ConversationListItem, ConversationPayload, ConversationService, ResolvedConversation,
    CONVERSATIONS_PER_PAGE,
};
pub use layout::{sanitize_title, LayoutPayload, LayoutService, SidebarConversation, ToolSummary};
pub use tool_usage::{ToolUsageTracker, DEFAULT_TIME_TO_USE_MS};
