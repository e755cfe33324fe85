//! Middleware for the chat API.
//!
//! - `session_auth` - resolves the visitor's session and optional user into [`Locals`]
//! - `conversation_access` - resolves `:id` on conversation routes
//! - `request_metrics` - request counters and latency histograms

mod conversation_access;
mod request_metrics;
mod session_auth;

pub use conversation_access::require_conversation_access;
pub use request_metrics::track_metrics;
pub use session_auth::{resolve_session, session_id_from_secret, Locals};
