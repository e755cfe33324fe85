//! Application state for the chat API.
//!
//! Contains the shared state that is passed to all handlers.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::config::Config;
use crate::db::DbPool;
use crate::services::{
    AccountService, CatalogService, ConversationService, LayoutService, ToolUsageTracker,
};
use crate::Result;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: DbPool,
    /// Process configuration.
    pub config: Arc<Config>,
    /// Configured models and tools.
    pub catalog: CatalogService,
    /// Recent tool latencies.
    pub tool_usage: ToolUsageTracker,
    /// Conversation resolution and listing.
    pub conversations: ConversationService,
    /// User, settings and feature flag views.
    pub account: AccountService,
    /// Sidebar aggregation.
    pub layout: LayoutService,
    /// Renders `/metrics`. Absent when no recorder was installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Open the database, apply the schema and wire up every service.
    pub async fn new(config: Config, prometheus: Option<PrometheusHandle>) -> Result<Self> {
        let db = crate::db::init_pool(&config.database.path).await?;
        crate::db::initialize_schema(&db).await?;

        Ok(Self::with_pool(db, config, prometheus))
    }

    /// Wire up services over an existing, initialized pool.
    pub fn with_pool(db: DbPool, config: Config, prometheus: Option<PrometheusHandle>) -> Self {
        let catalog = CatalogService::new(config.catalog.clone());
        let tool_usage = ToolUsageTracker::new();
        let conversations = ConversationService::new(db.clone(), catalog.clone());
        let account = AccountService::new(db.clone(), catalog.clone(), config.features.clone());
        let layout = LayoutService::new(
            db.clone(),
            catalog.clone(),
            tool_usage.clone(),
            conversations.clone(),
            account.clone(),
        );

        Self {
            db,
            config: Arc::new(config),
            catalog,
            tool_usage,
            conversations,
            account,
            layout,
            prometheus,
        }
    }
}
