//! Configured models, retired models and config tools.

use std::sync::Arc;

use crate::config::CatalogConfig;
use crate::models::{ChatModel, OldModel, Tool};

/// Read-only view over the catalog from configuration.
#[derive(Clone)]
pub struct CatalogService {
    inner: Arc<CatalogConfig>,
}

impl CatalogService {
    pub fn new(catalog: CatalogConfig) -> Self {
        Self {
            inner: Arc::new(catalog),
        }
    }

    /// All models, listed or not.
    pub fn models(&self) -> &[ChatModel] {
        self.inner.models()
    }

    /// Models shown to clients.
    pub fn listed_models(&self) -> impl Iterator<Item = &ChatModel> {
        self.inner.models().iter().filter(|m| !m.unlisted)
    }

    pub fn old_models(&self) -> &[OldModel] {
        self.inner.old_models()
    }

    /// The first configured model.
    pub fn default_model(&self) -> &ChatModel {
        self.inner.default_model()
    }

    pub fn find_model(&self, id: &str) -> Option<&ChatModel> {
        self.inner.models().iter().find(|m| m.id == id)
    }

    /// Whether the model with this id may call tools. Unknown ids cannot.
    pub fn model_supports_tools(&self, id: &str) -> bool {
        self.find_model(id).map(|m| m.tools).unwrap_or(false)
    }

    pub fn config_tools(&self) -> &[Tool] {
        self.inner.tools()
    }

    pub fn is_config_tool(&self, id: &str) -> bool {
        self.inner.tools().iter().any(|t| t.id.to_hex() == id)
    }
}
