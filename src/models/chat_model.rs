//! Chat model declarations from configuration.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sampling parameters forwarded to the inference endpoint.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModelParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub truncate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_new_tokens: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repetition_penalty: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptExample {
    pub title: String,
    pub prompt: String,
}

/// A model as declared in configuration. Only `name` is required.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatModelDeclaration {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub model_url: Option<String>,
    /// Either a tokenizer repository name or an inline tokenizer object.
    #[serde(default)]
    pub tokenizer: Option<Value>,
    #[serde(default)]
    pub dataset_name: Option<String>,
    #[serde(default)]
    pub dataset_url: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub prompt_examples: Option<Vec<PromptExample>>,
    #[serde(default)]
    pub parameters: ModelParameters,
    #[serde(default)]
    pub preprompt: Option<String>,
    #[serde(default)]
    pub multimodal: bool,
    #[serde(default)]
    pub multimodal_accepted_mimetypes: Option<Vec<String>>,
    #[serde(default)]
    pub tools: bool,
    #[serde(default)]
    pub unlisted: bool,
    #[serde(default, rename = "hasInferenceAPI")]
    pub has_inference_api: bool,
}

/// A model with every default resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatModel {
    pub id: String,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    pub website_url: Option<String>,
    pub model_url: Option<String>,
    pub tokenizer: Option<Value>,
    pub dataset_name: Option<String>,
    pub dataset_url: Option<String>,
    pub logo_url: Option<String>,
    pub prompt_examples: Option<Vec<PromptExample>>,
    pub parameters: ModelParameters,
    pub preprompt: String,
    pub multimodal: bool,
    pub multimodal_accepted_mimetypes: Option<Vec<String>>,
    pub tools: bool,
    pub unlisted: bool,
    #[serde(rename = "hasInferenceAPI")]
    pub has_inference_api: bool,
}

impl From<ChatModelDeclaration> for ChatModel {
    fn from(decl: ChatModelDeclaration) -> Self {
        Self {
            id: decl.id.unwrap_or_else(|| decl.name.clone()),
            display_name: decl.display_name.unwrap_or_else(|| decl.name.clone()),
            name: decl.name,
            description: decl.description,
            website_url: decl.website_url,
            model_url: decl.model_url,
            tokenizer: decl.tokenizer,
            dataset_name: decl.dataset_name,
            dataset_url: decl.dataset_url,
            logo_url: decl.logo_url,
            prompt_examples: decl.prompt_examples,
            parameters: decl.parameters,
            preprompt: decl.preprompt.unwrap_or_default(),
            multimodal: decl.multimodal,
            multimodal_accepted_mimetypes: decl.multimodal_accepted_mimetypes,
            tools: decl.tools,
            unlisted: decl.unlisted,
            has_inference_api: decl.has_inference_api,
        }
    }
}

/// A retired model, optionally redirecting to a replacement.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OldModelDeclaration {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub transfer_to: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OldModel {
    pub id: String,
    pub name: String,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_to: Option<String>,
}

impl From<OldModelDeclaration> for OldModel {
    fn from(decl: OldModelDeclaration) -> Self {
        Self {
            id: decl.id.unwrap_or_else(|| decl.name.clone()),
            display_name: decl.display_name.unwrap_or_else(|| decl.name.clone()),
            name: decl.name,
            transfer_to: decl.transfer_to,
        }
    }
}
