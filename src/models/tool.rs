//! Tool definitions, both config-declared and community-created.

use serde::{Deserialize, Serialize};

use super::{ObjectId, ReviewStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolType {
    Config,
    Community,
}

impl ToolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Config => "config",
            Self::Community => "community",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolParamType {
    Required,
    Optional,
    Fixed,
}

/// Value kind of a tool input. File inputs declare the mime types they take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolInputKind {
    Str,
    Int,
    Float,
    Bool,
    File {
        #[serde(rename = "mimeTypes", default)]
        mime_types: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInput {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub param_type: ToolParamType,
    #[serde(flatten)]
    pub kind: ToolInputKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolColor {
    #[default]
    Purple,
    Blue,
    Green,
    Yellow,
    Red,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolIcon {
    Wikis,
    #[default]
    Tools,
    Camera,
    Code,
    Email,
    Cloud,
    Terminal,
    Game,
    Chat,
    Speaker,
    Video,
}

/// A callable tool.
///
/// Config tools come from server configuration and may set the
/// `is_on_by_default` / `is_locked` / `is_hidden` flags. Community tools are
/// stored in the database with a creator and a review status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(rename = "type")]
    pub tool_type: ToolType,
    pub display_name: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub inputs: Vec<ToolInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_component: Option<String>,
    #[serde(default)]
    pub show_output: bool,
    #[serde(default)]
    pub color: ToolColor,
    #[serde(default)]
    pub icon: ToolIcon,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_on_by_default: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_locked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_hidden: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by_name: Option<String>,
    #[serde(default)]
    pub review: ReviewStatus,
    #[serde(default)]
    pub use_count: u64,
}

impl Tool {
    pub fn community(
        created_by_id: impl Into<String>,
        name: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            id: ObjectId::new(),
            tool_type: ToolType::Community,
            display_name: display_name.into(),
            name: name.into(),
            description: String::new(),
            endpoint: None,
            inputs: Vec::new(),
            output_component: None,
            show_output: false,
            color: ToolColor::default(),
            icon: ToolIcon::default(),
            is_on_by_default: None,
            is_locked: None,
            is_hidden: None,
            created_by_id: Some(created_by_id.into()),
            created_by_name: None,
            review: ReviewStatus::Private,
            use_count: 0,
        }
    }

    /// Mime types accepted across all file inputs, in declaration order.
    pub fn mime_types(&self) -> Vec<String> {
        self.inputs
            .iter()
            .filter_map(|input| match &input.kind {
                ToolInputKind::File { mime_types } => Some(mime_types.iter().cloned()),
                _ => None,
            })
            .flatten()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_tool_declaration_decodes() {
        let tool: Tool = serde_json::from_value(serde_json::json!({
            "_id": "000000000000000000000001",
            "type": "config",
            "displayName": "Image generation",
            "name": "image_generation",
            "description": "Generate images",
            "inputs": [
                {"name": "prompt", "paramType": "required", "type": "str"},
                {"name": "image", "paramType": "optional", "type": "file", "mimeTypes": ["image/png", "image/jpeg"]},
                {"name": "mask", "paramType": "optional", "type": "file", "mimeTypes": ["image/webp"]}
            ],
            "isOnByDefault": false,
            "color": "green",
            "icon": "camera"
        }))
        .unwrap();

        assert_eq!(tool.tool_type, ToolType::Config);
        assert_eq!(tool.is_on_by_default, Some(false));
        assert!(tool.is_locked.is_none());
        assert_eq!(tool.icon, ToolIcon::Camera);
        assert_eq!(tool.mime_types(), vec!["image/png", "image/jpeg", "image/webp"]);
    }

    #[test]
    fn test_tool_without_file_inputs_has_no_mime_types() {
        let tool = Tool::community("sess", "calc", "Calculator");
        assert!(tool.mime_types().is_empty());
    }
}
