//! Configuration management for the chat API.
//!
//! Loads configuration from environment variables with support for:
//! - Model, old model and tool catalogs as JSON (`MODELS`, `OLD_MODELS`, `TOOLS`)
//!   or from a TOML catalog file (`CATALOG_PATH`)
//! - Anonymous session cookie settings
//! - Feature flags exposed to the web client

use std::env;
use std::path::Path;
use std::sync::OnceLock;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::models::{ChatModel, ChatModelDeclaration, OldModel, OldModelDeclaration, Tool};
use crate::{Error, Result};

/// Global configuration instance
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Reads one configuration variable.
pub type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

/// Initialize configuration from the environment (call once at startup)
pub fn init() -> Result<&'static Config> {
    if let Some(config) = CONFIG.get() {
        return Ok(config);
    }
    let config = Config::from_env()?;
    Ok(CONFIG.get_or_init(|| config))
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub features: FeatureConfig,
    pub catalog: CatalogConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub path: String,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub secure: bool,
    pub max_age_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "hf-chat".to_string(),
            secure: false,
            max_age_seconds: 60 * 60 * 24 * 14,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeatureConfig {
    pub search_enabled: bool,
    pub enable_assistants: bool,
    pub enable_assistants_rag: bool,
    pub community_tools: bool,
    /// Set when an OpenID client is configured.
    pub login_enabled: bool,
    pub automatic_login: bool,
    pub messages_before_login: u32,
    pub share_conversations_with_model_authors: bool,
}

/// Models and tools the server offers.
///
/// Only [`CatalogConfig::new`] builds one, so the model list is never empty.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    models: Vec<ChatModel>,
    old_models: Vec<OldModel>,
    tools: Vec<Tool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Default)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

/// On-disk catalog layout for `CATALOG_PATH`.
#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    models: Option<Vec<ChatModelDeclaration>>,
    #[serde(default)]
    old_models: Option<Vec<OldModelDeclaration>>,
    #[serde(default)]
    tools: Option<Vec<Tool>>,
}

impl CatalogConfig {
    /// Build a catalog from declarations, resolving model defaults.
    pub fn new(
        models: Vec<ChatModelDeclaration>,
        old_models: Vec<OldModelDeclaration>,
        tools: Vec<Tool>,
    ) -> Result<Self> {
        if models.is_empty() {
            return Err(Error::Config(
                "at least one model must be configured".to_string(),
            ));
        }
        Ok(Self {
            models: models.into_iter().map(ChatModel::from).collect(),
            old_models: old_models.into_iter().map(OldModel::from).collect(),
            tools,
        })
    }

    pub fn models(&self) -> &[ChatModel] {
        &self.models
    }

    /// The first declared model.
    pub fn default_model(&self) -> &ChatModel {
        &self.models[0]
    }

    pub fn old_models(&self) -> &[OldModel] {
        &self.old_models
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    fn from_lookup(var: Lookup<'_>) -> Result<Self> {
        let file = match var("CATALOG_PATH") {
            Some(path) => read_catalog_file(Path::new(&path))?,
            None => CatalogFile::default(),
        };
        Self::merge(var("MODELS"), var("OLD_MODELS"), var("TOOLS"), file)
    }

    /// JSON from the environment wins over the catalog file, key by key.
    fn merge(
        models: Option<String>,
        old_models: Option<String>,
        tools: Option<String>,
        file: CatalogFile,
    ) -> Result<Self> {
        let models = parse_json::<Vec<ChatModelDeclaration>>("MODELS", models)?
            .or(file.models)
            .unwrap_or_default();
        let old_models = parse_json::<Vec<OldModelDeclaration>>("OLD_MODELS", old_models)?
            .or(file.old_models)
            .unwrap_or_default();
        let tools = parse_json::<Vec<Tool>>("TOOLS", tools)?
            .or(file.tools)
            .unwrap_or_default();

        Self::new(models, old_models, tools)
    }
}

fn read_catalog_file(path: &Path) -> Result<CatalogFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
    Ok(toml::from_str(&raw)?)
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(&|key: &str| env::var(key).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup(var: Lookup<'_>) -> Result<Self> {
        Ok(Self {
            server: ServerConfig {
                host: var_or(var, "HOST", "0.0.0.0"),
                port: parse_var(var, "PORT", 3000)?,
            },
            database: DatabaseConfig {
                path: var_or(var, "DATABASE_PATH", "./data/chat.db"),
            },
            session: SessionConfig {
                cookie_name: var_or(var, "COOKIE_NAME", "hf-chat"),
                secure: flag_var(var, "COOKIE_SECURE"),
                max_age_seconds: parse_var(var, "SESSION_MAX_AGE", 60 * 60 * 24 * 14)?,
            },
            features: FeatureConfig {
                search_enabled: flag_var(var, "SEARCH_ENABLED"),
                enable_assistants: flag_var(var, "ENABLE_ASSISTANTS"),
                enable_assistants_rag: flag_var(var, "ENABLE_ASSISTANTS_RAG"),
                community_tools: flag_var(var, "COMMUNITY_TOOLS"),
                login_enabled: var("OPENID_CLIENT_ID").is_some_and(|v| !v.is_empty()),
                automatic_login: flag_var(var, "AUTOMATIC_LOGIN"),
                messages_before_login: parse_var(var, "MESSAGES_BEFORE_LOGIN", 0)?,
                share_conversations_with_model_authors: var(
                    "SHARE_CONVERSATIONS_WITH_MODEL_AUTHORS",
                )
                .map_or(true, |v| v != "false"),
            },
            catalog: CatalogConfig::from_lookup(var)?,
            logging: LoggingConfig {
                format: match var_or(var, "LOG_FORMAT", "pretty").as_str() {
                    "json" => LogFormat::Json,
                    _ => LogFormat::Pretty,
                },
            },
        })
    }

    /// Configuration for tests and embedding: in-memory database, given catalog.
    pub fn with_catalog(catalog: CatalogConfig) -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
            },
            database: DatabaseConfig {
                path: ":memory:".to_string(),
            },
            session: SessionConfig::default(),
            features: FeatureConfig {
                share_conversations_with_model_authors: true,
                ..FeatureConfig::default()
            },
            catalog,
            logging: LoggingConfig::default(),
        }
    }
}

fn var_or(var: Lookup<'_>, key: &str, default: &str) -> String {
    var(key).unwrap_or_else(|| default.to_string())
}

fn flag_var(var: Lookup<'_>, key: &str) -> bool {
    var(key).is_some_and(|v| v == "true")
}

fn parse_var<T: std::str::FromStr>(var: Lookup<'_>, key: &str, default: T) -> Result<T> {
    match var(key) {
        Some(raw) => raw
            .parse()
            .map_err(|_| Error::Config(format!("invalid {}: {:?}", key, raw))),
        None => Ok(default),
    }
}

fn parse_json<T: DeserializeOwned>(key: &str, raw: Option<String>) -> Result<Option<T>> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| Error::Config(format!("invalid {}: {}", key, e))),
        _ => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_catalog_requires_a_model() {
        let err = CatalogConfig::new(vec![], vec![], vec![]).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_catalog_file_parses() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[[models]]
name = "HuggingFaceH4/zephyr-7b-beta"
displayName = "Zephyr"
tools = true

[[old_models]]
name = "bigcode/starcoder"

[[tools]]
_id = "000000000000000000000001"
type = "config"
displayName = "Web search"
name = "websearch"
"#
        )
        .unwrap();

        let parsed = read_catalog_file(file.path()).unwrap();
        let catalog = CatalogConfig::new(
            parsed.models.unwrap(),
            parsed.old_models.unwrap(),
            parsed.tools.unwrap(),
        )
        .unwrap();

        assert_eq!(catalog.default_model().id, "HuggingFaceH4/zephyr-7b-beta");
        assert_eq!(catalog.default_model().display_name, "Zephyr");
        assert!(catalog.default_model().tools);
        assert_eq!(catalog.old_models()[0].id, "bigcode/starcoder");
        assert_eq!(catalog.tools()[0].name, "websearch");
    }

    #[test]
    fn test_missing_catalog_file_is_config_error() {
        let err = read_catalog_file(Path::new("/nonexistent/catalog.toml")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    fn file_with_models(names: &[&str]) -> CatalogFile {
        CatalogFile {
            models: Some(
                names
                    .iter()
                    .map(|n| serde_json::from_value(serde_json::json!({ "name": n })).unwrap())
                    .collect(),
            ),
            old_models: Some(vec![serde_json::from_value(
                serde_json::json!({ "name": "from-file-old" }),
            )
            .unwrap()]),
            tools: None,
        }
    }

    fn lookup<'a>(vars: &'a HashMap<&'a str, String>) -> impl Fn(&str) -> Option<String> + 'a {
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_env_models_win_over_file() {
        let catalog = CatalogConfig::merge(
            Some(r#"[{"name": "from-env"}]"#.into()),
            None,
            None,
            file_with_models(&["from-file"]),
        )
        .unwrap();

        assert_eq!(catalog.models().len(), 1);
        assert_eq!(catalog.default_model().id, "from-env");
        // unset keys still come from the file
        assert_eq!(catalog.old_models()[0].id, "from-file-old");
        assert!(catalog.tools().is_empty());
    }

    #[test]
    fn test_blank_env_falls_back_to_file() {
        let catalog =
            CatalogConfig::merge(Some("  ".into()), None, None, file_with_models(&["from-file"]))
                .unwrap();
        assert_eq!(catalog.default_model().id, "from-file");
    }

    #[test]
    fn test_malformed_models_json_is_config_error() {
        let err = CatalogConfig::merge(
            Some("[{not json".into()),
            None,
            None,
            file_with_models(&["from-file"]),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("MODELS")));
    }

    #[test]
    fn test_from_lookup_defaults() {
        let vars = HashMap::from([("MODELS", r#"[{"name": "zephyr"}]"#.to_string())]);
        let config = Config::from_lookup(&lookup(&vars)).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.session.cookie_name, "hf-chat");
        assert_eq!(config.session.max_age_seconds, 1_209_600);
        assert!(!config.features.login_enabled);
        assert!(config.features.share_conversations_with_model_authors);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.catalog.default_model().id, "zephyr");
    }

    #[test]
    fn test_from_lookup_reads_catalog_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[[models]]\nname = \"from-file\"\n").unwrap();
        let vars = HashMap::from([
            ("CATALOG_PATH", file.path().display().to_string()),
            ("OPENID_CLIENT_ID", "client".to_string()),
            ("LOG_FORMAT", "json".to_string()),
        ]);

        let config = Config::from_lookup(&lookup(&vars)).unwrap();
        assert_eq!(config.catalog.default_model().id, "from-file");
        assert!(config.features.login_enabled);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_invalid_port_is_config_error() {
        let vars = HashMap::from([
            ("PORT", "abc".to_string()),
            ("MODELS", r#"[{"name": "zephyr"}]"#.to_string()),
        ]);
        let err = Config::from_lookup(&lookup(&vars)).unwrap_err();
        assert!(matches!(err, Error::Config(msg) if msg.contains("PORT")));
    }

    #[test]
    fn test_missing_models_is_config_error() {
        let vars = HashMap::new();
        let err = Config::from_lookup(&lookup(&vars)).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
