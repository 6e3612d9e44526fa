use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::application::ChainPrompts;
use crate::domain::DomainError;

pub const CONFIG_FILE: &str = "config.yaml";
pub const PROMPTS_FILE: &str = "prompts.yaml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub hub: HubConfig,
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
    pub server: ServerConfig,
    pub cors: CorsConfig,
    /// Log every rendered prompt at debug level.
    pub verbose: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    pub base_url: String,
    /// Environment variable holding the API token.
    pub token_env: String,
    pub timeout_seconds: u64,
    pub wait_for_model: bool,
    /// Let the endpoint serve repeated identical requests from its cache.
    pub use_cache: bool,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api-inference.huggingface.co".to_string(),
            token_env: "HUGGINGFACEHUB_API_TOKEN".to_string(),
            timeout_seconds: 120,
            wait_for_model: true,
            use_cache: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub model: String,
    pub max_new_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub stop: Vec<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "bigscience/bloom".to_string(),
            max_new_tokens: Some(256),
            temperature: None,
            stop: vec!["\nHuman:".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub model: String,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "sentence-transformers/all-mpnet-base-v2".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k: usize,
    /// Upper bound, in bytes, for documents split from uploaded text.
    pub chunk_size: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 4,
            chunk_size: 1000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub config: Config,
    pub prompts: ChainPrompts,
}

impl AppConfig {
    /// Loads from `APP_CONFIG_DIR` (default `config`) and applies
    /// `SERVER_HOST` / `SERVER_PORT` overrides.
    pub fn load() -> Result<Self, DomainError> {
        let dir = std::env::var("APP_CONFIG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config"));

        let mut config = Self::from_dir(&dir)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Reads `config.yaml` and `prompts.yaml` from `dir`; a missing file
    /// falls back to defaults.
    pub fn from_dir(dir: &Path) -> Result<Self, DomainError> {
        let config: Config = read_yaml(&dir.join(CONFIG_FILE))?.unwrap_or_default();
        let prompts: ChainPrompts = read_yaml(&dir.join(PROMPTS_FILE))?.unwrap_or_default();

        prompts.validate()?;
        if config.retrieval.top_k == 0 {
            return Err(DomainError::configuration("retrieval.top_k must be at least 1"));
        }

        Ok(Self { config, prompts })
    }

    fn apply_env_overrides(&mut self) -> Result<(), DomainError> {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.config.server.host = host;
        }
        if let Ok(port) = std::env::var("SERVER_PORT") {
            self.config.server.port = port
                .parse()
                .map_err(|_| DomainError::configuration(format!("invalid SERVER_PORT: {port}")))?;
        }
        Ok(())
    }
}

fn read_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>, DomainError> {
    if !path.exists() {
        warn!(path = %path.display(), "config file not found, using defaults");
        return Ok(None);
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| DomainError::configuration(format!("{}: {e}", path.display())))?;
    let parsed = serde_yaml::from_str(&raw)
        .map_err(|e| DomainError::configuration(format!("{}: {e}", path.display())))?;

    info!(path = %path.display(), "config file loaded");
    Ok(Some(parsed))
}
