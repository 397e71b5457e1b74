//! Configuration loading for the assistant knowledge base.
//!
//! Layered precedence: built-in defaults, then the config file at
//! `~/.config/assistant-kb/config.toml`, then an optional CLI-specified
//! file, then `KB_*` environment variables. CLI flag overrides are
//! applied by the caller after loading.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

/// Default HuggingFace repository for the embedding model
pub const DEFAULT_MODEL_REPO: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Path to the knowledge-base corpus file
    #[serde(default = "default_corpus_path")]
    pub corpus_path: String,

    /// Directory where embedding model files are cached
    #[serde(default = "default_model_cache_dir")]
    pub model_cache_dir: String,

    /// HuggingFace repository for the embedding model
    #[serde(default = "default_model_repo")]
    pub model_repo: String,

    /// Message returned to the caller when a lookup cannot be served
    #[serde(default = "default_fallback_message")]
    pub fallback_message: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_corpus_path() -> String {
    ProjectDirs::from("", "", "assistant-kb")
        .map(|p| p.data_local_dir().join("KnowledgeBase.md"))
        .unwrap_or_else(|| PathBuf::from("./KnowledgeBase.md"))
        .to_string_lossy()
        .to_string()
}

fn default_model_cache_dir() -> String {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("assistant-kb")
        .join("models")
        .to_string_lossy()
        .to_string()
}

fn default_model_repo() -> String {
    DEFAULT_MODEL_REPO.to_string()
}

fn default_fallback_message() -> String {
    "I'm sorry, I couldn't access that information right now.".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            corpus_path: default_corpus_path(),
            model_cache_dir: default_model_cache_dir(),
            model_repo: default_model_repo(),
            fallback_message: default_fallback_message(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (~/.config/assistant-kb/config.toml)
    /// 3. CLI-specified config file (optional)
    /// 4. Environment variables (KB_*)
    ///
    /// CLI flags should be applied by the caller after this returns.
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, ConfigError> {
        let config_dir = ProjectDirs::from("", "", "assistant-kb")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("corpus_path", default_corpus_path())
            .map_err(|e| ConfigError(e.to_string()))?
            .set_default("model_cache_dir", default_model_cache_dir())
            .map_err(|e| ConfigError(e.to_string()))?
            .set_default("model_repo", default_model_repo())
            .map_err(|e| ConfigError(e.to_string()))?
            .set_default("fallback_message", default_fallback_message())
            .map_err(|e| ConfigError(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| ConfigError(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("KB")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| ConfigError(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ConfigError(e.to_string()))
    }

    /// Expand ~ in corpus_path to the actual home directory
    pub fn expanded_corpus_path(&self) -> PathBuf {
        expand_home(&self.corpus_path)
    }

    /// Expand ~ in model_cache_dir to the actual home directory
    pub fn expanded_model_cache_dir(&self) -> PathBuf {
        expand_home(&self.model_cache_dir)
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
