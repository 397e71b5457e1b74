//! Model file caching.
//!
//! Downloads model files from HuggingFace Hub on first use and serves
//! them from a local cache directory afterwards.

use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::EmbeddingError;

/// Files required to load the model
const REQUIRED_FILES: &[&str] = &["config.json", "tokenizer.json", "model.safetensors"];

/// Where model files live and which repository they come from.
#[derive(Debug, Clone)]
pub struct ModelCache {
    /// Cache directory path
    pub cache_dir: PathBuf,
    /// HuggingFace repository ID
    pub repo_id: String,
}

impl ModelCache {
    /// Create a cache rooted at `cache_dir` for the given repository.
    pub fn new(cache_dir: impl Into<PathBuf>, repo_id: impl Into<String>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            repo_id: repo_id.into(),
        }
    }

    /// Directory holding this model's files
    pub fn model_dir(&self) -> PathBuf {
        self.cache_dir.join(self.repo_id.replace('/', "_"))
    }

    /// True when every required file is present on disk
    pub fn is_cached(&self) -> bool {
        let model_dir = self.model_dir();
        REQUIRED_FILES.iter().all(|f| model_dir.join(f).exists())
    }
}

/// Resolved paths to the model files
#[derive(Debug, Clone)]
pub struct ModelPaths {
    pub config: PathBuf,
    pub tokenizer: PathBuf,
    pub weights: PathBuf,
}

/// Get model file paths, downloading from HuggingFace Hub if needed.
pub fn get_or_download_model(cache: &ModelCache) -> Result<ModelPaths, EmbeddingError> {
    let model_dir = cache.model_dir();

    if cache.is_cached() {
        debug!(path = ?model_dir, "Using cached model files");
    } else {
        info!(repo = %cache.repo_id, "Downloading model files...");
        fetch_model_files(cache)?;
    }

    Ok(ModelPaths {
        config: model_dir.join("config.json"),
        tokenizer: model_dir.join("tokenizer.json"),
        weights: model_dir.join("model.safetensors"),
    })
}

fn fetch_model_files(cache: &ModelCache) -> Result<(), EmbeddingError> {
    use hf_hub::api::sync::Api;

    let api = Api::new().map_err(|e| EmbeddingError::Download(e.to_string()))?;
    let repo = api.model(cache.repo_id.clone());
    let model_dir = cache.model_dir();

    std::fs::create_dir_all(&model_dir)?;

    for filename in REQUIRED_FILES {
        info!(file = filename, "Downloading...");
        let fetched = repo
            .get(filename)
            .map_err(|e| EmbeddingError::Download(format!("{}: {}", filename, e)))?;
        std::fs::copy(&fetched, model_dir.join(filename))?;
        debug!(file = filename, "Cached");
    }

    Ok(())
}
