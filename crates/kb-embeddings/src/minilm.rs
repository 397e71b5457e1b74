//! Candle-based all-MiniLM-L6-v2 embedder.
//!
//! CPU inference, mean pooling over the attention mask, unit-normalized
//! output. Matches the sentence-transformers reference behavior so
//! corpus and query vectors live in the same space.

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::Tokenizer;
use tracing::{debug, info};

use crate::cache::{get_or_download_model, ModelCache};
use crate::error::EmbeddingError;
use crate::model::{Embedder, Embedding, ModelInfo};

/// Embedding dimension for all-MiniLM-L6-v2
pub const EMBEDDING_DIM: usize = 384;

/// Maximum sequence length in tokens
pub const MAX_SEQ_LENGTH: usize = 256;

/// all-MiniLM-L6-v2 running on Candle.
pub struct MiniLmEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    info: ModelInfo,
}

impl MiniLmEmbedder {
    /// Load the model from cache, downloading files if needed.
    ///
    /// This is the heavyweight step of engine initialization; callers are
    /// expected to load at most once per process and share the instance.
    pub fn load(cache: &ModelCache) -> Result<Self, EmbeddingError> {
        let paths = get_or_download_model(cache)?;
        Self::load_from_paths(&paths.config, &paths.tokenizer, &paths.weights)
    }

    /// Load from explicit file paths
    pub fn load_from_paths(
        config_path: &std::path::Path,
        tokenizer_path: &std::path::Path,
        weights_path: &std::path::Path,
    ) -> Result<Self, EmbeddingError> {
        info!("Loading embedding model...");

        let device = Device::Cpu;

        let config_str = std::fs::read_to_string(config_path)?;
        let config: BertConfig = serde_json::from_str(&config_str)
            .map_err(|e| EmbeddingError::ModelNotFound(format!("Invalid config: {}", e)))?;

        let tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| EmbeddingError::Tokenizer(e.to_string()))?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path.to_path_buf()], DType::F32, &device)?
        };
        let model = BertModel::load(vb, &config)?;

        info!(dim = EMBEDDING_DIM, max_seq = MAX_SEQ_LENGTH, "Model ready");

        Ok(Self {
            model,
            tokenizer,
            device,
            info: ModelInfo {
                name: "all-MiniLM-L6-v2".to_string(),
                dimension: EMBEDDING_DIM,
                max_sequence_length: MAX_SEQ_LENGTH,
            },
        })
    }

    /// Tokenize a batch into padded id and attention-mask tensors.
    fn tokenize(&self, texts: &[&str]) -> Result<(Tensor, Tensor), EmbeddingError> {
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| EmbeddingError::Tokenizer(e.to_string()))?;

        let max_len = encodings
            .iter()
            .map(|e| e.get_ids().len())
            .max()
            .unwrap_or(0)
            .min(MAX_SEQ_LENGTH);

        let mut ids_flat: Vec<u32> = Vec::with_capacity(texts.len() * max_len);
        let mut mask_flat: Vec<u32> = Vec::with_capacity(texts.len() * max_len);

        for encoding in &encodings {
            let ids = encoding.get_ids();
            let mask = encoding.get_attention_mask();
            let keep = ids.len().min(max_len);

            ids_flat.extend_from_slice(&ids[..keep]);
            ids_flat.extend(std::iter::repeat(0).take(max_len - keep));
            mask_flat.extend_from_slice(&mask[..keep]);
            mask_flat.extend(std::iter::repeat(0).take(max_len - keep));
        }

        let shape = (texts.len(), max_len);
        let input_ids = Tensor::from_vec(ids_flat, shape, &self.device)?;
        let attention_mask = Tensor::from_vec(mask_flat, shape, &self.device)?;
        Ok((input_ids, attention_mask))
    }

    /// Mean pooling over token embeddings, excluding padding.
    fn mean_pool(
        &self,
        token_embeddings: &Tensor,
        attention_mask: &Tensor,
    ) -> Result<Tensor, EmbeddingError> {
        let mask = attention_mask
            .unsqueeze(2)?
            .broadcast_as(token_embeddings.shape())?
            .to_dtype(DType::F32)?;

        let summed = token_embeddings.broadcast_mul(&mask)?.sum(1)?;
        // Clamp so fully-masked rows cannot divide by zero
        let counts = mask.sum(1)?.clamp(1e-9, f64::MAX)?;
        Ok(summed.broadcast_div(&counts)?)
    }
}

impl Embedder for MiniLmEmbedder {
    fn info(&self) -> &ModelInfo {
        &self.info
    }

    fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
        let mut embeddings = self.embed_batch(&[text])?;
        embeddings
            .pop()
            .ok_or_else(|| EmbeddingError::Tokenizer("empty encoding".to_string()))
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        debug!(count = texts.len(), "Encoding batch");

        let (input_ids, attention_mask) = self.tokenize(texts)?;
        let token_type_ids = Tensor::zeros_like(&input_ids)?;

        let output = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let pooled = self.mean_pool(&output, &attention_mask)?;

        let rows: Vec<Vec<f32>> = pooled.to_vec2()?;
        Ok(rows.into_iter().map(Embedding::new).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // These exercise the real model and need a one-time download:
    // cargo test -p kb-embeddings -- --ignored

    fn load_default() -> MiniLmEmbedder {
        let cache = ModelCache::new(
            dirs::cache_dir().unwrap().join("assistant-kb").join("models"),
            "sentence-transformers/all-MiniLM-L6-v2",
        );
        MiniLmEmbedder::load(&cache).unwrap()
    }

    #[test]
    #[ignore = "requires model download"]
    fn test_load_model() {
        let embedder = load_default();
        assert_eq!(embedder.info().dimension, EMBEDDING_DIM);
    }

    #[test]
    #[ignore = "requires model download"]
    fn test_single_matches_batch() {
        let embedder = load_default();
        let single = embedder.embed("Pets are allowed with a fee.").unwrap();
        let batch = embedder
            .embed_batch(&["Pets are allowed with a fee.", "Checkout is open 24/7."])
            .unwrap();
        assert!((single.cosine_similarity(&batch[0]) - 1.0).abs() < 1e-4);
    }

    #[test]
    #[ignore = "requires model download"]
    fn test_related_texts_score_higher() {
        let embedder = load_default();
        let pets = embedder.embed("Pets are allowed with a fee.").unwrap();
        let query = embedder.embed("do you allow pets").unwrap();
        let unrelated = embedder.embed("Checkout is open 24/7.").unwrap();

        assert!(query.cosine_similarity(&pets) > query.cosine_similarity(&unrelated));
    }
}
