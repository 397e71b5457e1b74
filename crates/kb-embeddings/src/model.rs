//! Embedding vector type and the embedder trait.

use crate::error::EmbeddingError;

/// A fixed-dimension embedding vector, normalized to unit length.
///
/// Normalizing at construction means cosine similarity between two
/// embeddings reduces to a dot product.
#[derive(Debug, Clone)]
pub struct Embedding {
    values: Vec<f32>,
}

impl Embedding {
    /// Create an embedding from raw values, normalizing to unit length.
    pub fn new(values: Vec<f32>) -> Self {
        let norm: f32 = values.iter().map(|x| x * x).sum::<f32>().sqrt();
        let values = if norm > 0.0 {
            values.iter().map(|x| x / norm).collect()
        } else {
            values
        };
        Self { values }
    }

    /// Number of dimensions
    pub fn dimension(&self) -> usize {
        self.values.len()
    }

    /// Cosine similarity with another embedding, in [-1, 1].
    ///
    /// Returns 0.0 on dimension mismatch rather than panicking; the index
    /// build rejects mixed dimensions before any query reaches this.
    pub fn cosine_similarity(&self, other: &Embedding) -> f32 {
        if self.values.len() != other.values.len() {
            return 0.0;
        }
        self.values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| a * b)
            .sum()
    }
}

/// Information about a loaded embedding model
#[derive(Debug, Clone)]
pub struct ModelInfo {
    /// Model name (e.g., "all-MiniLM-L6-v2")
    pub name: String,
    /// Embedding dimension
    pub dimension: usize,
    /// Maximum sequence length in tokens
    pub max_sequence_length: usize,
}

/// Text-to-vector encoder.
///
/// Implementations must be thread-safe (`Send + Sync`) so a single loaded
/// model can serve concurrent queries. Encoding must be deterministic for
/// a given instance: identical input text yields numerically equivalent
/// output across calls.
pub trait Embedder: Send + Sync {
    /// Model information
    fn info(&self) -> &ModelInfo;

    /// Encode a single text.
    fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError>;

    /// Encode multiple texts, one embedding per input in order.
    ///
    /// Per-item results must match what [`Embedder::embed`] would produce
    /// for the same text; batching is not allowed to change the output.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, EmbeddingError> {
        texts.iter().map(|text| self.embed(text)).collect()
    }
}
