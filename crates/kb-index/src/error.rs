//! Retrieval error taxonomy.
//!
//! Every kind is caught at the engine facade and mapped to one fallback
//! string; the distinction exists for logs and operator diagnostics, not
//! for caller branching.

use std::path::PathBuf;
use thiserror::Error;

use kb_embeddings::EmbeddingError;

/// Errors raised while building or querying the knowledge base.
#[derive(Debug, Error)]
pub enum KbError {
    /// Corpus file missing or unreadable
    #[error("Knowledge base unavailable at {path}: {source}")]
    CorpusUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Corpus file is not valid UTF-8
    #[error("Knowledge base at {path} is not valid UTF-8")]
    InvalidEncoding { path: PathBuf },

    /// Corpus produced no sections after filtering
    #[error("Knowledge base contains no sections")]
    EmptyCorpus,

    /// Model failed to load or text failed to encode
    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    /// A built embedding disagrees with the model's reported dimension
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Index held no entries at query time (defensive; the build path
    /// rejects empty corpora)
    #[error("No matching section found")]
    NoMatch,
}
