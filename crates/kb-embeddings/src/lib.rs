//! # kb-embeddings
//!
//! Local sentence embeddings for the assistant knowledge base.
//!
//! Runs all-MiniLM-L6-v2 (384 dimensions) through Candle on CPU, so
//! retrieval works offline after the initial model download. The
//! [`Embedder`] trait is the seam the retrieval engine is built against;
//! tests inject deterministic fakes through it.

pub mod cache;
pub mod error;
pub mod minilm;
pub mod model;

pub use cache::{get_or_download_model, ModelCache, ModelPaths};
pub use error::EmbeddingError;
pub use minilm::{MiniLmEmbedder, EMBEDDING_DIM, MAX_SEQ_LENGTH};
pub use model::{Embedder, Embedding, ModelInfo};
