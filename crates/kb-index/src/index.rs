//! In-memory section index and top-1 similarity search.

use tracing::{debug, info};

use kb_embeddings::{Embedder, Embedding};
use kb_types::Section;

use crate::error::KbError;

/// Immutable collection of (section, embedding) pairs.
///
/// Built exactly once per engine lifetime; any corpus change requires a
/// full rebuild through [`SectionIndex::build`]. Queries only read, so a
/// built index can be shared across threads freely.
#[derive(Debug)]
pub struct SectionIndex {
    entries: Vec<(Section, Embedding)>,
    dimension: usize,
}

impl SectionIndex {
    /// Embed every section with `embedder` and build the index.
    ///
    /// Order is preserved so section indices stay stable. An empty
    /// section sequence is a configuration error
    /// ([`KbError::EmptyCorpus`]), not "no match".
    pub fn build(sections: Vec<Section>, embedder: &dyn Embedder) -> Result<Self, KbError> {
        if sections.is_empty() {
            return Err(KbError::EmptyCorpus);
        }

        let texts: Vec<&str> = sections.iter().map(|s| s.text.as_str()).collect();
        let embeddings = embedder.embed_batch(&texts)?;

        let dimension = embedder.info().dimension;
        for embedding in &embeddings {
            if embedding.dimension() != dimension {
                return Err(KbError::DimensionMismatch {
                    expected: dimension,
                    actual: embedding.dimension(),
                });
            }
        }

        info!(sections = sections.len(), dimension, "Section index built");

        Ok(Self {
            entries: sections.into_iter().zip(embeddings).collect(),
            dimension,
        })
    }

    /// Number of indexed sections
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the index holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Embedding dimension of the stored vectors
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Iterate sections in corpus order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.entries.iter().map(|(section, _)| section)
    }

    /// Return the section closest to `query` by cosine similarity.
    ///
    /// `embedder` must be the same instance the index was built with.
    /// Ties resolve to the lowest section index. There is no similarity
    /// threshold: the best-scoring section is returned even when the
    /// absolute score is low, with the score logged for diagnostics.
    pub fn resolve(&self, query: &str, embedder: &dyn Embedder) -> Result<&Section, KbError> {
        let query_embedding = embedder.embed(query)?;

        let mut best: Option<(&Section, f32)> = None;
        for (section, embedding) in &self.entries {
            let score = query_embedding.cosine_similarity(embedding);
            match best {
                // Strict improvement only, so the earliest section wins ties
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((section, score)),
            }
        }

        match best {
            Some((section, score)) => {
                debug!(index = section.index, score, "Best match");
                Ok(section)
            }
            None => Err(KbError::NoMatch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kb_embeddings::{EmbeddingError, ModelInfo};

    /// Deterministic bag-of-words embedder: each distinct word gets its
    /// own dimension, so texts sharing words (and only those) score
    /// positive similarity.
    struct WordHashEmbedder {
        info: ModelInfo,
        vocab: std::sync::Mutex<std::collections::HashMap<String, usize>>,
    }

    impl WordHashEmbedder {
        fn new() -> Self {
            Self {
                info: ModelInfo {
                    name: "word-hash".to_string(),
                    dimension: 256,
                    max_sequence_length: 512,
                },
                vocab: std::sync::Mutex::new(std::collections::HashMap::new()),
            }
        }
    }

    impl Embedder for WordHashEmbedder {
        fn info(&self) -> &ModelInfo {
            &self.info
        }

        fn embed(&self, text: &str) -> Result<Embedding, EmbeddingError> {
            let mut vocab = self.vocab.lock().unwrap();
            let mut values = vec![0.0f32; self.info.dimension];
            for word in text.to_lowercase().split_whitespace() {
                let word = word.trim_matches(|c: char| !c.is_alphanumeric());
                if word.is_empty() {
                    continue;
                }
                let next = vocab.len();
                let slot = *vocab.entry(word.to_string()).or_insert(next);
                values[slot % self.info.dimension] += 1.0;
            }
            Ok(Embedding::new(values))
        }
    }

    /// Embedder whose reported dimension disagrees with its output.
    struct LyingEmbedder {
        info: ModelInfo,
    }

    impl Embedder for LyingEmbedder {
        fn info(&self) -> &ModelInfo {
            &self.info
        }

        fn embed(&self, _text: &str) -> Result<Embedding, EmbeddingError> {
            Ok(Embedding::new(vec![1.0, 0.0]))
        }
    }

    fn hotel_sections() -> Vec<Section> {
        crate::corpus::split_sections(
            "Checkout is open 24/7.\n\nRooms include free WiFi.\n\nPets are allowed with a fee.",
        )
    }

    #[test]
    fn test_build_empty_corpus_rejected() {
        let embedder = WordHashEmbedder::new();
        let err = SectionIndex::build(vec![], &embedder).unwrap_err();
        assert!(matches!(err, KbError::EmptyCorpus));
    }

    #[test]
    fn test_build_preserves_order() {
        let embedder = WordHashEmbedder::new();
        let index = SectionIndex::build(hotel_sections(), &embedder).unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.dimension(), 256);
        let indices: Vec<usize> = index.sections().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_build_rejects_dimension_mismatch() {
        let embedder = LyingEmbedder {
            info: ModelInfo {
                name: "lying".to_string(),
                dimension: 384,
                max_sequence_length: 512,
            },
        };
        let err = SectionIndex::build(hotel_sections(), &embedder).unwrap_err();
        assert!(matches!(
            err,
            KbError::DimensionMismatch {
                expected: 384,
                actual: 2
            }
        ));
    }

    #[test]
    fn test_resolve_returns_stored_section_verbatim() {
        let embedder = WordHashEmbedder::new();
        let index = SectionIndex::build(hotel_sections(), &embedder).unwrap();
        let section = index.resolve("do you allow pets", &embedder).unwrap();
        assert_eq!(section.text, "Pets are allowed with a fee.");
        assert_eq!(section.index, 2);
    }

    #[test]
    fn test_resolve_unrelated_query_still_answers() {
        // No relevance threshold: the closest section comes back even
        // when nothing overlaps.
        let embedder = WordHashEmbedder::new();
        let index = SectionIndex::build(hotel_sections(), &embedder).unwrap();
        let section = index
            .resolve("entirely unrelated zebra xylophone", &embedder)
            .unwrap();
        assert!(section.index < 3);
    }

    #[test]
    fn test_resolve_tie_breaks_to_lowest_index() {
        let embedder = WordHashEmbedder::new();
        let sections = vec![
            Section::new(0, "alpha beta"),
            Section::new(1, "alpha beta"),
            Section::new(2, "gamma delta"),
        ];
        let index = SectionIndex::build(sections, &embedder).unwrap();
        // Both alpha-beta sections score identically; lowest index wins
        for _ in 0..5 {
            let section = index.resolve("alpha", &embedder).unwrap();
            assert_eq!(section.index, 0);
        }
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let embedder = WordHashEmbedder::new();
        let index = SectionIndex::build(hotel_sections(), &embedder).unwrap();
        let first = index.resolve("free wifi in rooms", &embedder).unwrap().clone();
        let second = index.resolve("free wifi in rooms", &embedder).unwrap().clone();
        assert_eq!(first, second);
        assert_eq!(first.text, "Rooms include free WiFi.");
    }
}
