//! # kb-index
//!
//! Corpus segmentation and the in-memory vector index for the assistant
//! knowledge base.
//!
//! [`corpus`] turns a knowledge-base file into ordered [`Section`]s by
//! splitting on blank lines. [`index`] embeds those sections once into an
//! immutable [`SectionIndex`] and answers top-1 nearest-neighbor queries
//! against it. All failures surface as [`KbError`].
//!
//! [`Section`]: kb_types::Section

pub mod corpus;
pub mod error;
pub mod index;

pub use corpus::{load_corpus, split_sections};
pub use error::KbError;
pub use index::SectionIndex;
