//! # kb-engine
//!
//! The retrieval engine facade for the assistant knowledge base.
//!
//! [`Engine::answer`] is the single entry point the orchestration layer
//! invokes as a tool call: it lazily builds the corpus, model, and index
//! on first use (single-flight under concurrent callers), then serves
//! top-1 nearest-neighbor lookups against the cached index. Failures
//! never reach the caller; they map to a fixed fallback string and the
//! next call retries the build.
//!
//! [`tool`] carries the typed tool-calling contract the external
//! orchestration layer registers the engine under.

pub mod engine;
pub mod tool;

pub use engine::{Engine, EmbedderLoader};
pub use tool::{knowledge_base_tool, NavigationMessage, ToolDescriptor};
