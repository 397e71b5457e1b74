//! Retrieval engine facade with lazy single-flight initialization.
//!
//! State machine: Uninitialized -> Building -> Ready. The write lock is
//! the Building critical section; a failed build leaves the state
//! Uninitialized so the next call retries the whole sequence. Once Ready,
//! callers share the immutable index through the read lock and queries
//! run in parallel.

use std::path::PathBuf;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use kb_embeddings::{Embedder, EmbeddingError, MiniLmEmbedder, ModelCache};
use kb_index::{load_corpus, KbError, SectionIndex};
use kb_types::Settings;

/// Factory producing the embedder during the build phase.
///
/// The default loads MiniLM through Candle; tests inject deterministic
/// fakes so the whole state machine runs without model downloads.
pub type EmbedderLoader =
    Box<dyn Fn() -> Result<Box<dyn Embedder>, EmbeddingError> + Send + Sync>;

/// Built state: the loaded model and the index it produced.
///
/// The pairing matters; an index must only ever be queried through the
/// embedder instance that built it.
struct Ready {
    embedder: Box<dyn Embedder>,
    index: SectionIndex,
}

/// Knowledge-base retrieval engine.
///
/// One instance per process; cheap to share behind an `Arc`.
pub struct Engine {
    corpus_path: PathBuf,
    fallback_message: String,
    loader: EmbedderLoader,
    state: RwLock<Option<Arc<Ready>>>,
}

impl Engine {
    /// Create an engine that loads MiniLM from the configured cache.
    ///
    /// Nothing heavy happens here; the corpus read, model load, and index
    /// build are all deferred to the first [`Engine::answer`] or
    /// [`Engine::warm`] call.
    pub fn new(settings: &Settings) -> Self {
        let cache = ModelCache::new(
            settings.expanded_model_cache_dir(),
            settings.model_repo.clone(),
        );
        let loader: EmbedderLoader = Box::new(move || {
            MiniLmEmbedder::load(&cache).map(|m| Box::new(m) as Box<dyn Embedder>)
        });
        Self::with_embedder_loader(settings, loader)
    }

    /// Create an engine with an injected embedder factory.
    pub fn with_embedder_loader(settings: &Settings, loader: EmbedderLoader) -> Self {
        Self {
            corpus_path: settings.expanded_corpus_path(),
            fallback_message: settings.fallback_message.clone(),
            loader,
            state: RwLock::new(None),
        }
    }

    /// Answer a question from the knowledge base.
    ///
    /// Returns the closest section's text, or the configured fallback
    /// message if the engine cannot be built or the lookup fails. Never
    /// panics and never surfaces an error to the caller; failure kinds
    /// are distinguished only in logs.
    pub fn answer(&self, query: &str) -> String {
        debug!(query, "Knowledge base lookup");
        match self.lookup(query) {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "Knowledge base lookup failed");
                self.fallback_message.clone()
            }
        }
    }

    /// Build the model and index eagerly.
    ///
    /// Same single-flight path as [`Engine::answer`], but the error kind
    /// propagates for operator-facing diagnostics (CLI warm-up, startup
    /// checks).
    pub fn warm(&self) -> Result<(), KbError> {
        self.ready().map(|_| ())
    }

    /// Number of indexed sections, or `None` before the first successful
    /// build.
    pub fn section_count(&self) -> Option<usize> {
        self.read_state().as_ref().map(|ready| ready.index.len())
    }

    fn lookup(&self, query: &str) -> Result<String, KbError> {
        let ready = self.ready()?;
        let section = ready.index.resolve(query, ready.embedder.as_ref())?;
        Ok(section.text.clone())
    }

    /// Get the Ready state, building it on first use.
    ///
    /// Double-checked locking: the read lock serves the steady state, the
    /// write lock serializes concurrent first calls, and the re-check
    /// under the write lock guarantees corpus load, model load, and index
    /// build each run at most once. A failed build leaves the state
    /// `None`; the next call retries from scratch.
    fn ready(&self) -> Result<Arc<Ready>, KbError> {
        if let Some(ready) = self.read_state().as_ref() {
            return Ok(Arc::clone(ready));
        }

        let mut state = self.write_state();
        if let Some(ready) = state.as_ref() {
            return Ok(Arc::clone(ready));
        }

        info!("Initializing knowledge base...");
        let sections = load_corpus(&self.corpus_path)?;
        let embedder = (self.loader)()?;
        let index = SectionIndex::build(sections, embedder.as_ref())?;
        info!(sections = index.len(), "Knowledge base ready");

        let ready = Arc::new(Ready { embedder, index });
        *state = Some(Arc::clone(&ready));
        Ok(ready)
    }

    // Lock poisoning only happens if a builder panicked; recovering the
    // inner value keeps the engine in a retryable state instead of
    // propagating the panic to every later caller.
    fn read_state(&self) -> RwLockReadGuard<'_, Option<Arc<Ready>>> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, Option<Arc<Ready>>> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}
