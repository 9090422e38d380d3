//! Vector similarity index
//!
//! One embedding model instance plus one of two interchangeable backends:
//! - [`FlatIndex`]: exact cosine search, carries a serialized copy of each
//!   item alongside its embedding
//! - [`HnswIndex`]: approximate nearest neighbor search over an
//!   integer-addressed store with a side mapping back to items
//!
//! The preferred backend comes from configuration; if it cannot be
//! constructed the other one is used (ordered-attempt fallback). Ingest and
//! search absorb backend failures: callers see an empty candidate set, never
//! an error.

mod flat;
mod hnsw;

pub use flat::FlatIndex;
pub use hnsw::HnswIndex;

use crate::catalog::Item;
use crate::embedding::EmbeddingProvider;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Index initialization failed: {0}")]
    InitializationError(String),

    #[error("Ingest failed: {0}")]
    IngestError(String),

    #[error("Search failed: {0}")]
    SearchError(String),

    #[error("Invalid dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// An item paired with its similarity score from the index
///
/// Scores are always within [0, 1], whichever backend produced them.
#[derive(Debug, Clone)]
pub struct ScoredItem {
    pub item: Item,
    pub score: f32,
}

/// Capability interface shared by the two index backends
pub trait IndexBackend: Send + Sync {
    /// Bulk-load items and their embeddings. One-time operation per session;
    /// not incremental-safe mid-query.
    fn ingest(&mut self, items: &[Item], embeddings: &[Vec<f32>]) -> Result<(), IndexError>;

    /// Nearest-neighbor query. Results are sorted by similarity descending,
    /// contain only scores >= threshold, and hold at most top_k entries.
    fn search(
        &self,
        query: &[f32],
        top_k: usize,
        threshold: f32,
    ) -> Result<Vec<ScoredItem>, IndexError>;

    /// Number of ingested items
    fn len(&self) -> usize;
}

/// Backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Exact cosine search (preferred default)
    Flat,
    /// Approximate HNSW search
    Hnsw,
}

impl BackendKind {
    fn alternate(self) -> Self {
        match self {
            BackendKind::Flat => BackendKind::Hnsw,
            BackendKind::Hnsw => BackendKind::Flat,
        }
    }
}

/// HNSW tuning parameters, forwarded from configuration
#[derive(Debug, Clone, Copy)]
pub struct HnswParams {
    pub ef_construction: usize,
    pub m: usize,
    pub ef_search: usize,
}

impl Default for HnswParams {
    fn default() -> Self {
        Self {
            ef_construction: 200,
            m: 16,
            ef_search: 50,
        }
    }
}

/// The engine-facing similarity index: one embedding provider, one active
/// backend, read-only after ingest.
pub struct SimilarityIndex {
    provider: Arc<dyn EmbeddingProvider>,
    backend: Box<dyn IndexBackend>,
    active: BackendKind,
}

impl SimilarityIndex {
    /// Build an index with the preferred backend, falling back to the
    /// alternate when the preferred one fails to initialize.
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        preferred: BackendKind,
        params: HnswParams,
    ) -> Result<Self, IndexError> {
        let dimension = provider.dimension();

        let (backend, active) = match Self::build_backend(preferred, dimension, params) {
            Ok(backend) => (backend, preferred),
            Err(e) => {
                let alternate = preferred.alternate();
                tracing::warn!(
                    "Backend {:?} failed to initialize ({}); falling back to {:?}",
                    preferred,
                    e,
                    alternate
                );
                (Self::build_backend(alternate, dimension, params)?, alternate)
            }
        };

        Ok(Self {
            provider,
            backend,
            active,
        })
    }

    fn build_backend(
        kind: BackendKind,
        dimension: usize,
        params: HnswParams,
    ) -> Result<Box<dyn IndexBackend>, IndexError> {
        match kind {
            BackendKind::Flat => Ok(Box::new(FlatIndex::new(dimension)?)),
            BackendKind::Hnsw => Ok(Box::new(HnswIndex::new(dimension, params)?)),
        }
    }

    /// Which backend ended up active
    pub fn active_backend(&self) -> BackendKind {
        self.active
    }

    /// Number of ingested items
    pub fn len(&self) -> usize {
        self.backend.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Embed composite texts for all items in one batch and load them into
    /// the active backend. Failures are absorbed: the index stays empty and
    /// downstream fallbacks take over.
    pub fn ingest(&mut self, items: &[Item]) {
        if items.is_empty() {
            return;
        }

        if let Err(e) = self.try_ingest(items) {
            tracing::warn!("Index ingest failed, continuing with empty index: {}", e);
        }
    }

    fn try_ingest(&mut self, items: &[Item]) -> Result<(), IndexError> {
        let texts: Vec<String> = items.iter().map(|i| i.composite_text()).collect();

        let embeddings = self
            .provider
            .embed_batch(&texts)
            .map_err(|e| IndexError::IngestError(e.to_string()))?;

        self.backend.ingest(items, &embeddings)?;

        tracing::info!(
            "Ingested {} items into {:?} backend ({} model)",
            items.len(),
            self.active,
            self.provider.model_name()
        );

        Ok(())
    }

    /// Nearest-neighbor query over the ingested corpus. The query is
    /// embedded once; any failure yields an empty candidate set.
    pub fn search(&self, query: &str, top_k: usize, threshold: f32) -> Vec<ScoredItem> {
        match self.try_search(query, top_k, threshold) {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!("Index search failed, returning no candidates: {}", e);
                Vec::new()
            }
        }
    }

    fn try_search(
        &self,
        query: &str,
        top_k: usize,
        threshold: f32,
    ) -> Result<Vec<ScoredItem>, IndexError> {
        if self.backend.len() == 0 {
            return Ok(Vec::new());
        }

        let query_embedding = self
            .provider
            .embed(query)
            .map_err(|e| IndexError::SearchError(e.to_string()))?;

        self.backend.search(&query_embedding, top_k, threshold)
    }
}
