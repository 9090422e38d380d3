//! Embedding generation
//!
//! Architecture:
//! - EmbeddingProvider trait for abstraction
//! - FastEmbedProvider for local embedding (all-MiniLM-L6-v2, 384-dim)
//! - HashEmbedder as a deterministic offline fallback
//!
//! Embedding computation is the dominant cost of the pipeline, so ingest
//! batches all item encodes into one call.

mod hash;
mod provider;

pub use hash::HashEmbedder;
pub use provider::{EmbeddingError, EmbeddingProvider, FastEmbedProvider};

use std::sync::Arc;

/// Build the configured embedding provider with ordered-attempt fallback:
/// fastembed first, hash embedder when the model cannot initialize.
pub fn build_provider(model: &str, dimension: usize) -> Arc<dyn EmbeddingProvider> {
    match FastEmbedProvider::new(model) {
        Ok(provider) => Arc::new(provider),
        Err(e) => {
            tracing::warn!(
                "Embedding model '{}' unavailable ({}); using deterministic hash embedder",
                model,
                e
            );
            Arc::new(HashEmbedder::new(dimension))
        }
    }
}
