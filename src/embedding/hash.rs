//! Deterministic feature-hashing embedder
//!
//! Fallback provider used when the ML model cannot initialize (offline, no
//! cache) and by tests. Hashes word tokens into a fixed-dimension bag of
//! features and L2-normalizes, so identical texts always produce identical
//! vectors and token overlap produces cosine similarity.

use super::provider::{EmbeddingError, EmbeddingProvider};
use std::hash::{BuildHasher, Hasher};

/// Feature-hashing embedder over whitespace tokens
pub struct HashEmbedder {
    dimension: usize,
    hasher: ahash::RandomState,
}

impl HashEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            // Fixed seeds keep vectors stable across processes
            hasher: ahash::RandomState::with_seeds(7, 31, 127, 8191),
        }
    }

    fn embed_one(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::InvalidInput("Empty text".to_string()));
        }

        let mut vector = vec![0.0f32; self.dimension];
        for token in text.to_lowercase().split_whitespace() {
            let mut hasher = self.hasher.build_hasher();
            hasher.write(token.as_bytes());
            let hash = hasher.finish();

            let bucket = (hash % self.dimension as u64) as usize;
            // Sign bit from a higher hash bit reduces bucket-collision bias
            let sign = if hash & (1 << 63) == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        let magnitude: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for x in &mut vector {
                *x /= magnitude;
            }
        }

        Ok(vector)
    }
}

impl EmbeddingProvider for HashEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        self.embed_one(text)
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        texts.iter().map(|t| self.embed_one(t)).collect()
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        "hash-embedder"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let embedder = HashEmbedder::new(64);
        let a = embedder.embed("wireless headphones").unwrap();
        let b = embedder.embed("wireless headphones").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_normalized() {
        let embedder = HashEmbedder::new(64);
        let v = embedder.embed("gaming mechanical keyboard with rgb").unwrap();
        let magnitude: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((magnitude - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_token_overlap_raises_similarity() {
        let embedder = HashEmbedder::new(256);
        let q = embedder.embed("wireless headphones").unwrap();
        let close = embedder.embed("wireless headphones premium audio").unwrap();
        let far = embedder.embed("wooden standing desk").unwrap();

        let dot = |a: &[f32], b: &[f32]| -> f32 { a.iter().zip(b).map(|(x, y)| x * y).sum() };
        assert!(dot(&q, &close) > dot(&q, &far));
    }

    #[test]
    fn test_empty_text_rejected() {
        let embedder = HashEmbedder::new(64);
        assert!(embedder.embed("   ").is_err());
    }

    #[test]
    fn test_batch_matches_single() {
        let embedder = HashEmbedder::new(64);
        let batch = embedder
            .embed_batch(&["one thing".to_string(), "another thing".to_string()])
            .unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0], embedder.embed("one thing").unwrap());
    }
}
