//! Exact cosine backend
//!
//! Stores item identity, embedding, and a serialized copy of the full item.
//! Query distance is cosine-derived on [0, 2]; similarity = 1 - distance/2.

use super::{IndexBackend, IndexError, ScoredItem};
use crate::catalog::Item;

struct FlatEntry {
    id: u64,
    embedding: Vec<f32>,
    /// Serialized item payload; deserialized per hit so results never alias
    /// the ingest-time collection
    payload: String,
}

/// Exact, metadata-carrying index backend
pub struct FlatIndex {
    dimension: usize,
    entries: Vec<FlatEntry>,
}

impl FlatIndex {
    pub fn new(dimension: usize) -> Result<Self, IndexError> {
        if dimension == 0 {
            return Err(IndexError::InitializationError(
                "dimension must be non-zero".to_string(),
            ));
        }
        Ok(Self {
            dimension,
            entries: Vec::new(),
        })
    }
}

impl IndexBackend for FlatIndex {
    fn ingest(&mut self, items: &[Item], embeddings: &[Vec<f32>]) -> Result<(), IndexError> {
        if items.len() != embeddings.len() {
            return Err(IndexError::IngestError(format!(
                "{} items but {} embeddings",
                items.len(),
                embeddings.len()
            )));
        }

        for (item, embedding) in items.iter().zip(embeddings) {
            if embedding.len() != self.dimension {
                return Err(IndexError::InvalidDimension {
                    expected: self.dimension,
                    actual: embedding.len(),
                });
            }

            let payload = serde_json::to_string(item)
                .map_err(|e| IndexError::SerializationError(e.to_string()))?;

            self.entries.push(FlatEntry {
                id: item.id,
                embedding: embedding.clone(),
                payload,
            });
        }

        Ok(())
    }

    fn search(
        &self,
        query: &[f32],
        top_k: usize,
        threshold: f32,
    ) -> Result<Vec<ScoredItem>, IndexError> {
        if query.len() != self.dimension {
            return Err(IndexError::InvalidDimension {
                expected: self.dimension,
                actual: query.len(),
            });
        }

        let mut results = Vec::new();
        for entry in &self.entries {
            let distance = cosine_distance(query, &entry.embedding);
            let score = (1.0 - distance / 2.0).clamp(0.0, 1.0);

            if score >= threshold {
                let item: Item = serde_json::from_str(&entry.payload).map_err(|e| {
                    IndexError::SerializationError(format!(
                        "corrupt payload for item {}: {}",
                        entry.id, e
                    ))
                })?;
                results.push(ScoredItem { item, score });
            }
        }

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(top_k);
        Ok(results)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Cosine distance on [0, 2]: 0 = identical direction, 2 = opposite
fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return 2.0;
    }

    let cosine = (dot / (mag_a * mag_b)).clamp(-1.0, 1.0);
    1.0 - cosine
}
