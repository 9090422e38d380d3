//! Approximate HNSW backend
//!
//! Stores only embeddings in an integer-addressed graph plus a side mapping
//! from address to item. Query distance is Euclidean (d >= 0);
//! similarity = 1 / (1 + d).

use super::{HnswParams, IndexBackend, IndexError, ScoredItem};
use crate::catalog::Item;
use ahash::{HashMap, HashMapExt};
use hnsw_rs::prelude::*;

/// Approximate, index-addressed backend
pub struct HnswIndex {
    index: Hnsw<'static, f32, DistL2>,
    /// Address assigned at ingest -> the item stored there
    address_to_item: HashMap<usize, Item>,
    dimension: usize,
    ef_search: usize,
}

impl HnswIndex {
    pub fn new(dimension: usize, params: HnswParams) -> Result<Self, IndexError> {
        if dimension == 0 {
            return Err(IndexError::InitializationError(
                "dimension must be non-zero".to_string(),
            ));
        }
        if params.m == 0 || params.ef_construction == 0 || params.ef_search == 0 {
            return Err(IndexError::InitializationError(
                "hnsw parameters must be non-zero".to_string(),
            ));
        }

        let index = Hnsw::<f32, DistL2>::new(
            params.m,
            dimension,
            params.ef_construction,
            200, // max_nb_connection
            DistL2,
        );

        Ok(Self {
            index,
            address_to_item: HashMap::new(),
            dimension,
            ef_search: params.ef_search,
        })
    }
}

impl IndexBackend for HnswIndex {
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

            let address = self.address_to_item.len();
            self.index.insert((embedding, address));
            self.address_to_item.insert(address, item.clone());
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

        let k = top_k.min(self.address_to_item.len());
        if k == 0 {
            return Ok(Vec::new());
        }

        let neighbors = self.index.search(query, k, self.ef_search);

        let mut results = Vec::new();
        for neighbor in neighbors {
            // Euclidean distance to similarity on (0, 1]
            let score = 1.0 / (1.0 + neighbor.distance);
            if score < threshold {
                continue;
            }

            match self.address_to_item.get(&neighbor.d_id) {
                Some(item) => results.push(ScoredItem {
                    item: item.clone(),
                    score,
                }),
                None => {
                    return Err(IndexError::SearchError(format!(
                        "no item at address {}",
                        neighbor.d_id
                    )));
                }
            }
        }

        // Neighbors come back in ascending distance, but make the ordering
        // contract explicit
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(top_k);
        Ok(results)
    }

    fn len(&self) -> usize {
        self.address_to_item.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u64, name: &str) -> Item {
        Item {
            id,
            name: name.to_string(),
            category: "Electronics".to_string(),
            price: 50.0,
            description: None,
            tags: vec![],
            rating: None,
        }
    }

    fn basis_vector(dim: usize, axis: usize) -> Vec<f32> {
        let mut v = vec![0.0; dim];
        v[axis] = 1.0;
        v
    }

    #[test]
    fn test_insert_and_search() {
        let mut index = HnswIndex::new(8, HnswParams::default()).unwrap();
        index
            .ingest(
                &[item(1, "a"), item(2, "b"), item(3, "c")],
                &[
                    basis_vector(8, 0),
                    basis_vector(8, 1),
                    basis_vector(8, 2),
                ],
            )
            .unwrap();

        let results = index.search(&basis_vector(8, 0), 2, 0.0).unwrap();
        assert!(!results.is_empty());
        assert_eq!(results[0].item.id, 1);
        // Identical vector: d = 0, similarity = 1
        assert!((results[0].score - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_scores_non_increasing() {
        let mut index = HnswIndex::new(8, HnswParams::default()).unwrap();
        let items: Vec<Item> = (0..6).map(|i| item(i, "x")).collect();
        let vectors: Vec<Vec<f32>> = (0..6).map(|i| basis_vector(8, i as usize)).collect();
        index.ingest(&items, &vectors).unwrap();

        let results = index.search(&basis_vector(8, 3), 6, 0.0).unwrap();
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_threshold_excludes_distant_vectors() {
        let mut index = HnswIndex::new(4, HnswParams::default()).unwrap();
        index
            .ingest(
                &[item(1, "near"), item(2, "far")],
                &[vec![1.0, 0.0, 0.0, 0.0], vec![0.0, 10.0, 0.0, 0.0]],
            )
            .unwrap();

        let results = index.search(&[1.0, 0.0, 0.0, 0.0], 5, 0.9).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].item.id, 1);
    }

    #[test]
    fn test_empty_index_search() {
        let index = HnswIndex::new(4, HnswParams::default()).unwrap();
        let results = index.search(&[0.0; 4], 5, 0.0).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = HnswParams {
            ef_construction: 0,
            m: 16,
            ef_search: 50,
        };
        assert!(HnswIndex::new(4, params).is_err());
    }
}
