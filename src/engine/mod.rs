//! Recommendation orchestrator
//!
//! Composes extraction, index search, filtering, and ranking into one
//! request/response cycle. The orchestrator owns no state beyond the ingested
//! index and is safely callable repeatedly with different queries.

use crate::catalog::{Catalog, Item};
use crate::config::Config;
use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::extract::PreferenceExtractor;
use crate::filter::filter_items;
use crate::index::{HnswParams, ScoredItem, SimilarityIndex};
use crate::rank::rank_items;
use std::sync::Arc;

/// The ordered result of one request
#[derive(Debug, Clone)]
pub struct Recommendation {
    /// Ranked items, best first
    pub items: Vec<Item>,
    /// Status line derived from the result count, for the presentation layer
    pub summary: String,
}

/// Per-request tunables, defaulted from configuration
#[derive(Debug, Clone, Copy)]
pub struct RequestOptions {
    pub top_k: usize,
    pub similarity_threshold: f32,
}

/// Retrieval-and-ranking engine over one ingested catalog
pub struct Recommender {
    extractor: PreferenceExtractor,
    index: SimilarityIndex,
    defaults: RequestOptions,
    search_multiplier: usize,
}

impl Recommender {
    /// Build an engine from configuration and an embedding provider, then
    /// ingest the catalog. Ingest happens once, before any queries.
    pub fn new(
        config: &Config,
        provider: Arc<dyn EmbeddingProvider>,
        catalog: &Catalog,
    ) -> Result<Self> {
        let params = HnswParams {
            ef_construction: config.index.hnsw_ef_construction,
            m: config.index.hnsw_m,
            ef_search: config.index.hnsw_ef_search,
        };

        let mut index = SimilarityIndex::new(provider, config.index.backend, params)?;
        index.ingest(&catalog.items);

        Ok(Self {
            extractor: PreferenceExtractor::new(),
            index,
            defaults: RequestOptions {
                top_k: config.engine.top_k,
                similarity_threshold: config.engine.similarity_threshold,
            },
            search_multiplier: config.engine.search_multiplier,
        })
    }

    /// Run one request with the configured defaults
    pub fn recommend(&self, query: &str) -> Recommendation {
        self.recommend_with(query, self.defaults)
    }

    /// Run one request: extract -> over-fetch search -> filter -> rank -> truncate
    pub fn recommend_with(&self, query: &str, options: RequestOptions) -> Recommendation {
        let prefs = self.extractor.extract(query);

        // Over-fetch so the filter has room to narrow
        let scored = self.index.search(
            query,
            options.top_k.saturating_mul(self.search_multiplier),
            options.similarity_threshold,
        );
        let candidates: Vec<Item> = scored.iter().map(|s| s.item.clone()).collect();

        let filtered = filter_items(candidates, &prefs);

        // Similarity pairs restricted to the surviving candidates
        let filtered_scores: Vec<ScoredItem> = scored
            .iter()
            .filter(|s| filtered.iter().any(|item| item.id == s.item.id))
            .cloned()
            .collect();

        let mut items = rank_items(filtered, query, &filtered_scores, &prefs);
        items.truncate(options.top_k);

        let summary = summarize(&items);
        tracing::info!(
            query,
            results = items.len(),
            backend = ?self.index.active_backend(),
            "request complete"
        );

        Recommendation { items, summary }
    }

    /// Number of items in the ingested corpus
    pub fn corpus_size(&self) -> usize {
        self.index.len()
    }
}

/// Status text derived purely from the result count
fn summarize(items: &[Item]) -> String {
    match items {
        [] => "No products found matching your criteria. Try adjusting your search.".to_string(),
        [only] => format!(
            "Found 1 matching product: {} (${:.2}, Rating: {:.1})",
            only.name,
            only.price,
            only.rating_or_zero()
        ),
        _ => format!(
            "Found {} matching products. Showing best matches sorted by relevance.",
            items.len()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::HashEmbedder;

    fn engine_for(catalog: &Catalog) -> Recommender {
        let provider = Arc::new(HashEmbedder::new(256));
        // Threshold 0: the hash embedder's similarities are weaker than the
        // ML model's, the pipeline behavior under test is the same
        let mut config = Config::default();
        config.engine.similarity_threshold = 0.0;
        Recommender::new(&config, provider, catalog).unwrap()
    }

    fn shoes_catalog() -> Catalog {
        Catalog::from_json(
            r#"[
            {"id": 1, "name": "Runner One Shoes", "category": "Shoes", "price": 129.99,
             "description": "Lightweight running shoes", "tags": ["shoes", "running"], "rating": 4.5},
            {"id": 2, "name": "Runner Two Shoes", "category": "Shoes", "price": 199.99,
             "description": "Cushioned running shoes", "tags": ["shoes", "running"], "rating": 4.6},
            {"id": 3, "name": "Trail Shoes", "category": "Shoes", "price": 249.99,
             "description": "Rugged trail shoes", "tags": ["shoes", "trail"], "rating": 4.4},
            {"id": 4, "name": "Luxury Shoes Cabinet", "category": "Furniture", "price": 649.99,
             "description": "Storage cabinet for shoes", "tags": ["storage"], "rating": 4.2}
        ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_shoes_under_500_scenario() {
        let engine = engine_for(&shoes_catalog());
        let rec = engine.recommend("shoes under 500");

        assert!(!rec.items.is_empty());
        // Hard price cap: nothing above 500 survives, whatever its category
        assert!(rec.items.iter().all(|i| i.price <= 500.0));
        assert!(!rec.items.iter().any(|i| i.id == 4));
    }

    #[test]
    fn test_empty_catalog_yields_empty_output() {
        let engine = engine_for(&Catalog::default());
        let rec = engine.recommend("anything at all");

        assert!(rec.items.is_empty());
        assert!(rec.summary.starts_with("No products found"));
    }

    #[test]
    fn test_repeatable_across_queries() {
        let engine = engine_for(&Catalog::sample());

        let first = engine.recommend("wireless headphones");
        let second = engine.recommend("gaming chair");
        let first_again = engine.recommend("wireless headphones");

        let ids = |r: &Recommendation| r.items.iter().map(|i| i.id).collect::<Vec<_>>();
        assert_eq!(ids(&first), ids(&first_again));
        assert_ne!(ids(&first), ids(&second));
    }

    #[test]
    fn test_truncates_to_top_k() {
        let engine = engine_for(&Catalog::sample());
        let rec = engine.recommend_with(
            "office desk",
            RequestOptions {
                top_k: 2,
                similarity_threshold: 0.0,
            },
        );
        assert!(rec.items.len() <= 2);
    }

    #[test]
    fn test_huge_limit_does_not_overflow() {
        let engine = engine_for(&Catalog::sample());
        let rec = engine.recommend_with(
            "wireless headphones",
            RequestOptions {
                top_k: usize::MAX,
                similarity_threshold: 0.0,
            },
        );
        assert!(rec.items.len() <= Catalog::sample().len());
    }

    #[test]
    fn test_single_result_summary_names_the_item() {
        let catalog = Catalog::from_json(
            r#"[{"id": 1, "name": "Only Thing", "category": "Home", "price": 10.0,
                 "description": "the only thing", "tags": ["thing"], "rating": 3.0}]"#,
        )
        .unwrap();
        let engine = engine_for(&catalog);

        let rec = engine.recommend("only thing");
        assert_eq!(rec.items.len(), 1);
        assert!(rec.summary.contains("Only Thing"));
        assert!(rec.summary.contains("$10.00"));
    }

    #[test]
    fn test_corpus_size_matches_catalog() {
        let engine = engine_for(&Catalog::sample());
        assert_eq!(engine.corpus_size(), Catalog::sample().len());
    }
}
