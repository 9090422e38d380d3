//! Multi-signal ranking
//!
//! Two modes. When similarity scores from the index are available they are
//! the only signal: embedding similarity already encodes semantic relevance,
//! so candidates are ordered by descending score with a stable sort. Without
//! scores a weighted rule-based score is computed from name/description/tag
//! matches, category membership, price proximity, and rating. Callers only
//! ever see the resulting order, never a score.

use crate::catalog::Item;
use crate::extract::Preferences;
use crate::index::ScoredItem;
use std::cmp::Ordering;

const WEIGHT_EXACT_NAME: f64 = 100.0;
const WEIGHT_PARTIAL_NAME: f64 = 50.0;
const WEIGHT_KEYWORD_IN_NAME: f64 = 10.0;
const WEIGHT_KEYWORD_IN_DESCRIPTION: f64 = 5.0;
const WEIGHT_TAG_FUZZY: f64 = 8.0;
const WEIGHT_CATEGORY: f64 = 15.0;
const WEIGHT_PRICE_PROXIMITY: f64 = 5.0;
const WEIGHT_RATING: f64 = 2.0;

/// Order candidates by relevance.
///
/// Ranking is idempotent: re-ranking an already-ranked list with the same
/// inputs reproduces the same order.
pub fn rank_items(
    candidates: Vec<Item>,
    query: &str,
    scored: &[ScoredItem],
    prefs: &Preferences,
) -> Vec<Item> {
    if candidates.is_empty() {
        return candidates;
    }

    if !scored.is_empty() {
        return rank_by_similarity(scored);
    }

    rank_by_heuristics(candidates, query, prefs)
}

/// Primary path: pure descending similarity, stable on ties
fn rank_by_similarity(scored: &[ScoredItem]) -> Vec<Item> {
    let mut ordered: Vec<&ScoredItem> = scored.iter().collect();
    ordered.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    ordered.into_iter().map(|s| s.item.clone()).collect()
}

/// Fallback path: weighted rule-based relevance
fn rank_by_heuristics(candidates: Vec<Item>, query: &str, prefs: &Preferences) -> Vec<Item> {
    let query_lower = query.to_lowercase();

    let mut scored: Vec<(Item, f64)> = candidates
        .into_iter()
        .map(|item| {
            let score = relevance_score(&item, &query_lower, prefs);
            (item, score)
        })
        .collect();

    // Stable: equal scores keep input order
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored.into_iter().map(|(item, _)| item).collect()
}

fn relevance_score(item: &Item, query_lower: &str, prefs: &Preferences) -> f64 {
    let mut score = 0.0;

    let name_lower = item.name.to_lowercase();
    let desc_lower = item
        .description
        .as_deref()
        .unwrap_or("")
        .to_lowercase();
    let tags_lower: Vec<String> = item.tags.iter().map(|t| t.to_lowercase()).collect();

    if query_lower == name_lower {
        score += WEIGHT_EXACT_NAME;
    } else if name_lower.contains(query_lower) {
        score += WEIGHT_PARTIAL_NAME;
    }

    for keyword in &prefs.keywords {
        if name_lower.contains(keyword) {
            score += WEIGHT_KEYWORD_IN_NAME;
        }
        if desc_lower.contains(keyword) {
            score += WEIGHT_KEYWORD_IN_DESCRIPTION;
        }
        // Fuzzy containment either way: keyword inside tag or tag inside keyword
        if tags_lower
            .iter()
            .any(|tag| tag.contains(keyword) || keyword.contains(tag.as_str()))
        {
            score += WEIGHT_TAG_FUZZY;
        }
    }

    if prefs.categories.contains(&item.category) {
        score += WEIGHT_CATEGORY;
    }

    if let Some(budget_max) = prefs.budget_max {
        if budget_max > 0.0 && item.price <= budget_max {
            score += (1.0 - item.price / budget_max) * WEIGHT_PRICE_PROXIMITY;
        }
    }

    score += f64::from(item.rating_or_zero()) * WEIGHT_RATING;

    score
}
