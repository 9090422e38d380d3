//! Constraint filtering
//!
//! Applies the extracted preferences to a candidate list in a fixed stage
//! order. Price and rating bounds are hard filters: the query stated an
//! explicit numeric promise, so it is honored even when it empties the set.
//! Category and feature signals come from heuristic keyword matches that may
//! miss valid items, so those stages are soft: each one keeps its input when
//! it would otherwise produce nothing. A final guard returns the original
//! input if every stage together emptied a non-empty candidate list.

use crate::catalog::Item;
use crate::extract::Preferences;

/// Narrow a candidate list according to a preference profile.
///
/// Never reduces a non-empty input to an empty output.
pub fn filter_items(candidates: Vec<Item>, prefs: &Preferences) -> Vec<Item> {
    if candidates.is_empty() {
        return candidates;
    }

    let original = candidates.clone();
    let mut working = candidates;

    // Stage 1+2: hard price bounds
    if let Some(min) = prefs.budget_min {
        working.retain(|item| item.price >= min);
    }
    if let Some(max) = prefs.budget_max {
        working.retain(|item| item.price <= max);
    }

    // Stage 3: soft category filter
    if !prefs.categories.is_empty() {
        let matched: Vec<Item> = working
            .iter()
            .filter(|item| {
                let item_category = item.category.to_lowercase();
                prefs
                    .categories
                    .iter()
                    .any(|c| item_category.contains(&c.to_lowercase()))
            })
            .cloned()
            .collect();

        if !matched.is_empty() {
            working = matched;
        } else {
            tracing::debug!("category filter matched nothing, keeping working set");
        }
    }

    // Stage 4: soft feature filter on tags
    if !prefs.features.is_empty() {
        let matched: Vec<Item> = working
            .iter()
            .filter(|item| prefs.features.iter().any(|f| item.tags.contains(f)))
            .cloned()
            .collect();

        if !matched.is_empty() {
            working = matched;
        } else {
            tracing::debug!("feature filter matched nothing, keeping working set");
        }
    }

    // Stage 5: hard rating floor
    if prefs.rating_min > 0.0 {
        working.retain(|item| item.rating_or_zero() >= prefs.rating_min);
    }

    // A non-empty input never yields an empty output
    if working.is_empty() {
        tracing::debug!("all stages emptied the candidate set, returning pre-filter input");
        original
    } else {
        working
    }
}
