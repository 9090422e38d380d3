//! Preference extraction
//!
//! Parses a free-text query into a structured constraint profile. Extraction
//! never fails: absent signals leave the corresponding field at its default.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Structured constraints parsed from a free-text query
///
/// Created fresh per query and never mutated after extraction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Preferences {
    /// Lower price bound, if the query expressed one
    pub budget_min: Option<f64>,

    /// Upper price bound, if the query expressed one
    pub budget_max: Option<f64>,

    /// Requested categories in order of appearance, deduplicated
    pub categories: Vec<String>,

    /// Requested features, deduplicated
    pub features: Vec<String>,

    /// Minimum rating constraint (0 means unconstrained)
    pub rating_min: f32,

    /// Ranking keywords in order of appearance, duplicates preserved
    pub keywords: Vec<String>,
}

impl Preferences {
    /// True when no price/category/feature/rating constraint is set.
    /// Such a profile matches every item.
    pub fn is_unconstrained(&self) -> bool {
        self.budget_min.is_none()
            && self.budget_max.is_none()
            && self.categories.is_empty()
            && self.features.is_empty()
            && self.rating_min <= 0.0
    }
}

/// Substring keyword -> feature mapping
const FEATURE_KEYWORDS: &[(&str, &str)] = &[
    ("wireless", "wireless"),
    ("wired", "wired"),
    ("ergonomic", "ergonomic"),
    ("gaming", "gaming"),
    ("mechanical", "mechanical"),
    ("portable", "portable"),
    ("lightweight", "lightweight"),
    ("noise-cancelling", "noise-cancelling"),
    ("noise cancelling", "noise-cancelling"),
    ("smart", "smart"),
    ("waterproof", "waterproof"),
    ("rgb", "rgb"),
    ("professional", "professional"),
    ("budget", "budget"),
    ("premium", "premium"),
];

/// Substring keyword -> category mapping: direct category names plus
/// related nouns that imply a category
const CATEGORY_KEYWORDS: &[(&str, &str)] = &[
    ("electronics", "Electronics"),
    ("furniture", "Furniture"),
    ("home", "Home"),
    ("shoes", "Shoes"),
    ("chair", "Furniture"),
    ("desk", "Furniture"),
    ("monitor", "Electronics"),
    ("keyboard", "Electronics"),
    ("mouse", "Electronics"),
    ("headphones", "Electronics"),
    ("laptop", "Electronics"),
    ("tablet", "Electronics"),
    ("lamp", "Home"),
    ("light", "Home"),
    ("speaker", "Electronics"),
];

/// Words excluded from ranking keywords
const STOP_WORDS: &[&str] = &[
    "under", "over", "with", "that", "this", "from", "between", "and", "the",
];

/// Parses free-text queries into [`Preferences`]
pub struct PreferenceExtractor {
    under_re: Regex,
    between_re: Regex,
    range_re: Regex,
    number_re: Regex,
}

impl PreferenceExtractor {
    pub fn new() -> Self {
        // Numbers are whole dollars or dollars-and-cents with two decimals
        Self {
            under_re: Regex::new(r"(?:under|below)\s+\$?(\d+(?:\.\d{2})?)")
                .expect("hardcoded regex"),
            between_re: Regex::new(r"between\s+\$?(\d+(?:\.\d{2})?)\s+and\s+\$?(\d+(?:\.\d{2})?)")
                .expect("hardcoded regex"),
            range_re: Regex::new(r"\$(\d+(?:\.\d{2})?)\s*(?:to|-|and)\s*\$(\d+(?:\.\d{2})?)")
                .expect("hardcoded regex"),
            number_re: Regex::new(r"\d+(?:\.\d{2})?").expect("hardcoded regex"),
        }
    }

    /// Extract a preference profile from a query. Never fails.
    pub fn extract(&self, query: &str) -> Preferences {
        let query_lower = query.to_lowercase();
        let mut prefs = Preferences::default();

        self.extract_budget(query, &query_lower, &mut prefs);
        self.extract_features(&query_lower, &mut prefs);
        self.extract_categories(&query_lower, &mut prefs);
        self.extract_keywords(&query_lower, &mut prefs);

        tracing::debug!(
            budget_min = ?prefs.budget_min,
            budget_max = ?prefs.budget_max,
            categories = ?prefs.categories,
            features = ?prefs.features,
            "extracted preferences"
        );

        prefs
    }

    /// Price parsing with a fixed priority order; the first matching rule
    /// wins. A malformed range (min > max) is normalized, never rejected.
    fn extract_budget(&self, query: &str, query_lower: &str, prefs: &mut Preferences) {
        if let Some(caps) = self.under_re.captures(query_lower) {
            prefs.budget_max = parse_amount(&caps[1]);
            return;
        }

        if let Some(caps) = self.between_re.captures(query_lower) {
            set_range(prefs, parse_amount(&caps[1]), parse_amount(&caps[2]));
            return;
        }

        if let Some(caps) = self.range_re.captures(query_lower) {
            set_range(prefs, parse_amount(&caps[1]), parse_amount(&caps[2]));
            return;
        }

        // No explicit price pattern: fall back to bare numeric literals in
        // the raw query. A single number only counts as a cap when the query
        // also hints downward ("under"/"below"/"less"). This is knowingly
        // imprecise for queries like "16 GB monitor"; the trade-off is
        // accepted rather than guessing intent.
        let numbers: Vec<f64> = self
            .number_re
            .find_iter(query)
            .filter_map(|m| m.as_str().parse::<f64>().ok())
            .collect();

        match numbers.len() {
            0 => {}
            1 => {
                let n = numbers[0];
                let hints_cap = query_lower.contains("under")
                    || query_lower.contains("below")
                    || query_lower.contains("less");
                if n > 20.0 && hints_cap {
                    prefs.budget_max = Some(n);
                }
            }
            _ => {
                let min = numbers.iter().cloned().fold(f64::INFINITY, f64::min);
                let max = numbers.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                prefs.budget_min = Some(min);
                prefs.budget_max = Some(max);
            }
        }
    }

    fn extract_features(&self, query_lower: &str, prefs: &mut Preferences) {
        for (keyword, feature) in FEATURE_KEYWORDS {
            if query_lower.contains(keyword) && !prefs.features.iter().any(|f| f == feature) {
                prefs.features.push((*feature).to_string());
            }
        }
    }

    fn extract_categories(&self, query_lower: &str, prefs: &mut Preferences) {
        for (keyword, category) in CATEGORY_KEYWORDS {
            if query_lower.contains(keyword) && !prefs.categories.iter().any(|c| c == category) {
                prefs.categories.push((*category).to_string());
            }
        }
    }

    fn extract_keywords(&self, query_lower: &str, prefs: &mut Preferences) {
        prefs.keywords = query_lower
            .split_whitespace()
            .filter(|w| w.len() > 3 && !STOP_WORDS.contains(w))
            .map(str::to_string)
            .collect();
    }
}

impl Default for PreferenceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_amount(s: &str) -> Option<f64> {
    s.parse::<f64>().ok()
}

fn set_range(prefs: &mut Preferences, a: Option<f64>, b: Option<f64>) {
    if let (Some(a), Some(b)) = (a, b) {
        prefs.budget_min = Some(a.min(b));
        prefs.budget_max = Some(a.max(b));
    }
}
