//! Catalog data model
//!
//! Items are supplied by an external catalog at ingest time and are immutable
//! for the lifetime of a session. The engine only reads them.

use crate::error::{RecoError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A single catalog item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Stable identity within the catalog
    pub id: u64,

    /// Display name
    pub name: String,

    /// Single category label (e.g. "Electronics")
    pub category: String,

    /// Non-negative price
    pub price: f64,

    /// Free-text description
    #[serde(default)]
    pub description: Option<String>,

    /// Tag set; order is irrelevant
    #[serde(default)]
    pub tags: Vec<String>,

    /// Rating in 0..=5, if the catalog carries one
    #[serde(default)]
    pub rating: Option<f32>,
}

impl Item {
    /// Build the composite text representation used as embedding input:
    /// name, description, and tags joined with spaces.
    pub fn composite_text(&self) -> String {
        let description = self.description.as_deref().unwrap_or("");
        format!("{} {} {}", self.name, description, self.tags.join(" "))
    }

    /// Rating with unrated items treated as 0
    pub fn rating_or_zero(&self) -> f32 {
        self.rating.unwrap_or(0.0)
    }
}

/// An ordered collection of items, loaded once per session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub items: Vec<Item>,
}

impl Catalog {
    /// Load a catalog from a JSON file (an array of items)
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| RecoError::Io {
            source: e,
            context: format!("Failed to read catalog file: {}", path.display()),
        })?;
        Self::from_json(&content)
    }

    /// Parse a catalog from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let items: Vec<Item> = serde_json::from_str(json).map_err(|e| RecoError::Json {
            source: e,
            context: "Failed to parse catalog JSON".to_string(),
        })?;

        for item in &items {
            if item.price < 0.0 {
                return Err(RecoError::Catalog(format!(
                    "Item {} ({}) has negative price {}",
                    item.id, item.name, item.price
                )));
            }
            if let Some(rating) = item.rating {
                if !(0.0..=5.0).contains(&rating) {
                    return Err(RecoError::Catalog(format!(
                        "Item {} ({}) has rating {} outside 0..=5",
                        item.id, item.name, rating
                    )));
                }
            }
        }

        Ok(Self { items })
    }

    /// Built-in sample catalog used by the demo command and tests
    pub fn sample() -> Self {
        let items: Vec<Item> = serde_json::from_str(SAMPLE_CATALOG)
            .expect("built-in sample catalog is valid JSON");
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Small product sample covering the categories the extractor knows about
const SAMPLE_CATALOG: &str = r#"[
  {"id": 1, "name": "MacBook Pro 16 inch", "category": "Electronics", "price": 2999.99,
   "description": "High-performance laptop with Apple M3 chip, perfect for professionals and creators",
   "tags": ["laptop", "portable", "professional", "powerful", "apple"], "rating": 4.9},
  {"id": 2, "name": "Dell XPS 15", "category": "Electronics", "price": 1999.99,
   "description": "Premium Windows laptop with powerful graphics and stunning display for work and gaming",
   "tags": ["laptop", "windows", "gaming", "professional"], "rating": 4.8},
  {"id": 3, "name": "Sony WH-1000XM5 Wireless Headphones", "category": "Electronics", "price": 399.99,
   "description": "Premium wireless headphones with industry-leading noise cancellation and 30-hour battery",
   "tags": ["wireless", "headphones", "audio", "noise-cancelling", "premium"], "rating": 4.9},
  {"id": 4, "name": "Bose QuietComfort Headphones", "category": "Electronics", "price": 349.99,
   "description": "Comfortable noise-cancelling headphones with excellent sound quality and portability",
   "tags": ["wireless", "headphones", "audio", "noise-cancelling"], "rating": 4.8},
  {"id": 5, "name": "JBL Flip Bluetooth Speaker", "category": "Electronics", "price": 129.99,
   "description": "Portable wireless speaker with great sound quality and water-resistant design",
   "tags": ["wireless", "speaker", "bluetooth", "portable", "waterproof"], "rating": 4.6},
  {"id": 6, "name": "Corsair K95 Platinum Mechanical Keyboard", "category": "Electronics", "price": 229.99,
   "description": "Premium mechanical keyboard with Cherry MX switches and macro keys for gaming",
   "tags": ["keyboard", "mechanical", "gaming", "rgb", "premium"], "rating": 4.8},
  {"id": 7, "name": "Logitech MX Master 3S Mouse", "category": "Electronics", "price": 99.99,
   "description": "Premium ergonomic mouse with precision scrolling and multi-device connectivity",
   "tags": ["mouse", "wireless", "ergonomic", "professional"], "rating": 4.9},
  {"id": 8, "name": "ASUS Gaming Monitor 144Hz", "category": "Electronics", "price": 349.99,
   "description": "High-refresh-rate gaming monitor with responsive display and adjustable stand",
   "tags": ["monitor", "gaming", "144hz", "responsive"], "rating": 4.6},
  {"id": 9, "name": "Herman Miller Aeron Office Chair", "category": "Furniture", "price": 1495.00,
   "description": "Premium ergonomic office chair with adjustable lumbar support and mesh back design",
   "tags": ["office", "chair", "ergonomic", "comfortable", "premium"], "rating": 4.9},
  {"id": 10, "name": "IKEA Markus Gaming Chair", "category": "Furniture", "price": 199.99,
   "description": "Affordable gaming chair with high back and padded armrests for comfort",
   "tags": ["office", "chair", "gaming", "budget-friendly"], "rating": 4.4},
  {"id": 11, "name": "Fully Jarvis Standing Desk", "category": "Furniture", "price": 599.99,
   "description": "Electric standing desk with adjustable height for ergonomic work positions",
   "tags": ["office", "furniture", "desk", "standing", "electric"], "rating": 4.8},
  {"id": 12, "name": "Small Computer Desk", "category": "Furniture", "price": 149.99,
   "description": "Compact desk ideal for small spaces, apartments, and dorm rooms",
   "tags": ["office", "furniture", "desk", "compact", "budget"], "rating": 4.3},
  {"id": 13, "name": "Philips Hue Smart Light Bulbs", "category": "Home", "price": 79.99,
   "description": "WiFi-enabled smart light bulbs with 16 million color options and voice control",
   "tags": ["smart", "home", "lights", "wifi", "color-changing"], "rating": 4.7},
  {"id": 14, "name": "LED Desk Lamp", "category": "Home", "price": 39.99,
   "description": "Adjustable LED desk lamp with touch controls and USB charging port",
   "tags": ["lamp", "home", "desk", "led", "charging"], "rating": 4.6}
]"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_text() {
        let item = Item {
            id: 1,
            name: "Test Keyboard".to_string(),
            category: "Electronics".to_string(),
            price: 49.99,
            description: Some("A keyboard for testing".to_string()),
            tags: vec!["keyboard".to_string(), "mechanical".to_string()],
            rating: Some(4.2),
        };

        assert_eq!(
            item.composite_text(),
            "Test Keyboard A keyboard for testing keyboard mechanical"
        );
    }

    #[test]
    fn test_composite_text_without_description() {
        let item = Item {
            id: 2,
            name: "Bare Item".to_string(),
            category: "Home".to_string(),
            price: 10.0,
            description: None,
            tags: vec![],
            rating: None,
        };

        assert_eq!(item.composite_text(), "Bare Item  ");
    }

    #[test]
    fn test_sample_catalog_loads() {
        let catalog = Catalog::sample();
        assert!(!catalog.is_empty());
        assert!(catalog.items.iter().any(|i| i.category == "Electronics"));
        assert!(catalog.items.iter().any(|i| i.category == "Furniture"));
        assert!(catalog.items.iter().any(|i| i.category == "Home"));
    }

    #[test]
    fn test_rejects_negative_price() {
        let json = r#"[{"id": 1, "name": "Bad", "category": "Home", "price": -5.0}]"#;
        assert!(Catalog::from_json(json).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_rating() {
        let json = r#"[{"id": 1, "name": "Bad", "category": "Home", "price": 5.0, "rating": 7.5}]"#;
        assert!(Catalog::from_json(json).is_err());
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"[{"id": 1, "name": "Minimal", "category": "Home", "price": 5.0}]"#;
        let catalog = Catalog::from_json(json).unwrap();
        let item = &catalog.items[0];
        assert!(item.description.is_none());
        assert!(item.tags.is_empty());
        assert_eq!(item.rating_or_zero(), 0.0);
    }
}
