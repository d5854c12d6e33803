//! Canonical product model produced by normalization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A raw record from a product source. Shape varies per record.
pub type RawProduct = serde_json::Value;

/// Placeholder for absent weight and dimension values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Category assigned to records without one.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Description assigned to records without one.
pub const NO_DESCRIPTION: &str = "No description";

/// Name assigned to records without one.
pub const UNNAMED: &str = "Unnamed product";

/// Status assigned to records without one.
pub const UNKNOWN_STATUS: &str = "unknown";

/// A normalized catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Identifier, unique within a snapshot
    pub id: String,
    /// Display name, never empty
    pub name: String,
    /// Price, never negative (0 means free)
    pub price: f64,
    pub category: String,
    pub description: String,
    pub weight: String,
    pub dimensions: Dimensions,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Whether the product can be ordered right now
    pub is_available: bool,
    pub status: String,
    /// Tags in source order
    pub tags: Vec<String>,
}

impl Product {
    /// Returns true if the product costs nothing.
    pub fn is_free(&self) -> bool {
        self.price == 0.0
    }

    /// Returns true if the product carries `tag`.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Physical dimensions, kept as source strings since units vary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: String,
    pub height: String,
    pub depth: String,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            width: NOT_AVAILABLE.to_string(),
            height: NOT_AVAILABLE.to_string(),
            depth: NOT_AVAILABLE.to_string(),
        }
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} x {} x {}", self.width, self.height, self.depth)
    }
}
