//! Price bracket filter.

use super::Filter;
use crate::catalog::Product;
use serde::{Deserialize, Serialize};

/// Price brackets offered to shoppers.
///
/// Each paid bracket excludes its lower bound and includes its upper bound;
/// the top bracket is open-ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceRange {
    #[default]
    #[serde(rename = "all")]
    All,
    #[serde(rename = "free")]
    Free,
    #[serde(rename = "0-50")]
    UpTo50,
    #[serde(rename = "50-200")]
    From50To200,
    #[serde(rename = "200+")]
    Over200,
}

impl PriceRange {
    /// Every bracket, in display order.
    pub const ALL: [PriceRange; 5] =
        [PriceRange::All, PriceRange::Free, PriceRange::UpTo50, PriceRange::From50To200, PriceRange::Over200];

    /// Returns true if `price` falls in this bracket.
    pub fn contains(&self, price: f64) -> bool {
        match self {
            PriceRange::All => true,
            PriceRange::Free => price == 0.0,
            PriceRange::UpTo50 => price > 0.0 && price <= 50.0,
            PriceRange::From50To200 => price > 50.0 && price <= 200.0,
            PriceRange::Over200 => price > 200.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PriceRange::All => "all",
            PriceRange::Free => "free",
            PriceRange::UpTo50 => "0-50",
            PriceRange::From50To200 => "50-200",
            PriceRange::Over200 => "200+",
        }
    }
}

impl std::str::FromStr for PriceRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PriceRange::ALL
            .into_iter()
            .find(|range| range.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown price range: {}. Use: all, free, 0-50, 50-200, 200+", s))
    }
}

impl std::fmt::Display for PriceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Filters products by price bracket.
pub struct PriceFilter {
    range: PriceRange,
}

impl PriceFilter {
    pub fn new(range: PriceRange) -> Self {
        Self { range }
    }
}

impl Filter for PriceFilter {
    fn matches(&self, product: &Product) -> bool {
        self.range.contains(product.price)
    }

    fn description(&self) -> String {
        match self.range {
            PriceRange::All => "Price: any".to_string(),
            PriceRange::Free => "Price: free".to_string(),
            PriceRange::UpTo50 => "Price: $0.01 - $50.00".to_string(),
            PriceRange::From50To200 => "Price: $50.01 - $200.00".to_string(),
            PriceRange::Over200 => "Price: > $200.00".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Normalizer;
    use serde_json::json;

    fn make_product(price: f64) -> Product {
        Normalizer::new().normalize(&json!({ "name": "Test", "price": price }))
    }

    #[test]
    fn test_free() {
        let filter = PriceFilter::new(PriceRange::Free);
        assert!(filter.matches(&make_product(0.0)));
        assert!(!filter.matches(&make_product(0.01)));
    }

    #[test]
    fn test_up_to_50_boundaries() {
        let filter = PriceFilter::new(PriceRange::UpTo50);

        // Lower bound excluded, upper bound included
        assert!(!filter.matches(&make_product(0.0)));
        assert!(filter.matches(&make_product(0.01)));
        assert!(filter.matches(&make_product(50.0)));
        assert!(!filter.matches(&make_product(50.01)));
        assert!(!filter.matches(&make_product(200.0)));
    }

    #[test]
    fn test_50_to_200_boundaries() {
        let filter = PriceFilter::new(PriceRange::From50To200);
        assert!(!filter.matches(&make_product(50.0)));
        assert!(filter.matches(&make_product(50.01)));
        assert!(filter.matches(&make_product(200.0)));
        assert!(!filter.matches(&make_product(200.01)));
    }

    #[test]
    fn test_over_200_open_ended() {
        let filter = PriceFilter::new(PriceRange::Over200);
        assert!(!filter.matches(&make_product(200.0)));
        assert!(filter.matches(&make_product(200.01)));
        assert!(filter.matches(&make_product(1_000_000.0)));
    }

    #[test]
    fn test_all_matches_everything() {
        let filter = PriceFilter::new(PriceRange::All);
        for price in [0.0, 25.0, 50.0, 199.0, 5000.0] {
            assert!(filter.matches(&make_product(price)));
        }
    }

    #[test]
    fn test_brackets_partition_prices() {
        for price in [0.0, 0.5, 50.0, 50.5, 200.0, 200.5] {
            let hits = PriceRange::ALL[1..].iter().filter(|r| r.contains(price)).count();
            assert_eq!(hits, 1, "price {}", price);
        }
    }

    #[test]
    fn test_parse_and_display() {
        for range in PriceRange::ALL {
            assert_eq!(range.to_string().parse::<PriceRange>().unwrap(), range);
        }
        assert_eq!("FREE".parse::<PriceRange>().unwrap(), PriceRange::Free);

        let err = "cheap".parse::<PriceRange>().unwrap_err();
        assert!(err.contains("Unknown price range"));
    }

    #[test]
    fn test_serde_labels() {
        assert_eq!(serde_json::to_string(&PriceRange::Over200).unwrap(), "\"200+\"");
        let parsed: PriceRange = serde_json::from_str("\"0-50\"").unwrap();
        assert_eq!(parsed, PriceRange::UpTo50);
    }

    #[test]
    fn test_description() {
        assert_eq!(PriceFilter::new(PriceRange::UpTo50).description(), "Price: $0.01 - $50.00");
        assert_eq!(PriceFilter::new(PriceRange::Free).description(), "Price: free");
    }
}
