//! Stock availability filter.

use super::Filter;
use crate::catalog::Product;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    #[default]
    All,
    InStock,
    OutOfStock,
}

impl Availability {
    pub const ALL: [Availability; 3] =
        [Availability::All, Availability::InStock, Availability::OutOfStock];

    pub fn contains(&self, is_available: bool) -> bool {
        match self {
            Availability::All => true,
            Availability::InStock => is_available,
            Availability::OutOfStock => !is_available,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Availability::All => "all",
            Availability::InStock => "in_stock",
            Availability::OutOfStock => "out_of_stock",
        }
    }
}

impl std::str::FromStr for Availability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "all" => Ok(Availability::All),
            "in_stock" => Ok(Availability::InStock),
            "out_of_stock" => Ok(Availability::OutOfStock),
            _ => Err(format!("Unknown availability: {}. Use: all, in_stock, out_of_stock", s)),
        }
    }
}

impl std::fmt::Display for Availability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Filters products by stock status.
pub struct AvailabilityFilter {
    availability: Availability,
}

impl AvailabilityFilter {
    pub fn new(availability: Availability) -> Self {
        Self { availability }
    }

    pub fn in_stock() -> Self {
        Self::new(Availability::InStock)
    }

    pub fn out_of_stock() -> Self {
        Self::new(Availability::OutOfStock)
    }
}

impl Filter for AvailabilityFilter {
    fn matches(&self, product: &Product) -> bool {
        self.availability.contains(product.is_available)
    }

    fn description(&self) -> String {
        match self.availability {
            Availability::All => "Availability: any".to_string(),
            Availability::InStock => "In stock only".to_string(),
            Availability::OutOfStock => "Out of stock only".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Normalizer;
    use serde_json::json;

    fn make_product(is_available: bool) -> Product {
        Normalizer::new().normalize(&json!({ "name": "Test", "isAvailable": is_available }))
    }

    #[test]
    fn test_in_stock() {
        let filter = AvailabilityFilter::in_stock();
        assert!(filter.matches(&make_product(true)));
        assert!(!filter.matches(&make_product(false)));
    }

    #[test]
    fn test_out_of_stock() {
        let filter = AvailabilityFilter::out_of_stock();
        assert!(!filter.matches(&make_product(true)));
        assert!(filter.matches(&make_product(false)));
    }

    #[test]
    fn test_parse() {
        assert_eq!("in_stock".parse::<Availability>().unwrap(), Availability::InStock);
        assert_eq!("Out-Of-Stock".parse::<Availability>().unwrap(), Availability::OutOfStock);
        assert_eq!("ALL".parse::<Availability>().unwrap(), Availability::All);
        assert!("maybe".parse::<Availability>().unwrap_err().contains("Unknown availability"));
    }

    #[test]
    fn test_serde_labels() {
        assert_eq!(serde_json::to_string(&Availability::InStock).unwrap(), "\"in_stock\"");
        let parsed: Availability = serde_json::from_str("\"out_of_stock\"").unwrap();
        assert_eq!(parsed, Availability::OutOfStock);
    }

    #[test]
    fn test_description() {
        assert_eq!(AvailabilityFilter::in_stock().description(), "In stock only");
        assert_eq!(AvailabilityFilter::out_of_stock().description(), "Out of stock only");
    }
}
