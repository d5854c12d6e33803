//! Per-option product counts over a whole snapshot.
//!
//! Counts ignore the active filters, so every option shows how many
//! products it would select on its own.

use super::{Availability, PriceRange};
use crate::catalog::Product;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Number of products matching one filter option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FacetCount {
    pub value: String,
    pub count: usize,
}

impl FacetCount {
    fn new(value: impl Into<String>, count: usize) -> Self {
        Self { value: value.into(), count }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Facets {
    pub total: usize,
    /// Categories in lexicographic order
    pub categories: Vec<FacetCount>,
    /// Every price bracket, `all` first
    pub price_ranges: Vec<FacetCount>,
    /// Every availability option, `all` first
    pub availability: Vec<FacetCount>,
    /// Tags present in the snapshot, most used first
    pub tags: Vec<FacetCount>,
}

impl Facets {
    pub fn from_products(products: &[Product]) -> Self {
        let mut categories: BTreeMap<&str, usize> = BTreeMap::new();
        let mut tags: BTreeMap<&str, usize> = BTreeMap::new();

        for product in products {
            *categories.entry(product.category.as_str()).or_default() += 1;

            let distinct: BTreeSet<&str> = product.tags.iter().map(String::as_str).collect();
            for tag in distinct {
                *tags.entry(tag).or_default() += 1;
            }
        }

        let price_ranges = PriceRange::ALL
            .iter()
            .map(|range| {
                FacetCount::new(range.label(), products.iter().filter(|p| range.contains(p.price)).count())
            })
            .collect();

        let availability = Availability::ALL
            .iter()
            .map(|option| {
                let count = products.iter().filter(|p| option.contains(p.is_available)).count();
                FacetCount::new(option.label(), count)
            })
            .collect();

        let mut tags: Vec<FacetCount> =
            tags.into_iter().map(|(tag, count)| FacetCount::new(tag, count)).collect();
        // Stable sort keeps ties in name order
        tags.sort_by(|a, b| b.count.cmp(&a.count));

        Self {
            total: products.len(),
            categories: categories
                .into_iter()
                .map(|(category, count)| FacetCount::new(category, count))
                .collect(),
            price_ranges,
            availability,
            tags,
        }
    }

    pub fn category_count(&self, category: &str) -> usize {
        find_count(&self.categories, category)
    }

    pub fn price_range_count(&self, range: PriceRange) -> usize {
        find_count(&self.price_ranges, range.label())
    }

    pub fn availability_count(&self, availability: Availability) -> usize {
        find_count(&self.availability, availability.label())
    }

    pub fn tag_count(&self, tag: &str) -> usize {
        find_count(&self.tags, tag)
    }
}

fn find_count(counts: &[FacetCount], value: &str) -> usize {
    counts.iter().find(|c| c.value == value).map_or(0, |c| c.count)
}
