//! catalog-view - Product catalog browsing pipeline
//!
//! Loads heterogeneous product records from a feed, normalizes them into a
//! uniform schema, and serves filtered, paginated views with persisted
//! favorites.

pub mod catalog;
pub mod commands;
pub mod config;
pub mod controller;
pub mod error;
pub mod favorites;
pub mod filters;
pub mod format;
pub mod pager;

pub use catalog::{Normalizer, Product, ProductSource, RawProduct};
pub use config::Config;
pub use controller::{CatalogController, CatalogView, LoadState};
pub use error::CatalogError;
pub use favorites::FavoritesRegistry;
pub use filters::{Availability, FilterState, PriceRange};
pub use pager::{Page, PAGE_SIZE};
