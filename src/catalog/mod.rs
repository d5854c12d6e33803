//! Catalog ingestion: raw records, normalization, sources and the snapshot store.

pub mod models;
pub mod normalize;
pub mod source;
pub mod store;

pub use models::{Dimensions, Product, RawProduct};
pub use normalize::{normalize, Normalizer};
pub use source::{FileSource, HttpSource, ProductSource, StaticSource};
pub use store::{CatalogStore, Snapshot};
