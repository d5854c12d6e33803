//! CLI command implementations.

pub mod browse;
pub mod favorites;

pub use browse::BrowseCommand;
pub use favorites::FavoritesCommand;
