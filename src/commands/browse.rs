//! Browse command implementation.

use crate::catalog::ProductSource;
use crate::config::Config;
use crate::controller::{CatalogController, LoadState};
use crate::favorites::{FavoritesRegistry, FavoritesStore};
use crate::format::Formatter;
use anyhow::{anyhow, Result};
use tracing::{debug, info};

/// Loads the catalog and renders one filtered page, or a catalog summary.
pub struct BrowseCommand {
    config: Config,
}

impl BrowseCommand {
    /// Creates a new browse command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Renders page `page` of the filtered catalog.
    pub async fn execute(&self, page: usize) -> Result<String> {
        let controller = self.open_configured().await?;
        Ok(self.render_page(controller, page))
    }

    /// Renders a page with a provided source and favorites store (for testing).
    pub async fn execute_with_source(
        &self,
        source: impl ProductSource + 'static,
        store: impl FavoritesStore + 'static,
        page: usize,
    ) -> Result<String> {
        let controller = self.open(Box::new(source), FavoritesRegistry::load(store)).await?;
        Ok(self.render_page(controller, page))
    }

    /// Lists the distinct categories of the catalog.
    pub async fn categories(&self) -> Result<String> {
        let controller = self.open_configured().await?;
        Ok(Formatter::new(self.config.format).format_categories(controller.categories()))
    }

    /// Counts products per filter option over the whole catalog.
    pub async fn facets(&self) -> Result<String> {
        let controller = self.open_configured().await?;
        Ok(Formatter::new(self.config.format).format_facets(&controller.facets()))
    }

    fn render_page(&self, mut controller: CatalogController, page: usize) -> String {
        controller.go_to_page(page);
        if controller.current_page() != page {
            debug!("Requested page {} clamped to {}", page, controller.current_page());
        }

        info!(
            "Showing page {} of {} ({} matching products)",
            controller.current_page(),
            controller.total_pages(),
            controller.total_filtered()
        );

        Formatter::new(self.config.format).format_view(&controller.view())
    }

    async fn open_configured(&self) -> Result<CatalogController> {
        let source = self.config.source()?;
        let favorites = FavoritesRegistry::load(self.config.favorites_store()?);
        self.open(source, favorites).await
    }

    async fn open(
        &self,
        source: Box<dyn ProductSource>,
        favorites: FavoritesRegistry,
    ) -> Result<CatalogController> {
        let mut controller =
            CatalogController::from_boxed(source, favorites).with_filters(self.config.filter_state());

        if controller.load().await == LoadState::Failed {
            let message = controller.error_message().unwrap_or("Failed to load products");
            return Err(anyhow!("{}", message));
        }

        Ok(controller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticSource;
    use crate::config::OutputFormat;
    use crate::favorites::MemoryStore;
    use crate::filters::{Availability, PriceRange};
    use serde_json::{json, Value};

    fn make_records(count: usize) -> Vec<Value> {
        (0..count)
            .map(|i| {
                let category = if i % 2 == 0 { "lamps" } else { "chairs" };
                json!({
                    "productName": format!("Product {}", i),
                    "price": i * 25,
                    "category": category,
                    "isAvailable": i % 4 != 0,
                    "metadata": { "id": format!("id-{}", i) }
                })
            })
            .collect()
    }

    fn make_test_config() -> Config {
        Config { format: OutputFormat::Table, ..Config::default() }
    }

    #[tokio::test]
    async fn test_browse_first_page() {
        let cmd = BrowseCommand::new(make_test_config());
        let output = cmd
            .execute_with_source(StaticSource::records(make_records(13)), MemoryStore::new(), 1)
            .await
            .unwrap();

        assert!(output.contains("Product 0"));
        assert!(output.contains("Product 11"));
        assert!(!output.contains("Product 12"));
        assert!(output.contains("Page 1 of 2 (13 products)"));
    }

    #[tokio::test]
    async fn test_browse_clamps_page() {
        let cmd = BrowseCommand::new(make_test_config());
        let output = cmd
            .execute_with_source(StaticSource::records(make_records(13)), MemoryStore::new(), 9)
            .await
            .unwrap();

        assert!(output.contains("Product 12"));
        assert!(output.contains("Page 2 of 2 (13 products)"));
    }

    #[tokio::test]
    async fn test_browse_applies_configured_filters() {
        let config = Config {
            category: Some("lamps".to_string()),
            availability: Availability::InStock,
            price_range: PriceRange::From50To200,
            ..make_test_config()
        };
        let cmd = BrowseCommand::new(config);
        let output = cmd
            .execute_with_source(StaticSource::records(make_records(13)), MemoryStore::new(), 1)
            .await
            .unwrap();

        // Lamps are even, multiples of 4 are out of stock, and 50 itself is below 50-200
        let rows: Vec<&str> = output.lines().filter(|l| l.contains("id-")).collect();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].ends_with("Product 6"));
        assert!(output.contains("Page 1 of 1 (1 product)"));
    }

    #[tokio::test]
    async fn test_browse_favorites_only() {
        let config = Config { favorites_only: true, ..make_test_config() };
        let cmd = BrowseCommand::new(config);
        let store = MemoryStore::with_ids(&["id-3", "id-7"]);

        let output = cmd
            .execute_with_source(StaticSource::records(make_records(13)), store, 1)
            .await
            .unwrap();

        assert!(output.contains("Product 3"));
        assert!(output.contains("Product 7"));
        assert!(output.contains("(2 products)"));
    }

    #[tokio::test]
    async fn test_browse_no_matches() {
        let config = Config { search: Some("does-not-exist".to_string()), ..make_test_config() };
        let cmd = BrowseCommand::new(config);
        let output = cmd
            .execute_with_source(StaticSource::records(make_records(5)), MemoryStore::new(), 1)
            .await
            .unwrap();

        assert_eq!(output, "No products found.");
    }

    #[tokio::test]
    async fn test_browse_load_failure() {
        let cmd = BrowseCommand::new(make_test_config());
        let err = cmd
            .execute_with_source(StaticSource::failing("Database unavailable"), MemoryStore::new(), 1)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Database unavailable");
    }

    #[tokio::test]
    async fn test_browse_malformed_payload() {
        let cmd = BrowseCommand::new(make_test_config());
        let err = cmd
            .execute_with_source(
                StaticSource::new(json!({ "products": [] })),
                MemoryStore::new(),
                1,
            )
            .await
            .unwrap_err();

        assert!(err.to_string().contains("malformed response"));
    }

    #[tokio::test]
    async fn test_browse_json_output() {
        let config = Config { format: OutputFormat::Json, ..make_test_config() };
        let cmd = BrowseCommand::new(config);
        let output = cmd
            .execute_with_source(StaticSource::records(make_records(3)), MemoryStore::new(), 1)
            .await
            .unwrap();

        let parsed: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["state"], "ready");
        assert_eq!(parsed["page"]["items"].as_array().unwrap().len(), 3);
        assert_eq!(parsed["categories"], json!(["chairs", "lamps"]));
    }

    #[tokio::test]
    async fn test_categories_requires_source() {
        let cmd = BrowseCommand::new(make_test_config());
        let err = cmd.categories().await.unwrap_err();
        assert!(err.to_string().contains("No product source configured"));
    }
}
