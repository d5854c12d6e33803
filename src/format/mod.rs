//! Output formatting for catalog pages (table, JSON, markdown, CSV).

use crate::catalog::Product;
use crate::config::OutputFormat;
use crate::controller::{CatalogView, LoadState};
use crate::filters::{FacetCount, Facets};
use crate::pager::{Page, PageMarker};
use serde_json::json;

const NAME_WIDTH: usize = 40;

/// Formats catalog output.
pub struct Formatter {
    format: OutputFormat,
}

impl Formatter {
    /// Creates a new formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the current page of a catalog view, or its error.
    pub fn format_view(&self, view: &CatalogView<'_>) -> String {
        if self.format == OutputFormat::Json {
            return serde_json::to_string_pretty(view).unwrap_or_else(|_| "{}".to_string());
        }

        if view.state == LoadState::Failed {
            let message = view.error.unwrap_or("Failed to load products");
            return match self.format {
                OutputFormat::Csv => self.csv_header(),
                _ => format!("Error: {}", message),
            };
        }

        match &view.page {
            Some(page) => self.format_page(page, view.favorites, &view.page_links),
            None => match self.format {
                OutputFormat::Csv => self.csv_header(),
                _ => "No products found.".to_string(),
            },
        }
    }

    /// Formats one page of products. `favorites` are marked in table and markdown output.
    pub fn format_page(
        &self,
        page: &Page<'_>,
        favorites: &[String],
        links: &[PageMarker],
    ) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(page).unwrap_or_else(|_| "{}".to_string())
            }
            OutputFormat::Table => self.table_page(page, favorites, links),
            OutputFormat::Markdown => self.markdown_page(page, favorites),
            OutputFormat::Csv => self.csv_products(page.items),
        }
    }

    /// Formats the category list.
    pub fn format_categories(&self, categories: &[String]) -> String {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(categories).unwrap_or_else(|_| "[]".to_string())
            }
            OutputFormat::Csv => {
                let mut lines = vec!["category".to_string()];
                lines.extend(categories.iter().map(|c| Self::csv_escape(c)));
                lines.join("\n")
            }
            OutputFormat::Markdown => {
                categories.iter().map(|c| format!("- {}", c)).collect::<Vec<_>>().join("\n")
            }
            OutputFormat::Table => {
                if categories.is_empty() {
                    "No categories.".to_string()
                } else {
                    categories.join("\n")
                }
            }
        }
    }

    /// Formats facet counts grouped by filter dimension.
    pub fn format_facets(&self, facets: &Facets) -> String {
        let groups: [(&str, &[FacetCount]); 4] = [
            ("category", &facets.categories),
            ("price_range", &facets.price_ranges),
            ("availability", &facets.availability),
            ("tag", &facets.tags),
        ];

        match self.format {
            OutputFormat::Json => {
                serde_json::to_string_pretty(facets).unwrap_or_else(|_| "{}".to_string())
            }
            OutputFormat::Csv => {
                let mut lines = vec!["facet,value,count".to_string()];
                for (name, counts) in groups {
                    for c in counts {
                        lines.push(format!("{},{},{}", name, Self::csv_escape(&c.value), c.count));
                    }
                }
                lines.join("\n")
            }
            OutputFormat::Markdown => {
                let mut lines = Vec::new();
                for (name, counts) in groups {
                    lines.push(format!("### {}", name));
                    lines.push(String::new());
                    lines.push("| Value | Count |".to_string());
                    lines.push("|-------|-------|".to_string());
                    for c in counts {
                        lines.push(format!("| {} | {} |", c.value, c.count));
                    }
                    lines.push(String::new());
                }
                lines.push(format!("*{}*", product_count(facets.total)));
                lines.join("\n")
            }
            OutputFormat::Table => {
                let mut lines = Vec::new();
                for (name, counts) in groups {
                    lines.push(format!("{}:", name));
                    for c in counts {
                        lines.push(format!("  {:<24} {:>5}", c.value, c.count));
                    }
                }
                lines.push(String::new());
                lines.push(format!("Total: {}", product_count(facets.total)));
                lines.join("\n")
            }
        }
    }

    /// Formats the persisted favorite ids.
    pub fn format_favorites(&self, ids: &[String]) -> String {
        match self.format {
            OutputFormat::Json => json!({ "favorites": ids }).to_string(),
            OutputFormat::Csv => {
                let mut lines = vec!["id".to_string()];
                lines.extend(ids.iter().map(|id| Self::csv_escape(id)));
                lines.join("\n")
            }
            OutputFormat::Markdown => {
                ids.iter().map(|id| format!("- {}", id)).collect::<Vec<_>>().join("\n")
            }
            OutputFormat::Table => {
                if ids.is_empty() {
                    "No favorites.".to_string()
                } else {
                    ids.join("\n")
                }
            }
        }
    }

    // Table formatting

    fn table_page(&self, page: &Page<'_>, favorites: &[String], links: &[PageMarker]) -> String {
        let id_width = 12;
        let price_width = 10;
        let stock_width = 5;
        let category_width = 16;
        let name_width = NAME_WIDTH;

        let mut lines = Vec::new();

        lines.push(format!(
            "   {:<id_width$}  {:>price_width$}  {:<stock_width$}  {:<category_width$}  {}",
            "ID", "Price", "Stock", "Category", "Name"
        ));
        lines.push(format!(
            "   {:-<id_width$}  {:-<price_width$}  {:-<stock_width$}  {:-<category_width$}  {:-<name_width$}",
            "", "", "", "", ""
        ));

        for product in page.items {
            let marker = if favorites.contains(&product.id) { "*" } else { " " };
            let stock = if product.is_available { "Yes" } else { "No" };

            lines.push(format!(
                "{}  {:<id_width$}  {:>price_width$}  {:<stock_width$}  {:<category_width$}  {}",
                marker,
                truncate(&product.id, id_width),
                price_label(product),
                stock,
                truncate(&product.category, category_width),
                truncate(&product.name, NAME_WIDTH)
            ));
        }

        lines.push(String::new());
        lines.push(format!(
            "Page {} of {} ({})",
            page.page_number,
            page.total_pages,
            product_count(page.total_items)
        ));

        if links.len() > 1 {
            lines.push(page_links(links, page.page_number));
        }

        lines.join("\n")
    }

    // Markdown formatting

    fn markdown_page(&self, page: &Page<'_>, favorites: &[String]) -> String {
        let mut lines = Vec::new();

        lines.push("| | ID | Price | Stock | Category | Name |".to_string());
        lines.push("|-|----|-------|-------|----------|------|".to_string());

        for product in page.items {
            let marker = if favorites.contains(&product.id) { "★" } else { "" };
            let stock = if product.is_available { "✓" } else { "" };

            lines.push(format!(
                "| {} | {} | {} | {} | {} | {} |",
                marker,
                product.id,
                price_label(product),
                stock,
                product.category,
                truncate(&product.name, NAME_WIDTH)
            ));
        }

        lines.push(String::new());
        lines.push(format!(
            "*Page {} of {}, {}*",
            page.page_number,
            page.total_pages,
            product_count(page.total_items)
        ));

        lines.join("\n")
    }

    // CSV formatting

    fn csv_header(&self) -> String {
        "id,name,price,category,available,status,tags,created_at".to_string()
    }

    fn csv_products(&self, products: &[Product]) -> String {
        let mut lines = Vec::new();
        lines.push(self.csv_header());

        for product in products {
            lines.push(format!(
                "{},{},{},{},{},{},{},{}",
                Self::csv_escape(&product.id),
                Self::csv_escape(&product.name),
                product.price,
                Self::csv_escape(&product.category),
                product.is_available,
                Self::csv_escape(&product.status),
                Self::csv_escape(&product.tags.join(";")),
                product.created_at.to_rfc3339()
            ));
        }

        lines.join("\n")
    }

    fn csv_escape(s: &str) -> String {
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s.to_string()
        }
    }
}

fn product_count(n: usize) -> String {
    if n == 1 {
        "1 product".to_string()
    } else {
        format!("{} products", n)
    }
}

fn price_label(product: &Product) -> String {
    if product.is_free() {
        "Free".to_string()
    } else {
        format!("{:.2}", product.price)
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() > width {
        let kept: String = s.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        s.to_string()
    }
}

fn page_links(links: &[PageMarker], current: usize) -> String {
    links
        .iter()
        .map(|marker| match marker {
            PageMarker::Number(n) if *n == current => format!("[{}]", n),
            PageMarker::Number(n) => n.to_string(),
            PageMarker::Gap => "...".to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
