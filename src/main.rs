//! catalog-view - Browse a product catalog from the command line
//!
//! Filters, paginates and favorites products loaded from a JSON feed.

use anyhow::Result;
use catalog_view::commands::{BrowseCommand, FavoritesCommand};
use catalog_view::config::{Config, OutputFormat};
use catalog_view::filters::{Availability, PriceRange};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "catalog-view",
    version,
    about = "Browse, filter and favorite products from a catalog feed",
    long_about = "Loads product records from a URL or a local JSON file, normalizes them, and prints filtered pages of 12 products."
)]
struct Cli {
    /// URL of the product feed (a JSON array) [env: CATALOG_SOURCE_URL]
    #[arg(long, global = true, conflicts_with = "source_file")]
    source_url: Option<String>,

    /// Local JSON file to read products from instead of a URL [env: CATALOG_SOURCE_FILE]
    #[arg(long, global = true)]
    source_file: Option<PathBuf>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "CATALOG_PROXY")]
    proxy: Option<String>,

    /// Favorites file
    #[arg(long, global = true, env = "CATALOG_FAVORITES")]
    favorites: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Applies global flags on top of the file and environment layers.
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(url) = &self.source_url {
            config.use_source_url(url.clone());
        }
        if let Some(file) = &self.source_file {
            config.use_source_file(file.clone());
        }
        if let Some(proxy) = &self.proxy {
            config.proxy = Some(proxy.clone());
        }
        if let Some(path) = &self.favorites {
            config.favorites_path = Some(path.clone());
        }
        if let Some(format) = self.format {
            config.format = format;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show a page of products
    #[command(alias = "b")]
    Browse(BrowseArgs),

    /// List product categories
    Categories,

    /// Count products per filter option
    Facets,

    /// Add a product to favorites, or remove it if already there
    #[command(alias = "fav")]
    Favorite {
        /// Product id
        id: String,
    },

    /// List favorite product ids
    Favorites,
}

#[derive(Args)]
struct BrowseArgs {
    /// Category to show ("all" for every category)
    #[arg(long)]
    category: Option<String>,

    /// Price bracket: all, free, 0-50, 50-200, 200+
    #[arg(long)]
    price_range: Option<PriceRange>,

    /// Stock status: all, in_stock, out_of_stock
    #[arg(long)]
    availability: Option<Availability>,

    /// Tags, any of which must match (comma-separated)
    #[arg(long = "tag", value_delimiter = ',')]
    tags: Option<Vec<String>>,

    /// Free-text search over name and description
    #[arg(short, long)]
    search: Option<String>,

    /// Only show favorite products
    #[arg(long, overrides_with = "no_favorites_only")]
    favorites_only: bool,

    /// Show all products even if the config enables favorites-only
    #[arg(long, overrides_with = "favorites_only")]
    no_favorites_only: bool,

    /// Page number (clamped to the available pages)
    #[arg(short, long, default_value = "1")]
    page: usize,
}

impl BrowseArgs {
    /// Applies browse filters on top of the configured defaults.
    fn apply_overrides(&self, config: &mut Config) {
        if self.category.is_some() {
            config.category = self.category.clone();
        }
        if let Some(range) = self.price_range {
            config.price_range = range;
        }
        if let Some(a) = self.availability {
            config.availability = a;
        }
        if let Some(t) = &self.tags {
            config.tags = t.clone();
        }
        if self.search.is_some() {
            config.search = self.search.clone();
        }
        if self.favorites_only {
            config.favorites_only = true;
        } else if self.no_favorites_only {
            config.favorites_only = false;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();
    cli.apply_overrides(&mut config);

    match cli.command {
        Commands::Browse(args) => {
            args.apply_overrides(&mut config);

            let cmd = BrowseCommand::new(config);
            let output = cmd.execute(args.page).await?;
            println!("{}", output);
        }

        Commands::Categories => {
            let output = BrowseCommand::new(config).categories().await?;
            println!("{}", output);
        }

        Commands::Facets => {
            let output = BrowseCommand::new(config).facets().await?;
            println!("{}", output);
        }

        Commands::Favorite { id } => {
            let output = FavoritesCommand::new(config).toggle(&id)?;
            println!("{}", output);
        }

        Commands::Favorites => {
            let output = FavoritesCommand::new(config).list()?;
            println!("{}", output);
        }
    }

    Ok(())
}
