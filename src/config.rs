//! Configuration management with TOML, environment variables, and CLI overrides.

use crate::catalog::{FileSource, HttpSource, ProductSource};
use crate::favorites::JsonFileStore;
use crate::filters::{parse_category, Availability, FilterState, PriceRange};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Product feed URL
    #[serde(default)]
    pub source_url: Option<String>,

    /// Local JSON file used instead of a URL
    #[serde(default)]
    pub source_file: Option<PathBuf>,

    /// Proxy URL (e.g., socks5://host:port)
    #[serde(default)]
    pub proxy: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Artificial delay before a file source answers
    #[serde(default)]
    pub simulated_latency_ms: u64,

    /// Probability (0.0-1.0) that a file source load fails
    #[serde(default)]
    pub failure_rate: f64,

    /// Where favorites are persisted
    #[serde(default)]
    pub favorites_path: Option<PathBuf>,

    /// Output format
    #[serde(default)]
    pub format: OutputFormat,

    /// Filter: category ("all" selects every category)
    #[serde(default)]
    pub category: Option<String>,

    /// Filter: price bracket
    #[serde(default)]
    pub price_range: PriceRange,

    /// Filter: stock status
    #[serde(default)]
    pub availability: Availability,

    /// Filter: tags, any of which must be present
    #[serde(default)]
    pub tags: Vec<String>,

    /// Filter: free-text search over name and description
    #[serde(default)]
    pub search: Option<String>,

    /// Filter: favorites only
    #[serde(default)]
    pub favorites_only: bool,
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_url: None,
            source_file: None,
            proxy: None,
            timeout_secs: default_timeout_secs(),
            simulated_latency_ms: 0,
            failure_rate: 0.0,
            favorites_path: None,
            format: OutputFormat::Table,
            category: None,
            price_range: PriceRange::All,
            availability: Availability::All,
            tags: Vec::new(),
            search: None,
            favorites_only: false,
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading config from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Loads configuration with fallback to default locations.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit_path {
            return Self::from_file(path);
        }

        let local_config = Path::new("config.toml");
        if local_config.exists() {
            debug!("Found config.toml in current directory");
            return Self::from_file(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("catalog-view").join("config.toml");
            if xdg_config.exists() {
                debug!("Found config in XDG config directory");
                return Self::from_file(xdg_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Applies environment variable overrides.
    pub fn with_env(mut self) -> Self {
        if let Ok(url) = std::env::var("CATALOG_SOURCE_URL") {
            self.use_source_url(url);
        }

        if let Ok(file) = std::env::var("CATALOG_SOURCE_FILE") {
            self.use_source_file(file);
        }

        if let Ok(proxy) = std::env::var("CATALOG_PROXY") {
            self.proxy = Some(proxy);
        }

        if let Ok(path) = std::env::var("CATALOG_FAVORITES") {
            self.favorites_path = Some(PathBuf::from(path));
        }

        if let Ok(timeout) = std::env::var("CATALOG_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.timeout_secs = t;
            }
        }

        self
    }

    /// Selects an HTTP source, replacing any file source from a lower layer.
    pub fn use_source_url(&mut self, url: impl Into<String>) {
        self.source_url = Some(url.into());
        self.source_file = None;
    }

    /// Selects a file source, replacing any URL from a lower layer.
    pub fn use_source_file(&mut self, path: impl Into<PathBuf>) {
        self.source_file = Some(path.into());
        self.source_url = None;
    }

    /// The configured default filters.
    pub fn filter_state(&self) -> FilterState {
        FilterState {
            category: self.category.as_deref().and_then(parse_category),
            price_range: self.price_range,
            availability: self.availability,
            tags: self.tags.iter().cloned().collect(),
            search: self.search.clone().unwrap_or_default(),
            favorites_only: self.favorites_only,
        }
    }

    /// Builds the product source. When a single file sets both, the file wins.
    pub fn source(&self) -> Result<Box<dyn ProductSource>> {
        if let Some(path) = &self.source_file {
            let source = FileSource::new(path)
                .with_latency(self.simulated_latency_ms)
                .with_failure_rate(self.failure_rate);
            return Ok(Box::new(source));
        }

        if let Some(url) = &self.source_url {
            let source = HttpSource::with_options(
                url,
                self.proxy.as_deref(),
                Duration::from_secs(self.timeout_secs),
            )
            .context("Failed to create HTTP client")?;
            return Ok(Box::new(source));
        }

        bail!("No product source configured. Use --source-url or --source-file")
    }

    /// Resolves the favorites file location.
    pub fn favorites_path(&self) -> Result<PathBuf> {
        match &self.favorites_path {
            Some(path) => Ok(path.clone()),
            None => JsonFileStore::default_path()
                .context("Could not determine a data directory for favorites"),
        }
    }

    pub fn favorites_store(&self) -> Result<JsonFileStore> {
        Ok(JsonFileStore::new(self.favorites_path()?))
    }
}

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Markdown,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use: table, json, markdown, csv", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Markdown => write!(f, "markdown"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
