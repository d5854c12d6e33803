//! Product sources: the fetch collaborator that supplies raw records.

use crate::catalog::models::RawProduct;
use crate::error::{CatalogError, GENERIC_FETCH_MESSAGE};
use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::Rng;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};
use wreq::Client;

/// Supplies raw product records - enables swapping transports and test doubles.
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Fetches every raw record. Any payload that is not a list is an error.
    async fn fetch_products(&self) -> Result<Vec<RawProduct>, CatalogError>;

    /// Short human-readable description of where records come from.
    fn describe(&self) -> String;
}

/// Parses a response body into raw records.
pub fn parse_payload(body: &str) -> Result<Vec<RawProduct>, CatalogError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| CatalogError::malformed(format!("invalid JSON: {}", e)))?;
    into_records(value)
}

/// Accepts a JSON array as the record list and rejects everything else.
pub fn into_records(value: Value) -> Result<Vec<RawProduct>, CatalogError> {
    match value {
        Value::Array(records) => Ok(records),
        other => {
            Err(CatalogError::malformed(format!("expected an array, got {}", json_kind(&other))))
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Extracts `{"error": "..."}` from an error response body.
fn server_error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// Fetches the catalog from an HTTP endpoint returning a JSON array.
pub struct HttpSource {
    client: Client,
    url: String,
}

impl HttpSource {
    /// Creates a source with default timeouts and no proxy.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        Self::with_options(url, None, Duration::from_secs(30))
    }

    /// Creates a source with an optional proxy and request timeout.
    pub fn with_options(
        url: impl Into<String>,
        proxy: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let mut builder = Client::builder()
            .gzip(true)
            .brotli(true)
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().context("Failed to create HTTP client")?;

        Ok(Self { client, url: url.into() })
    }
}

#[async_trait]
impl ProductSource for HttpSource {
    async fn fetch_products(&self) -> Result<Vec<RawProduct>, CatalogError> {
        info!("Fetching products from {}", self.url);

        let response =
            self.client.get(&self.url).header("Accept", "application/json").send().await.map_err(
                |e| {
                    warn!("Request to {} failed: {}", self.url, e);
                    CatalogError::fetch(GENERIC_FETCH_MESSAGE)
                },
            )?;

        let status = response.status();
        debug!("Response status: {}", status);

        let body = response.text().await.map_err(|e| {
            warn!("Failed to read response body: {}", e);
            CatalogError::fetch(GENERIC_FETCH_MESSAGE)
        })?;

        if !status.is_success() {
            warn!("Product request failed with status: {}", status);
            let message =
                server_error_message(&body).unwrap_or_else(|| GENERIC_FETCH_MESSAGE.to_string());
            return Err(CatalogError::fetch(message));
        }

        parse_payload(&body)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Reads the catalog from a local JSON file.
///
/// Latency and failure rate are explicit fault-injection knobs for demos;
/// both are off by default.
pub struct FileSource {
    path: PathBuf,
    latency: Duration,
    failure_rate: f64,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), latency: Duration::ZERO, failure_rate: 0.0 }
    }

    /// Delays every fetch by `ms` milliseconds.
    pub fn with_latency(mut self, ms: u64) -> Self {
        self.latency = Duration::from_millis(ms);
        self
    }

    /// Fails each fetch with probability `rate` (clamped to 0.0-1.0).
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        self.failure_rate = if rate.is_nan() { 0.0 } else { rate.clamp(0.0, 1.0) };
        self
    }
}

#[async_trait]
impl ProductSource for FileSource {
    async fn fetch_products(&self) -> Result<Vec<RawProduct>, CatalogError> {
        if !self.latency.is_zero() {
            debug!("Delaying {}ms", self.latency.as_millis());
            tokio::time::sleep(self.latency).await;
        }

        if self.failure_rate > 0.0 && rand::rng().random_bool(self.failure_rate) {
            warn!("Injected failure for {}", self.path.display());
            return Err(CatalogError::fetch("Simulated server error"));
        }

        info!("Reading products from {}", self.path.display());
        let body = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            CatalogError::fetch(format!("Failed to read {}: {}", self.path.display(), e))
        })?;

        parse_payload(&body)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

enum StaticResponse {
    Payload(Value),
    Failure(String),
}

/// Deterministic source returning a fixed payload or a fixed failure.
pub struct StaticSource {
    response: StaticResponse,
    calls: AtomicUsize,
}

impl StaticSource {
    /// Serves `payload` as-is; a non-array payload yields a malformed response.
    pub fn new(payload: Value) -> Self {
        Self { response: StaticResponse::Payload(payload), calls: AtomicUsize::new(0) }
    }

    pub fn records(records: Vec<RawProduct>) -> Self {
        Self::new(Value::Array(records))
    }

    /// Fails every fetch with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        Self { response: StaticResponse::Failure(message.into()), calls: AtomicUsize::new(0) }
    }

    /// Number of fetches served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProductSource for StaticSource {
    async fn fetch_products(&self) -> Result<Vec<RawProduct>, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            StaticResponse::Payload(payload) => into_records(payload.clone()),
            StaticResponse::Failure(message) => Err(CatalogError::fetch(message.clone())),
        }
    }

    fn describe(&self) -> String {
        "static".to_string()
    }
}
