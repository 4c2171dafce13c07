use anyhow::{Context, Result};
use serde_json::Value;
use std::future::Future;

use crate::config::DataSource;

/// Loads a JSON document from a data source.
pub trait Fetcher: Send + Sync {
    fn fetch_json(&self, source: &DataSource) -> impl Future<Output = Result<Value>> + Send;
}

/// Fetches remote sources over HTTP and local sources from disk.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .timeout(std::time::Duration::from_secs(timeout_secs.max(1)))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }

    async fn fetch_remote(&self, url: &str) -> Result<Value> {
        let resp = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .with_context(|| format!("Failed to fetch {url}"))?;

        if !resp.status().is_success() {
            let status = resp.status();
            anyhow::bail!("{url} returned {status}");
        }

        resp.json()
            .await
            .with_context(|| format!("Failed to parse JSON from {url}"))
    }

    async fn fetch_local(&self, path: &std::path::Path) -> Result<Value> {
        let data = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&data).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch_json(&self, source: &DataSource) -> Result<Value> {
        match source {
            DataSource::Remote(url) => self.fetch_remote(url).await,
            DataSource::Local(path) => self.fetch_local(path).await,
        }
    }
}

/// Where a successfully loaded listing came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Primary,
    Fallback,
}

/// Fetches the primary source, retrying once against the fallback.
/// Failure of the fallback (or of the primary when there is none) is final.
pub async fn fetch_with_fallback<F: Fetcher>(
    fetcher: &F,
    primary: &DataSource,
    fallback: Option<&DataSource>,
) -> Result<(Value, SourceKind)> {
    let primary_err = match fetcher.fetch_json(primary).await {
        Ok(data) => return Ok((data, SourceKind::Primary)),
        Err(e) => e,
    };

    let Some(fallback) = fallback else {
        return Err(primary_err.context("No fallback source configured"));
    };

    tracing::warn!("Primary source failed, falling back to {fallback}: {primary_err:#}");

    fetcher
        .fetch_json(fallback)
        .await
        .map(|data| (data, SourceKind::Fallback))
        .with_context(|| format!("Fallback source {fallback} failed after primary error: {primary_err:#}"))
}
