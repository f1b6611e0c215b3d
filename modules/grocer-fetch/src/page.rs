use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

use crate::traits::PageFetcher;

const USER_AGENT: &str = concat!("grocer/", env!("CARGO_PKG_VERSION"));

/// Plain HTTP page fetcher. Recipe pages with structured data serve their
/// JSON-LD in the initial document, so no JS rendering pass is needed.
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new(timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to build HTTP client");

        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let parsed = url::Url::parse(url).context("Invalid URL")?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            anyhow::bail!("Only http/https URLs are allowed, got: {}", parsed.scheme());
        }

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Request to {url} failed"))?
            .error_for_status()
            .with_context(|| format!("Non-success status from {url}"))?;

        let body = resp
            .text()
            .await
            .with_context(|| format!("Failed to read body from {url}"))?;

        info!(url, bytes = body.len(), "Fetched page");
        Ok(body)
    }
}
