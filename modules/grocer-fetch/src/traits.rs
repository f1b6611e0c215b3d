// Trait abstractions for the fetch pipeline's external services.
//
// Every network boundary sits behind one of these traits, which enables
// deterministic testing with the mocks in `testing`: no search API, no
// live pages, no LLM. `cargo test` in seconds.

use anyhow::Result;
use async_trait::async_trait;

/// One web search result, in rank order.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
    pub snippet: String,
}

#[async_trait]
pub trait WebSearcher: Send + Sync {
    /// Run a web search query. Zero hits is a normal outcome (`Ok(vec![])`);
    /// transport failures are errors.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>>;
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the raw HTML body of a URL.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// Opaque translation boundary. Infallible by contract: implementations
/// fall back to the original text on any per-item or whole-batch failure.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate one string to English, or return it unchanged on failure.
    async fn translate(&self, text: &str, source_hint: Option<&str>) -> String;

    /// Translate a batch, preserving order and length. A failed item keeps
    /// the original text at its position.
    async fn translate_batch(&self, texts: &[String], source_hint: Option<&str>) -> Vec<String>;
}

/// Opaque text-structuring boundary (LLM). Returns the raw model JSON;
/// callers must validate the shape before trusting it.
#[async_trait]
pub trait IngredientStructurer: Send + Sync {
    async fn structure(&self, lines: &[String]) -> Result<serde_json::Value>;
}
