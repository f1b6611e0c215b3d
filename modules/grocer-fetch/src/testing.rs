//! Deterministic mocks for the pipeline's service traits.
//!
//! All mocks are builder-style: register expected inputs up front, then
//! assert on call counters afterwards. Unregistered inputs error (except the
//! translator, which falls back to identity like the real one).

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

use crate::traits::{IngredientStructurer, PageFetcher, SearchHit, Translator, WebSearcher};

// --- Search ---

#[derive(Default)]
pub struct MockSearcher {
    responses: HashMap<String, Result<Vec<SearchHit>, String>>,
    calls: Mutex<usize>,
}

impl MockSearcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a query that resolves to hits for the given URLs.
    pub fn on_query(mut self, query: &str, urls: &[&str]) -> Self {
        let hits = urls
            .iter()
            .map(|url| SearchHit {
                url: url.to_string(),
                title: format!("Result for {query}"),
                snippet: String::new(),
            })
            .collect();
        self.responses.insert(query.to_string(), Ok(hits));
        self
    }

    /// Register a query that fails at the transport level.
    pub fn failing(mut self, query: &str) -> Self {
        self.responses
            .insert(query.to_string(), Err("search service unavailable".to_string()));
        self
    }

    pub fn search_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl WebSearcher for MockSearcher {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>> {
        *self.calls.lock().unwrap() += 1;
        match self.responses.get(query) {
            Some(Ok(hits)) => Ok(hits.iter().take(max_results).cloned().collect()),
            Some(Err(message)) => bail!("{message}"),
            None => bail!("MockSearcher: unregistered query '{query}'"),
        }
    }
}

// --- Pages ---

#[derive(Default)]
pub struct MockPageFetcher {
    pages: HashMap<String, Result<String, String>>,
    calls: Mutex<usize>,
}

impl MockPageFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), Ok(html.to_string()));
        self
    }

    pub fn failing(mut self, url: &str) -> Self {
        self.pages
            .insert(url.to_string(), Err("connection refused".to_string()));
        self
    }

    pub fn fetch_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl PageFetcher for MockPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        *self.calls.lock().unwrap() += 1;
        match self.pages.get(url) {
            Some(Ok(html)) => Ok(html.clone()),
            Some(Err(message)) => bail!("{message}"),
            None => bail!("MockPageFetcher: unregistered url '{url}'"),
        }
    }
}

// --- Translation ---

/// Identity translator with optional registered overrides, mirroring the
/// real boundary's keep-the-original fallback.
#[derive(Default)]
pub struct MockTranslator {
    overrides: HashMap<String, String>,
}

impl MockTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_text(mut self, from: &str, to: &str) -> Self {
        self.overrides.insert(from.to_string(), to.to_string());
        self
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, text: &str, _source_hint: Option<&str>) -> String {
        self.overrides
            .get(text)
            .cloned()
            .unwrap_or_else(|| text.to_string())
    }

    async fn translate_batch(&self, texts: &[String], _source_hint: Option<&str>) -> Vec<String> {
        texts
            .iter()
            .map(|t| self.overrides.get(t).cloned().unwrap_or_else(|| t.clone()))
            .collect()
    }
}

// --- Structuring ---

const NAIVE_UNITS: &[&str] = &["cup", "cups", "g", "kg", "tsp", "tbsp", "ml", "l"];

enum StructurerMode {
    /// Only registered line batches resolve; anything else errors.
    Scripted(HashMap<String, Value>),
    /// Deterministic token parser, good enough for pipeline tests.
    Naive,
}

pub struct MockStructurer {
    mode: StructurerMode,
    calls: Mutex<usize>,
}

impl MockStructurer {
    pub fn new() -> Self {
        Self {
            mode: StructurerMode::Scripted(HashMap::new()),
            calls: Mutex::new(0),
        }
    }

    pub fn naive() -> Self {
        Self {
            mode: StructurerMode::Naive,
            calls: Mutex::new(0),
        }
    }

    /// Register raw model output for an exact batch of input lines.
    pub fn on_lines(mut self, lines: &[&str], output: Value) -> Self {
        if let StructurerMode::Scripted(responses) = &mut self.mode {
            responses.insert(lines.join("\n"), output);
        }
        self
    }

    pub fn structure_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    fn naive_parse(line: &str) -> Value {
        let mut tokens = line.split_whitespace().peekable();

        let quantity = match tokens.peek() {
            Some(first) if first.parse::<f64>().is_ok() => tokens.next().unwrap_or_default(),
            _ => "",
        };
        let unit = match tokens.peek() {
            Some(next) if !quantity.is_empty() && NAIVE_UNITS.contains(&next.to_lowercase().as_str()) => {
                tokens.next().unwrap_or_default()
            }
            _ => "",
        };
        let name = tokens.collect::<Vec<_>>().join(" ");

        json!({"quantity": quantity, "unit": unit, "name": name})
    }
}

impl Default for MockStructurer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IngredientStructurer for MockStructurer {
    async fn structure(&self, lines: &[String]) -> Result<Value> {
        *self.calls.lock().unwrap() += 1;
        match &self.mode {
            StructurerMode::Scripted(responses) => {
                let key = lines.join("\n");
                match responses.get(&key) {
                    Some(output) => Ok(output.clone()),
                    None => bail!("MockStructurer: unregistered line batch:\n{key}"),
                }
            }
            StructurerMode::Naive => Ok(Value::Array(
                lines.iter().map(|line| Self::naive_parse(line)).collect(),
            )),
        }
    }
}
