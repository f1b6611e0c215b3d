//! Single-dish acquisition: cache check, web search, candidate page loop.

use std::sync::Arc;

use tracing::{info, warn};

use grocer_common::types::{DishQuery, FailureKind, FetchResult};

use crate::extract::extract_ingredients;
use crate::normalize::IngredientNormalizer;
use crate::store::RecipeStore;
use crate::traits::{PageFetcher, WebSearcher};

/// Fetches the ingredient list for one dish. Cheap to clone; all state is
/// shared behind `Arc`s so the orchestrator can hand one to each task.
#[derive(Clone)]
pub struct DishFetcher {
    store: Arc<RecipeStore>,
    searcher: Arc<dyn WebSearcher>,
    pages: Arc<dyn PageFetcher>,
    normalizer: Arc<IngredientNormalizer>,
    max_results: usize,
}

impl DishFetcher {
    pub fn new(
        store: Arc<RecipeStore>,
        searcher: Arc<dyn WebSearcher>,
        pages: Arc<dyn PageFetcher>,
        normalizer: Arc<IngredientNormalizer>,
        max_results: usize,
    ) -> Self {
        Self {
            store,
            searcher,
            pages,
            normalizer,
            max_results,
        }
    }

    /// Resolve one dish to a `FetchResult`. Never returns an error: any
    /// unexpected failure inside the pipeline degrades to
    /// `Failure(ServiceError)` so sibling dishes are unaffected.
    pub async fn fetch(&self, query: &DishQuery) -> FetchResult {
        match self.run(query).await {
            Ok(result) => result,
            Err(e) => {
                warn!(dish = %query.normalized_name, error = %e, "Dish fetch failed");
                FetchResult::failure(FailureKind::ServiceError, e.to_string())
            }
        }
    }

    async fn run(&self, query: &DishQuery) -> anyhow::Result<FetchResult> {
        let key = &query.normalized_name;

        if let Some(entry) = self.store.get(key).await? {
            info!(dish = %key, count = entry.ingredients.len(), "Recipe cache hit");
            return Ok(FetchResult::Success(entry.ingredients));
        }

        // Search with the name as the user typed it; localized queries find
        // localized recipe sites. Only the cache key is translated.
        let search_query = format!("\"{}\" ingredients recipe", query.raw_name);
        let hits = self.searcher.search(&search_query, self.max_results).await?;
        if hits.is_empty() {
            return Ok(FetchResult::failure(
                FailureKind::NotFound,
                format!("no search results for '{key}'"),
            ));
        }

        for hit in &hits {
            let html = match self.pages.fetch(&hit.url).await {
                Ok(html) => html,
                Err(e) => {
                    warn!(dish = %key, url = %hit.url, error = %e, "Candidate page fetch failed, trying next");
                    continue;
                }
            };

            let Some(lines) = extract_ingredients(&html, &hit.url) else {
                continue;
            };

            let records = self.normalizer.normalize(&lines).await;
            if records.is_empty() {
                continue;
            }

            info!(dish = %key, url = %hit.url, count = records.len(), "Ingredients acquired");

            // A write failure must not discard a result we already hold.
            if let Err(e) = self.store.put(key, &records).await {
                warn!(dish = %key, error = %e, "Recipe cache write failed");
            }

            return Ok(FetchResult::Success(records));
        }

        Ok(FetchResult::failure(
            FailureKind::Unclear,
            format!("no candidate page yielded a usable ingredient list for '{key}'"),
        ))
    }
}
