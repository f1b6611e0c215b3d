//! Concurrent fan-out across dishes.
//!
//! One task per distinct dish key, no ordering guarantees between dishes.
//! Duplicate names collapse to a single fetch before any task spawns, which
//! also guarantees at most one in-flight fetch per cache key.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{info, warn};

use grocer_common::types::{DishQuery, FailureKind, FetchResult};

use crate::fetcher::DishFetcher;
use crate::traits::Translator;

pub struct FetchOrchestrator {
    fetcher: DishFetcher,
    translator: Arc<dyn Translator>,
    dish_timeout: Option<Duration>,
}

impl FetchOrchestrator {
    pub fn new(fetcher: DishFetcher, translator: Arc<dyn Translator>) -> Self {
        Self {
            fetcher,
            translator,
            dish_timeout: None,
        }
    }

    /// Cap each dish fetch at a wall-clock budget. An overrun produces
    /// `Failure(Timeout)` for that dish only.
    pub fn with_dish_timeout(mut self, timeout: Duration) -> Self {
        self.dish_timeout = Some(timeout);
        self
    }

    /// Resolve a batch of user-supplied dish names to per-dish results,
    /// keyed by normalized dish name.
    pub async fn fetch_ingredients(&self, dish_names: &[String]) -> HashMap<String, FetchResult> {
        let names: Vec<String> = dish_names
            .iter()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        if names.is_empty() {
            return HashMap::new();
        }

        let translated = self.translator.translate_batch(&names, None).await;
        let queries: Vec<DishQuery> = names
            .iter()
            .zip(&translated)
            .map(|(raw, eng)| DishQuery::new(raw, eng))
            .collect();

        self.fetch_all(queries).await
    }

    async fn fetch_all(&self, queries: Vec<DishQuery>) -> HashMap<String, FetchResult> {
        // First occurrence wins; later duplicates share its result.
        let mut distinct: Vec<DishQuery> = Vec::new();
        for query in queries {
            if !distinct.iter().any(|q| q.normalized_name == query.normalized_name) {
                distinct.push(query);
            }
        }

        info!(dishes = distinct.len(), "Fetching ingredient lists");

        let mut tasks = JoinSet::new();
        for query in distinct {
            let fetcher = self.fetcher.clone();
            let budget = self.dish_timeout;
            tasks.spawn(async move {
                let result = match budget {
                    Some(limit) => match tokio::time::timeout(limit, fetcher.fetch(&query)).await {
                        Ok(result) => result,
                        Err(_) => FetchResult::failure(
                            FailureKind::Timeout,
                            format!(
                                "dish '{}' exceeded the {}s budget",
                                query.normalized_name,
                                limit.as_secs()
                            ),
                        ),
                    },
                    None => fetcher.fetch(&query).await,
                };
                (query.normalized_name, result)
            });
        }

        let mut results = HashMap::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((key, result)) => {
                    results.insert(key, result);
                }
                Err(e) => {
                    warn!(error = %e, "Dish fetch task panicked");
                }
            }
        }
        results
    }
}
