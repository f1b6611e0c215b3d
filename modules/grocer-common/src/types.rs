use std::fmt;

use serde::{Deserialize, Serialize};

/// A single dish the user asked for. `normalized_name` is the translated,
/// trimmed, lowercased form used as the cache key; two queries with the same
/// `normalized_name` resolve to the same cache entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DishQuery {
    pub raw_name: String,
    pub normalized_name: String,
}

impl DishQuery {
    /// Build a query from the user's raw input and its translated form.
    /// Falls back to the raw name when translation produced nothing.
    pub fn new(raw_name: &str, translated_name: &str) -> Self {
        let raw = raw_name.trim();
        let translated = translated_name.trim();
        let key = if translated.is_empty() { raw } else { translated };
        Self {
            raw_name: raw.to_string(),
            normalized_name: key.to_lowercase(),
        }
    }
}

/// One structured ingredient line. `quantity` and `unit` are free text and
/// may be empty; `name` is never empty after normalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientRecord {
    pub name: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub unit: String,
}

impl IngredientRecord {
    pub fn new(name: &str, quantity: &str, unit: &str) -> Self {
        Self {
            name: name.to_string(),
            quantity: quantity.to_string(),
            unit: unit.to_string(),
        }
    }
}

/// A cached recipe: the dish key plus its structured ingredients, in the
/// order they were extracted. Entries never expire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeEntry {
    pub dish_key: String,
    pub ingredients: Vec<IngredientRecord>,
}

/// Why a single dish fetch came back empty-handed. All four are recoverable
/// at the dish granularity and never abort sibling fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The web search returned zero results.
    NotFound,
    /// Results existed but no candidate page yielded a parseable list.
    Unclear,
    /// Network, transport, or any unexpected error.
    ServiceError,
    /// The per-dish wall-clock budget ran out.
    Timeout,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::NotFound => write!(f, "not_found"),
            FailureKind::Unclear => write!(f, "unclear"),
            FailureKind::ServiceError => write!(f, "service_error"),
            FailureKind::Timeout => write!(f, "timeout"),
        }
    }
}

/// Outcome of one dish fetch. Produced only by the dish fetcher; consumed by
/// the orchestrator and the consolidator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    Success(Vec<IngredientRecord>),
    Failure { kind: FailureKind, message: String },
}

impl FetchResult {
    pub fn failure(kind: FailureKind, message: impl Into<String>) -> Self {
        FetchResult::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Success(_))
    }
}

/// One line of the consolidated shopping list. Derived, recomputed on every
/// consolidation, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsolidatedItem {
    pub name: String,
    pub display_quantity: String,
}

impl ConsolidatedItem {
    /// Render as a shopping-list line: `"150 g Carrot"` or just `"Salt"`.
    pub fn line(&self) -> String {
        if self.display_quantity.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.display_quantity, self.name)
        }
    }
}
