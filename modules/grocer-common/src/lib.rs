pub mod config;
pub mod consolidate;
pub mod types;

pub use config::Config;
pub use consolidate::consolidate;
pub use types::{
    ConsolidatedItem, DishQuery, FailureKind, FetchResult, IngredientRecord, RecipeEntry,
};
