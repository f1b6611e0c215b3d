//! SQLite persistence for cached recipes.
//!
//! Key/value shape: normalized dish key → JSON-encoded ingredient list.
//! Entries never expire. A stored value that no longer decodes against the
//! current schema is treated as a cache miss, which makes the next
//! successful fetch overwrite it.

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::{info, warn};

use grocer_common::{IngredientRecord, RecipeEntry};

pub struct RecipeStore {
    pool: SqlitePool,
}

impl RecipeStore {
    /// Open (or create) the cache database at `path` and bootstrap the
    /// schema. Failure here is the pipeline's one fatal startup condition.
    pub async fn connect(path: &str) -> Result<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open recipe cache at {path}"))?;

        let store = Self { pool };
        store.init_schema().await?;
        info!(path, "Recipe cache ready");
        Ok(store)
    }

    /// In-memory store for tests. Pinned to a single connection — every
    /// pooled connection would otherwise get its own empty `:memory:` db.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .context("Failed to open in-memory recipe cache")?;

        let store = Self { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS recipes (
                dish_key    TEXT PRIMARY KEY,
                ingredients TEXT NOT NULL,
                cached_at   TEXT NOT NULL
            )",
        )
        .execute(&self.pool)
        .await
        .context("Failed to create recipes table")?;
        Ok(())
    }

    /// Look up a cached recipe. Corrupt or legacy-format rows decode as a
    /// miss with a warning, never as an error.
    pub async fn get(&self, dish_key: &str) -> Result<Option<RecipeEntry>> {
        let row: Option<String> =
            sqlx::query_scalar("SELECT ingredients FROM recipes WHERE dish_key = ?1")
                .bind(dish_key)
                .fetch_optional(&self.pool)
                .await
                .context("Recipe cache read failed")?;

        let Some(raw) = row else {
            return Ok(None);
        };

        match serde_json::from_str::<Vec<IngredientRecord>>(&raw) {
            Ok(ingredients) if !ingredients.is_empty() => Ok(Some(RecipeEntry {
                dish_key: dish_key.to_string(),
                ingredients,
            })),
            Ok(_) => {
                warn!(dish_key, "Cached recipe has no ingredients, treating as miss");
                Ok(None)
            }
            Err(e) => {
                warn!(dish_key, error = %e, "Cached recipe in legacy format, treating as miss");
                Ok(None)
            }
        }
    }

    /// Upsert a recipe. A single statement, so concurrent writers for the
    /// same key resolve last-writer-wins without tearing reads.
    pub async fn put(&self, dish_key: &str, ingredients: &[IngredientRecord]) -> Result<()> {
        let encoded = serde_json::to_string(ingredients).context("Failed to encode ingredients")?;

        sqlx::query(
            "INSERT INTO recipes (dish_key, ingredients, cached_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (dish_key)
             DO UPDATE SET ingredients = excluded.ingredients,
                           cached_at = excluded.cached_at",
        )
        .bind(dish_key)
        .bind(&encoded)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .context("Recipe cache write failed")?;

        Ok(())
    }

    #[cfg(test)]
    async fn put_raw(&self, dish_key: &str, raw: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO recipes (dish_key, ingredients, cached_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (dish_key) DO UPDATE SET ingredients = excluded.ingredients",
        )
        .bind(dish_key)
        .bind(raw)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
