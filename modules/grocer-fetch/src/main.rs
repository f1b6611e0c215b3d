use std::collections::HashMap;
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use grocer_common::types::FetchResult;
use grocer_common::{consolidate, Config};

use grocer_fetch::fetcher::DishFetcher;
use grocer_fetch::normalize::IngredientNormalizer;
use grocer_fetch::orchestrator::FetchOrchestrator;
use grocer_fetch::page::HttpPageFetcher;
use grocer_fetch::search::SerperSearcher;
use grocer_fetch::store::RecipeStore;
use grocer_fetch::structure::ClaudeStructurer;
use grocer_fetch::traits::Translator;
use grocer_fetch::translate::{NoopTranslator, ServiceTranslator};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("grocer_fetch=info".parse()?),
        )
        .init();

    let config = Config::from_env();

    // The one fatal startup condition: no cache, no pipeline.
    let store = Arc::new(
        RecipeStore::connect(&config.recipe_db_path)
            .await
            .context("Recipe cache initialization failed")?,
    );

    let translator: Arc<dyn Translator> = match &config.translate_base_url {
        Some(base_url) => {
            info!(base_url, "Using translation service");
            Arc::new(ServiceTranslator::new(
                base_url,
                config.translate_api_key.as_deref(),
            ))
        }
        None => {
            info!("No translation service configured, using dish names as-is");
            Arc::new(NoopTranslator)
        }
    };

    let normalizer = Arc::new(IngredientNormalizer::new(
        translator.clone(),
        Arc::new(ClaudeStructurer::new(&config.anthropic_api_key)),
    ));

    let fetcher = DishFetcher::new(
        store,
        Arc::new(SerperSearcher::new(&config.serper_api_key)),
        Arc::new(HttpPageFetcher::new(config.page_timeout_secs)),
        normalizer,
        config.search_max_results,
    );

    let orchestrator = FetchOrchestrator::new(fetcher, translator)
        .with_dish_timeout(Duration::from_secs(config.dish_timeout_secs));

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        interactive_loop(&orchestrator).await?;
    } else {
        let dishes = split_dishes(&args.join(","));
        run_batch(&orchestrator, &dishes).await;
    }

    Ok(())
}

async fn interactive_loop(orchestrator: &FetchOrchestrator) -> Result<()> {
    let stdin = io::stdin();
    loop {
        print!("Dishes (comma-separated, 'exit' to quit): ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("exit") {
            break;
        }

        run_batch(orchestrator, &split_dishes(line)).await;
    }
    Ok(())
}

fn split_dishes(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

async fn run_batch(orchestrator: &FetchOrchestrator, dishes: &[String]) {
    if dishes.is_empty() {
        return;
    }

    let results = orchestrator.fetch_ingredients(dishes).await;
    print_results(&results);
}

fn print_results(results: &HashMap<String, FetchResult>) {
    let mut keys: Vec<&String> = results.keys().collect();
    keys.sort();

    for key in &keys {
        match &results[*key] {
            FetchResult::Success(ingredients) => {
                println!("\n{key}:");
                for record in ingredients {
                    let mut parts = Vec::new();
                    if !record.quantity.is_empty() {
                        parts.push(record.quantity.as_str());
                    }
                    if !record.unit.is_empty() {
                        parts.push(record.unit.as_str());
                    }
                    parts.push(record.name.as_str());
                    println!("  - {}", parts.join(" "));
                }
            }
            FetchResult::Failure { kind, message } => {
                println!("\n{key}: unavailable ({kind}): {message}");
            }
        }
    }

    let items = consolidate(results);
    if !items.is_empty() {
        println!("\nShopping list:");
        for item in items {
            println!("  [ ] {}", item.line());
        }
    }
    println!();
}
