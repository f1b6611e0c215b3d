use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Search
    pub serper_api_key: String,
    pub search_max_results: usize,

    // Text structuring (LLM)
    pub anthropic_api_key: String,

    // Translation (optional; pipeline degrades to originals without it)
    pub translate_base_url: Option<String>,
    pub translate_api_key: Option<String>,

    // Recipe cache
    pub recipe_db_path: String,

    // Timeouts
    pub page_timeout_secs: u64,
    pub dish_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            serper_api_key: required_env("SERPER_API_KEY"),
            search_max_results: env::var("SEARCH_MAX_RESULTS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .expect("SEARCH_MAX_RESULTS must be a number"),
            anthropic_api_key: required_env("ANTHROPIC_API_KEY"),
            translate_base_url: env::var("TRANSLATE_BASE_URL").ok(),
            translate_api_key: env::var("TRANSLATE_API_KEY").ok(),
            recipe_db_path: env::var("RECIPE_DB_PATH")
                .unwrap_or_else(|_| "recipe_cache.db".to_string()),
            page_timeout_secs: env::var("PAGE_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("PAGE_TIMEOUT_SECS must be a number"),
            dish_timeout_secs: env::var("DISH_TIMEOUT_SECS")
                .unwrap_or_else(|_| "45".to_string())
                .parse()
                .expect("DISH_TIMEOUT_SECS must be a number"),
        }
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
