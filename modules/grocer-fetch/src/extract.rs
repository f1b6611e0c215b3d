//! Multi-strategy ingredient extraction from recipe page HTML.
//!
//! Strategies run in strict priority order and the first one that yields a
//! non-empty list wins; results are never merged across strategies:
//!
//! 1. JSON-LD recipe blocks (`recipeIngredient`), including `@graph` nodes —
//!    publishers encode these for search engines, so they carry the most trust.
//! 2. Microdata scoped to a `schema.org/Recipe` element.
//! 3. An "ingredients" heading followed by its sibling list.
//! 4. Containers with ingredient-list class/id names.
//!
//! No strategy matching is a normal outcome (plenty of recipe pages have no
//! parseable structure) and returns `None`, not an error.

use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use tracing::debug;

/// Run the strategy chain over a page body. Returns the raw ingredient
/// lines, or `None` when no strategy produced a usable list.
pub fn extract_ingredients(html: &str, url: &str) -> Option<Vec<String>> {
    let doc = Html::parse_document(html);

    if let Some(lines) = from_json_ld(&doc) {
        debug!(url, strategy = "json-ld", count = lines.len(), "Ingredient list extracted");
        return Some(lines);
    }
    if let Some(lines) = from_microdata(&doc) {
        debug!(url, strategy = "microdata", count = lines.len(), "Ingredient list extracted");
        return Some(lines);
    }
    if let Some(lines) = from_heading(&doc) {
        debug!(url, strategy = "heading", count = lines.len(), "Ingredient list extracted");
        return Some(lines);
    }
    if let Some(lines) = from_keyword_container(&doc) {
        debug!(url, strategy = "keyword", count = lines.len(), "Ingredient list extracted");
        return Some(lines);
    }

    debug!(url, "No ingredient list found on page");
    None
}

// --- Strategy 1: JSON-LD structured data ---

fn from_json_ld(doc: &Html) -> Option<Vec<String>> {
    let script_sel =
        Selector::parse(r#"script[type="application/ld+json"]"#).expect("valid selector");

    for script in doc.select(&script_sel) {
        let raw: String = script.text().collect();
        let Ok(data) = serde_json::from_str::<Value>(raw.trim()) else {
            continue;
        };

        // The top-level value is sometimes a bare array of nodes.
        let nodes: Vec<&Value> = match &data {
            Value::Array(items) => items.iter().collect(),
            other => vec![other],
        };

        for node in nodes {
            // Nested sub-graphs first, then the node itself.
            if let Some(graph) = node.get("@graph").and_then(Value::as_array) {
                for sub in graph {
                    if let Some(lines) = recipe_ingredient_lines(sub) {
                        return Some(lines);
                    }
                }
            }
            if let Some(lines) = recipe_ingredient_lines(node) {
                return Some(lines);
            }
        }
    }

    None
}

/// Pull `recipeIngredient` strings out of a node declaring a Recipe type.
fn recipe_ingredient_lines(node: &Value) -> Option<Vec<String>> {
    if !declares_recipe_type(node) {
        return None;
    }

    let lines: Vec<String> = node
        .get("recipeIngredient")?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines)
    }
}

/// `@type` may be a string or an array of type names.
fn declares_recipe_type(node: &Value) -> bool {
    match node.get("@type") {
        Some(Value::String(t)) => t == "Recipe",
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some("Recipe")),
        _ => false,
    }
}

// --- Strategy 2: microdata ---

fn from_microdata(doc: &Html) -> Option<Vec<String>> {
    let scope_sel = Selector::parse(r#"[itemtype*="schema.org/Recipe"]"#).expect("valid selector");
    let prop_sel = Selector::parse(r#"[itemprop="recipeIngredient"]"#).expect("valid selector");

    let scope = doc.select(&scope_sel).next()?;
    let lines: Vec<String> = scope
        .select(&prop_sel)
        .map(element_text)
        .filter(|s| !s.is_empty())
        .collect();

    if lines.is_empty() {
        None
    } else {
        Some(lines)
    }
}

// --- Strategy 3: "ingredients" heading followed by a list ---

fn from_heading(doc: &Html) -> Option<Vec<String>> {
    let heading_sel = Selector::parse("h2, h3, h4").expect("valid selector");
    let li_sel = Selector::parse("li").expect("valid selector");

    for heading in doc.select(&heading_sel) {
        if !element_text(heading).to_lowercase().contains("ingredients") {
            continue;
        }

        for sibling in heading.next_siblings().filter_map(ElementRef::wrap) {
            let name = sibling.value().name();
            if name == "ul" || name == "ol" {
                let items: Vec<String> = sibling
                    .select(&li_sel)
                    .map(element_text)
                    .filter(|s| !s.is_empty())
                    .collect();
                // Single-item lists are too likely to be noise.
                if items.len() > 1 {
                    return Some(items);
                }
                break;
            }
            if name.starts_with('h') {
                break;
            }
        }
    }

    None
}

// --- Strategy 4: ingredient-list class/id keywords ---

const KEYWORD_SELECTORS: &[&str] = &[
    r#"[class*="ingredients-list"]"#,
    r#"[class*="ingredient-list"]"#,
    r#"[id*="ingredients-list"]"#,
    r#"[id*="ingredient-list"]"#,
];

fn from_keyword_container(doc: &Html) -> Option<Vec<String>> {
    let li_sel = Selector::parse("li").expect("valid selector");

    for selector in KEYWORD_SELECTORS {
        let sel = Selector::parse(selector).expect("valid selector");
        for section in doc.select(&sel) {
            let items: Vec<String> = section
                .select(&li_sel)
                .map(element_text)
                .filter(|s| !s.is_empty())
                .collect();
            if items.len() > 1 {
                return Some(items);
            }
        }
    }

    None
}

/// Collapse an element's text content to single-spaced trimmed form.
fn element_text(el: ElementRef<'_>) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.com/recipe";

    #[test]
    fn json_ld_recipe_block_is_extracted() {
        let html = r#"<html><head>
            <script type="application/ld+json">
            {"@type": "Recipe", "recipeIngredient": ["1 cup flour", "2 eggs", ""]}
            </script>
        </head><body></body></html>"#;

        let lines = extract_ingredients(html, URL).unwrap();
        assert_eq!(lines, vec!["1 cup flour", "2 eggs"]);
    }

    #[test]
    fn json_ld_nested_in_graph_is_extracted() {
        let html = r#"<html><head>
            <script type="application/ld+json">
            {"@context": "https://schema.org", "@graph": [
                {"@type": "WebPage", "name": "Some page"},
                {"@type": "Recipe", "recipeIngredient": ["200 g butter", "3 carrots"]}
            ]}
            </script>
        </head><body></body></html>"#;

        let lines = extract_ingredients(html, URL).unwrap();
        assert_eq!(lines, vec!["200 g butter", "3 carrots"]);
    }

    #[test]
    fn json_ld_array_with_multi_type_node() {
        let html = r#"<html><head>
            <script type="application/ld+json">
            [{"@type": ["Recipe", "NewsArticle"], "recipeIngredient": ["1 onion", "2 cloves garlic"]}]
            </script>
        </head><body></body></html>"#;

        let lines = extract_ingredients(html, URL).unwrap();
        assert_eq!(lines, vec!["1 onion", "2 cloves garlic"]);
    }

    #[test]
    fn structured_data_wins_over_heading_list() {
        let html = r#"<html><head>
            <script type="application/ld+json">
            {"@type": "Recipe", "recipeIngredient": ["from json-ld", "also from json-ld"]}
            </script>
        </head><body>
            <h2>Ingredients</h2>
            <ul><li>from heading</li><li>also from heading</li></ul>
        </body></html>"#;

        let lines = extract_ingredients(html, URL).unwrap();
        assert_eq!(lines, vec!["from json-ld", "also from json-ld"]);
    }

    #[test]
    fn microdata_scope_is_extracted() {
        let html = r#"<html><body>
            <div itemscope itemtype="https://schema.org/Recipe">
                <span itemprop="recipeIngredient">500 g pasta</span>
                <span itemprop="recipeIngredient">1 jar tomato sauce</span>
            </div>
        </body></html>"#;

        let lines = extract_ingredients(html, URL).unwrap();
        assert_eq!(lines, vec!["500 g pasta", "1 jar tomato sauce"]);
    }

    #[test]
    fn heading_followed_by_list_is_extracted() {
        let html = r#"<html><body>
            <h3>Ingredients</h3>
            <ul>
                <li>2 cups  rice</li>
                <li>1 tsp salt</li>
            </ul>
            <h3>Instructions</h3>
            <ol><li>Cook the rice.</li><li>Add salt.</li></ol>
        </body></html>"#;

        let lines = extract_ingredients(html, URL).unwrap();
        assert_eq!(lines, vec!["2 cups rice", "1 tsp salt"]);
    }

    #[test]
    fn heading_stops_at_next_heading() {
        // The list belongs to the Instructions section, not Ingredients.
        let html = r#"<html><body>
            <h2>Ingredients</h2>
            <p>See below.</p>
            <h2>Instructions</h2>
            <ul><li>step one</li><li>step two</li></ul>
        </body></html>"#;

        assert_eq!(extract_ingredients(html, URL), None);
    }

    #[test]
    fn single_item_heading_list_is_rejected() {
        let html = r#"<html><body>
            <h2>Ingredients</h2>
            <ul><li>just one thing</li></ul>
        </body></html>"#;

        assert_eq!(extract_ingredients(html, URL), None);
    }

    #[test]
    fn keyword_container_fallback() {
        let html = r#"<html><body>
            <div class="recipe-ingredients-list">
                <ul><li>4 tomatoes</li><li>1 cucumber</li></ul>
            </div>
        </body></html>"#;

        let lines = extract_ingredients(html, URL).unwrap();
        assert_eq!(lines, vec!["4 tomatoes", "1 cucumber"]);
    }

    #[test]
    fn single_item_keyword_container_is_rejected() {
        let html = r#"<html><body>
            <div id="ingredient-list"><ul><li>only item</li></ul></div>
        </body></html>"#;

        assert_eq!(extract_ingredients(html, URL), None);
    }

    #[test]
    fn page_without_structure_returns_none() {
        let html = "<html><body><p>A lovely story about soup.</p></body></html>";
        assert_eq!(extract_ingredients(html, URL), None);
    }

    #[test]
    fn malformed_json_ld_falls_through_to_next_strategy() {
        let html = r#"<html><head>
            <script type="application/ld+json">{not valid json</script>
        </head><body>
            <h2>Ingredients</h2>
            <ul><li>1 leek</li><li>2 potatoes</li></ul>
        </body></html>"#;

        let lines = extract_ingredients(html, URL).unwrap();
        assert_eq!(lines, vec!["1 leek", "2 potatoes"]);
    }
}
