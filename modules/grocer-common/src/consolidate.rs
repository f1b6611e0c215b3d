//! Shopping-list consolidation: merge every dish's ingredient records into
//! one deduplicated list. Pure — no network, no persistence, deterministic
//! for a given input mapping regardless of entry order.

use std::collections::{BTreeMap, HashMap};

use crate::types::{ConsolidatedItem, FetchResult, IngredientRecord};

/// Merge the per-dish fetch results into a sorted shopping list.
///
/// Failure entries are skipped entirely. Records group by lowercased,
/// trimmed name. A group merges numerically only when every record carries a
/// numeric quantity and all records share exactly one non-empty unit;
/// anything else (mixed units, "to taste", missing quantities) collapses to
/// the capitalized name alone — identity merge, never an invented unit.
pub fn consolidate(results: &HashMap<String, FetchResult>) -> Vec<ConsolidatedItem> {
    let mut groups: BTreeMap<String, Vec<&IngredientRecord>> = BTreeMap::new();

    for result in results.values() {
        if let FetchResult::Success(ingredients) = result {
            for record in ingredients {
                let key = record.name.trim().to_lowercase();
                if key.is_empty() {
                    continue;
                }
                groups.entry(key).or_default().push(record);
            }
        }
    }

    groups
        .into_iter()
        .map(|(key, records)| ConsolidatedItem {
            name: capitalize(&key),
            display_quantity: merged_quantity(&records).unwrap_or_default(),
        })
        .collect()
}

/// Sum the group's quantities if they are uniformly numeric with a single
/// shared unit. Returns None when the group can only merge by identity.
fn merged_quantity(records: &[&IngredientRecord]) -> Option<String> {
    let mut total = 0.0f64;
    let mut unit: Option<&str> = None;

    for record in records {
        let amount: f64 = record.quantity.trim().parse().ok()?;
        if !amount.is_finite() {
            return None;
        }
        let u = record.unit.trim();
        if u.is_empty() {
            return None;
        }
        match unit {
            None => unit = Some(u),
            Some(seen) if seen == u => {}
            Some(_) => return None,
        }
        total += amount;
    }

    unit.map(|u| format!("{} {u}", format_amount(total)))
}

/// Print integral sums without a trailing `.0`.
fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{}", amount as i64)
    } else {
        format!("{amount}")
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FailureKind, FetchResult, IngredientRecord};

    fn success(records: &[(&str, &str, &str)]) -> FetchResult {
        FetchResult::Success(
            records
                .iter()
                .map(|(n, q, u)| IngredientRecord::new(n, q, u))
                .collect(),
        )
    }

    #[test]
    fn sums_matching_units_across_dishes() {
        let mut results = HashMap::new();
        results.insert(
            "soup".to_string(),
            success(&[("carrot", "100", "g")]),
        );
        results.insert(
            "stew".to_string(),
            success(&[("Carrot", "50", "g")]),
        );

        let items = consolidate(&results);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].line(), "150 g Carrot");
    }

    #[test]
    fn mixed_numeric_and_free_text_merges_by_identity() {
        let mut results = HashMap::new();
        results.insert("a".to_string(), success(&[("salt", "", "")]));
        results.insert("b".to_string(), success(&[("salt", "1", "tsp")]));

        let items = consolidate(&results);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].line(), "Salt");
    }

    #[test]
    fn mixed_units_merge_by_identity() {
        let mut results = HashMap::new();
        results.insert("a".to_string(), success(&[("flour", "1", "cup")]));
        results.insert("b".to_string(), success(&[("flour", "200", "g")]));

        let items = consolidate(&results);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].line(), "Flour");
    }

    #[test]
    fn missing_units_are_never_summed() {
        let mut results = HashMap::new();
        results.insert("a".to_string(), success(&[("eggs", "2", "")]));
        results.insert("b".to_string(), success(&[("eggs", "3", "")]));

        let items = consolidate(&results);
        assert_eq!(items[0].line(), "Eggs");
    }

    #[test]
    fn failures_are_skipped() {
        let mut results = HashMap::new();
        results.insert("a".to_string(), success(&[("onion", "1", "piece")]));
        results.insert(
            "b".to_string(),
            FetchResult::failure(FailureKind::NotFound, "no recipe found"),
        );

        let items = consolidate(&results);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Onion");
    }

    #[test]
    fn output_is_sorted_and_order_independent() {
        let mut forward = HashMap::new();
        forward.insert("a".to_string(), success(&[("zucchini", "", ""), ("apple", "", "")]));
        forward.insert("b".to_string(), success(&[("mint", "", "")]));

        let mut reversed = HashMap::new();
        reversed.insert("b".to_string(), success(&[("mint", "", "")]));
        reversed.insert("a".to_string(), success(&[("apple", "", ""), ("zucchini", "", "")]));

        let names: Vec<String> = consolidate(&forward).into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["Apple", "Mint", "Zucchini"]);
        let names_rev: Vec<String> = consolidate(&reversed).into_iter().map(|i| i.name).collect();
        assert_eq!(names, names_rev);
    }

    #[test]
    fn fractional_sums_keep_decimals() {
        let mut results = HashMap::new();
        results.insert("a".to_string(), success(&[("butter", "0.5", "cup")]));
        results.insert("b".to_string(), success(&[("butter", "0.25", "cup")]));

        let items = consolidate(&results);
        assert_eq!(items[0].line(), "0.75 cup Butter");
    }

    #[test]
    fn free_text_fraction_is_not_numeric() {
        let mut results = HashMap::new();
        results.insert("a".to_string(), success(&[("milk", "1/2", "l")]));
        results.insert("b".to_string(), success(&[("milk", "1", "l")]));

        let items = consolidate(&results);
        assert_eq!(items[0].line(), "Milk");
    }
}
