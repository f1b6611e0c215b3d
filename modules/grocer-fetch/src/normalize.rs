//! Raw scraped lines → structured `IngredientRecord`s.
//!
//! The normalizer fails soft: translation failures keep the original text,
//! structuring failures or schema violations yield an empty result, and
//! records without a name are dropped. A dish fetch never aborts here.

use std::sync::Arc;

use serde_json::Value;
use tracing::warn;

use grocer_common::IngredientRecord;

use crate::traits::{IngredientStructurer, Translator};

/// Validated boundary result for raw structuring-model output. The model is
/// never trusted as-is; anything off-schema becomes `Rejected`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructuredParse {
    Parsed(Vec<IngredientRecord>),
    Rejected(String),
}

/// Validate raw model output into ingredient records.
///
/// Accepts a bare array of records or an `{"ingredients": [...]}` wrapper.
/// Every element must be an object; missing `quantity`/`unit`/`name` fields
/// default to empty strings, and records with an empty trimmed name are
/// dropped rather than kept.
pub fn parse_structured(value: &Value) -> StructuredParse {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("ingredients") {
            Some(Value::Array(items)) => items,
            _ => {
                return StructuredParse::Rejected(
                    "object without an ingredients array".to_string(),
                )
            }
        },
        other => {
            return StructuredParse::Rejected(format!(
                "expected array or object, got {}",
                json_type_name(other)
            ))
        }
    };

    let mut records = Vec::new();
    for item in items {
        let Some(obj) = item.as_object() else {
            return StructuredParse::Rejected(format!(
                "non-object element: {}",
                json_type_name(item)
            ));
        };

        let name = string_field(obj, "name");
        if name.is_empty() {
            continue;
        }

        records.push(IngredientRecord {
            name,
            quantity: string_field(obj, "quantity"),
            unit: string_field(obj, "unit"),
        });
    }

    StructuredParse::Parsed(records)
}

fn string_field(obj: &serde_json::Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string()
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Turns a raw scraped ingredient list into structured records via the
/// translation and text-structuring boundaries.
pub struct IngredientNormalizer {
    translator: Arc<dyn Translator>,
    structurer: Arc<dyn IngredientStructurer>,
}

impl IngredientNormalizer {
    pub fn new(translator: Arc<dyn Translator>, structurer: Arc<dyn IngredientStructurer>) -> Self {
        Self {
            translator,
            structurer,
        }
    }

    /// Normalize raw lines. Returns an empty vec rather than erroring on any
    /// malformed model output.
    pub async fn normalize(&self, raw_lines: &[String]) -> Vec<IngredientRecord> {
        if raw_lines.is_empty() {
            return Vec::new();
        }

        // Order-preserving; per-item failures keep the original line.
        let translated = self.translator.translate_batch(raw_lines, None).await;

        let raw = match self.structurer.structure(&translated).await {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Structuring service call failed");
                return Vec::new();
            }
        };

        match parse_structured(&raw) {
            StructuredParse::Parsed(records) => records,
            StructuredParse::Rejected(reason) => {
                warn!(reason, "Structuring output rejected by schema validation");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::testing::{MockStructurer, MockTranslator};

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_array_parses() {
        let value = json!([
            {"name": "flour", "quantity": "1", "unit": "cup"},
            {"name": "eggs", "quantity": "2"},
        ]);

        let StructuredParse::Parsed(records) = parse_structured(&value) else {
            panic!("expected Parsed");
        };
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], IngredientRecord::new("flour", "1", "cup"));
        assert_eq!(records[1], IngredientRecord::new("eggs", "2", ""));
    }

    #[test]
    fn wrapped_object_parses() {
        let value = json!({"ingredients": [{"name": "salt"}]});

        let StructuredParse::Parsed(records) = parse_structured(&value) else {
            panic!("expected Parsed");
        };
        assert_eq!(records, vec![IngredientRecord::new("salt", "", "")]);
    }

    #[test]
    fn empty_names_are_dropped_not_rejected() {
        let value = json!([
            {"name": "  ", "quantity": "1", "unit": "cup"},
            {"name": "sugar", "quantity": "2", "unit": "tbsp"},
        ]);

        let StructuredParse::Parsed(records) = parse_structured(&value) else {
            panic!("expected Parsed");
        };
        assert_eq!(records, vec![IngredientRecord::new("sugar", "2", "tbsp")]);
    }

    #[test]
    fn non_object_element_is_rejected() {
        let value = json!(["just a string"]);
        assert!(matches!(
            parse_structured(&value),
            StructuredParse::Rejected(_)
        ));
    }

    #[test]
    fn scalar_output_is_rejected() {
        let value = json!("sorry, I cannot do that");
        assert!(matches!(
            parse_structured(&value),
            StructuredParse::Rejected(_)
        ));
    }

    #[tokio::test]
    async fn normalize_translates_then_structures() {
        let translator = MockTranslator::new().on_text("2 œufs", "2 eggs");
        let structurer = MockStructurer::naive();
        let normalizer = IngredientNormalizer::new(Arc::new(translator), Arc::new(structurer));

        let records = normalizer
            .normalize(&lines(&["1 cup flour", "2 œufs"]))
            .await;

        assert_eq!(
            records,
            vec![
                IngredientRecord::new("flour", "1", "cup"),
                IngredientRecord::new("eggs", "2", ""),
            ]
        );
    }

    #[tokio::test]
    async fn normalize_is_empty_on_rejected_output() {
        let translator = MockTranslator::new();
        let structurer =
            MockStructurer::new().on_lines(&["1 cup flour"], serde_json::json!("garbage"));
        let normalizer = IngredientNormalizer::new(Arc::new(translator), Arc::new(structurer));

        let records = normalizer.normalize(&lines(&["1 cup flour"])).await;
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn normalize_is_empty_on_structurer_error() {
        let translator = MockTranslator::new();
        let structurer = MockStructurer::new(); // nothing registered → error
        let normalizer = IngredientNormalizer::new(Arc::new(translator), Arc::new(structurer));

        let records = normalizer.normalize(&lines(&["1 cup flour"])).await;
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn normalize_of_empty_input_is_empty() {
        let translator = MockTranslator::new();
        let structurer = MockStructurer::naive();
        let normalizer = IngredientNormalizer::new(Arc::new(translator), Arc::new(structurer));

        assert!(normalizer.normalize(&[]).await.is_empty());
    }
}
