use ai_client::Claude;
use anyhow::Result;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::traits::IngredientStructurer;

const STRUCTURING_MODEL: &str = "claude-haiku-4-5-20251001";

const STRUCTURING_SYSTEM_PROMPT: &str = r#"You decompose recipe ingredient lines into structured records.

For every input line, produce one record with:
- **quantity**: the amount as written ("1", "0.5", "1/2", "to taste"). Empty string if the line has no quantity.
- **unit**: the measurement unit ("cup", "g", "tbsp"). Empty string if no unit is separately recognizable.
- **name**: the ingredient itself.

## Name rules
- STRIP preparation notes ("finely chopped", "softened", "at room temperature") from the name.
- STRIP packaging parentheticals ("(14 oz can)", "(about 2 cups)").
- When a note cannot be cleanly separated from the ingredient, keep the whole phrase as the name rather than inventing a shorter one.
- Never invent ingredients that are not in the input.

Keep the records in the same order as the input lines. One record per line."#;

/// What the structuring model is asked to return for a batch of lines.
/// This type exists to derive the tool schema; the actual response is
/// validated as raw JSON in `normalize` because the model is unreliable.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct StructuredLine {
    /// Amount as free text, empty when absent.
    #[serde(default)]
    quantity: String,
    /// Measurement unit, empty when not separately recognizable.
    #[serde(default)]
    unit: String,
    /// The ingredient name, preparation notes stripped.
    #[serde(default)]
    name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct StructuredIngredients {
    #[serde(default)]
    ingredients: Vec<StructuredLine>,
}

/// Structurer backed by the Claude messages API with a forced tool schema.
pub struct ClaudeStructurer {
    claude: Claude,
}

impl ClaudeStructurer {
    pub fn new(anthropic_api_key: &str) -> Self {
        Self {
            claude: Claude::new(anthropic_api_key, STRUCTURING_MODEL),
        }
    }
}

#[async_trait]
impl IngredientStructurer for ClaudeStructurer {
    async fn structure(&self, lines: &[String]) -> Result<serde_json::Value> {
        let schema = serde_json::to_value(
            schemars::gen::SchemaGenerator::default().into_root_schema_for::<StructuredIngredients>(),
        )?;

        let user_prompt = format!(
            "Decompose these ingredient lines:\n\n{}",
            lines.join("\n")
        );

        self.claude
            .extract_value(STRUCTURING_SYSTEM_PROMPT, &user_prompt, schema)
            .await
    }
}
