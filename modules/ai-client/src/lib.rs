mod types;

use anyhow::{anyhow, Result};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use tracing::debug;

use types::*;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Minimal Claude messages-API client for structured extraction. The model
/// is forced onto a single `structured_response` tool whose input schema the
/// caller supplies, so the reply is always a JSON value of (nominally) that
/// shape. Callers must still validate it — the model is not trusted.
#[derive(Clone)]
pub struct Claude {
    api_key: String,
    model: String,
    http: reqwest::Client,
    base_url: String,
}

impl Claude {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            http: reqwest::Client::new(),
            base_url: ANTHROPIC_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_str(&self.api_key)?);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Run one extraction turn and return the raw tool input the model
    /// produced for the supplied schema.
    pub async fn extract_value(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        input_schema: serde_json::Value,
    ) -> Result<serde_json::Value> {
        let tool_name = "structured_response";
        let request = ChatRequest {
            model: self.model.clone(),
            max_tokens: 4096,
            messages: vec![WireMessage {
                role: "user",
                content: user_prompt.to_string(),
            }],
            system: Some(system_prompt.to_string()),
            temperature: Some(0.0),
            tools: Some(vec![ToolDefinitionWire {
                name: tool_name.to_string(),
                description: "Extract structured data from the input.".to_string(),
                input_schema,
            }]),
            tool_choice: Some(serde_json::json!({
                "type": "tool",
                "name": tool_name,
            })),
        };

        let response = self.chat(&request).await?;

        for block in response.content {
            if let ContentBlock::ToolUse { input, .. } = block {
                return Ok(input);
            }
        }

        Err(anyhow!("No structured output in Claude response"))
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/messages", self.base_url);

        debug!(model = %request.model, "Claude chat request");

        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(anyhow!("Claude API error ({}): {}", status, error_text));
        }

        Ok(response.json().await?)
    }
}
