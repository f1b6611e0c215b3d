pub mod error;

pub use error::{Result, TranslateError};

use std::time::Duration;

use serde::Deserialize;

/// Client for a LibreTranslate-compatible `/translate` endpoint.
/// Source language defaults to auto-detection; target is always English.
pub struct TranslateClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TranslatedText {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: TranslatedText,
}

impl TranslateClient {
    pub fn new(base_url: &str, api_key: Option<&str>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.map(String::from),
        }
    }

    /// Translate a single string to English.
    pub async fn translate(&self, text: &str, source_hint: Option<&str>) -> Result<String> {
        let translated = self.request(serde_json::json!(text), source_hint).await?;
        match translated {
            TranslatedText::One(s) => Ok(s),
            TranslatedText::Many(_) => Err(TranslateError::Malformed(
                "expected a single translated string".to_string(),
            )),
        }
    }

    /// Translate a batch of strings to English in one call.
    /// The response must have the same length as the input.
    pub async fn translate_batch(
        &self,
        texts: &[String],
        source_hint: Option<&str>,
    ) -> Result<Vec<String>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let translated = self.request(serde_json::json!(texts), source_hint).await?;
        match translated {
            TranslatedText::Many(items) if items.len() == texts.len() => Ok(items),
            TranslatedText::Many(items) => Err(TranslateError::Malformed(format!(
                "expected {} translations, got {}",
                texts.len(),
                items.len()
            ))),
            TranslatedText::One(_) => Err(TranslateError::Malformed(
                "expected an array of translated strings".to_string(),
            )),
        }
    }

    async fn request(
        &self,
        q: serde_json::Value,
        source_hint: Option<&str>,
    ) -> Result<TranslatedText> {
        let endpoint = format!("{}/translate", self.base_url);

        let mut body = serde_json::json!({
            "q": q,
            "source": source_hint.unwrap_or("auto"),
            "target": "en",
            "format": "text",
        });
        if let Some(ref key) = self.api_key {
            body["api_key"] = serde_json::json!(key);
        }

        let resp = self
            .client
            .post(&endpoint)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(TranslateError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: TranslateResponse = resp
            .json()
            .await
            .map_err(|e| TranslateError::Malformed(e.to_string()))?;
        Ok(parsed.translated_text)
    }
}
