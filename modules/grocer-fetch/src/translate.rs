use async_trait::async_trait;
use tracing::warn;
use translate_client::TranslateClient;

use crate::traits::Translator;

/// Translator backed by a LibreTranslate-compatible service. Failures never
/// propagate: a failed batch returns the originals, a failed item keeps the
/// original at its position.
pub struct ServiceTranslator {
    client: TranslateClient,
}

impl ServiceTranslator {
    pub fn new(base_url: &str, api_key: Option<&str>) -> Self {
        Self {
            client: TranslateClient::new(base_url, api_key),
        }
    }
}

#[async_trait]
impl Translator for ServiceTranslator {
    async fn translate(&self, text: &str, source_hint: Option<&str>) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }
        match self.client.translate(text, source_hint).await {
            Ok(translated) if !translated.trim().is_empty() => translated,
            Ok(_) => text.to_string(),
            Err(e) => {
                warn!(error = %e, "Translation failed, keeping original text");
                text.to_string()
            }
        }
    }

    async fn translate_batch(&self, texts: &[String], source_hint: Option<&str>) -> Vec<String> {
        if texts.iter().all(|t| t.trim().is_empty()) {
            return texts.to_vec();
        }
        match self.client.translate_batch(texts, source_hint).await {
            Ok(translated) => texts
                .iter()
                .zip(translated)
                .map(|(original, item)| {
                    // An empty translation is a per-item failure.
                    if item.trim().is_empty() {
                        original.clone()
                    } else {
                        item
                    }
                })
                .collect(),
            Err(e) => {
                warn!(error = %e, count = texts.len(), "Batch translation failed, keeping originals");
                texts.to_vec()
            }
        }
    }
}

/// Identity translator for when no translation service is configured.
pub struct NoopTranslator;

#[async_trait]
impl Translator for NoopTranslator {
    async fn translate(&self, text: &str, _source_hint: Option<&str>) -> String {
        text.to_string()
    }

    async fn translate_batch(&self, texts: &[String], _source_hint: Option<&str>) -> Vec<String> {
        texts.to_vec()
    }
}
