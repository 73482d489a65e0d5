//! Google Gemini `generateContent` backend.

use crate::llm::{
    build_provider_client_with_timeout, sanitize_api_error, scrub_secret_patterns,
    traits::Provider,
};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;

mod types;
use types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part,
};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Decisions are one short JSON object.
const MAX_OUTPUT_TOKENS: u32 = 1024;

pub struct GeminiProvider {
    api_key: Option<String>,
    base_url: String,
    client: Client,
}

impl GeminiProvider {
    pub fn new(api_key: Option<&str>, timeout_secs: u64) -> Self {
        Self {
            api_key: api_key
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(String::from),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: build_provider_client_with_timeout(timeout_secs),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn build_request(
        system_prompt: Option<&str>,
        message: &str,
        temperature: f64,
    ) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: message.to_string(),
                }],
            }],
            system_instruction: system_prompt.map(|sys| Content {
                role: None,
                parts: vec![Part {
                    text: sys.to_string(),
                }],
            }),
            generation_config: GenerationConfig {
                temperature,
                max_output_tokens: MAX_OUTPUT_TOKENS,
            },
        }
    }

    fn model_name(model: &str) -> String {
        if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        }
    }

    fn api_key(&self) -> anyhow::Result<&str> {
        self.api_key.as_deref().ok_or_else(|| {
            anyhow::anyhow!(
                "Gemini API key not found. Set GEMINI_API_KEY or [proposer].api_key in config.toml."
            )
        })
    }

    fn extract_text(result: GenerateContentResponse) -> anyhow::Result<String> {
        if let Some(error) = result.error {
            anyhow::bail!(
                "Gemini API error: {}",
                scrub_secret_patterns(&error.message)
            );
        }

        let text = result
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            anyhow::bail!("No response from Gemini");
        }
        Ok(text)
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn chat_with_system(
        &self,
        system_prompt: Option<&str>,
        message: &str,
        model: &str,
        temperature: f64,
    ) -> anyhow::Result<String> {
        let api_key = self.api_key()?;
        let url = format!(
            "{}/v1beta/{}:generateContent",
            self.base_url,
            Self::model_name(model)
        );
        let request = Self::build_request(system_prompt, message, temperature);

        let response = self
            .client
            .post(url)
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("Gemini request failed: {}", sanitize_api_error(&e.to_string())))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error ({status}): {}", sanitize_api_error(&error_text));
        }

        let result: GenerateContentResponse = response
            .json()
            .await
            .context("Gemini returned an unreadable body")?;
        Self::extract_text(result)
    }
}
