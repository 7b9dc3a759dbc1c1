use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{api_failure, GenerationBackend, ProviderFailure, GENERATION_TEMPERATURE};
use crate::{error::AppResult, models::ProviderTier};

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Clone)]
pub struct PaidModelBackend {
    http_client: HttpClient,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl PaidModelBackend {
    pub fn new(
        base_url: String,
        model: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
        })
    }
}

#[async_trait]
impl GenerationBackend for PaidModelBackend {
    async fn generate(&self, prompt: &str) -> Result<String, ProviderFailure> {
        let api_key = self.api_key.as_deref().ok_or_else(|| {
            ProviderFailure::Unavailable("no API key configured for the paid model".to_string())
        })?;

        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: GENERATION_TEMPERATURE,
        };

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_failure(response).await);
        }

        let body = response.text().await?;
        let parsed: ChatCompletionResponse =
            serde_json::from_str(&body).map_err(|e| ProviderFailure::MalformedOutput {
                raw: body.clone(),
                detail: format!("unexpected response envelope: {}", e),
            })?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(ProviderFailure::MalformedOutput {
                raw: body,
                detail: "no message content in completion".to_string(),
            })
    }

    /// Credential presence only; no request is made
    async fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    fn tier(&self) -> ProviderTier {
        ProviderTier::PaidModel
    }

    fn model_name(&self) -> String {
        self.model.clone()
    }
}
