use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::{Deserialize, Serialize};

use crate::error::{BotError, BotResult};
use crate::utils::logging::log_timeout;

const RETRIES: u32 = 1;

/// Prompt in, text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> BotResult<String>;
}

/// Runs `generator` under `timeout`; an elapsed timeout is a generation failure.
pub async fn generate_with_timeout(
    generator: &dyn TextGenerator,
    prompt: &str,
    timeout: Duration,
) -> BotResult<String> {
    match tokio::time::timeout(timeout, generator.generate(prompt)).await {
        Ok(result) => result,
        Err(_) => {
            log_timeout("text generation", timeout, None);
            Err(BotError::GenerationTimeout(timeout))
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Clone, Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Clone, Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Clone, Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Clone, Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

const SYSTEM_PROMPT: &str = "You are a calm, supportive wellbeing companion. \
    Answer briefly and kindly. You are not a doctor and never give medical diagnoses.";

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
pub struct LlmClient {
    client: ClientWithMiddleware,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
}

impl LlmClient {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(RETRIES);

        let client = ClientBuilder::new(Client::new())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            temperature: 0.7,
        }
    }

    fn build_request(&self, prompt: &str) -> ChatCompletionRequest<'_> {
        ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            temperature: self.temperature,
        }
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(&self, prompt: &str) -> BotResult<String> {
        let request = self.build_request(prompt);
        let body = serde_json::to_vec(&request).map_err(|e| BotError::Generation(e.to_string()))?;

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| BotError::Generation(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| BotError::Generation(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!("LLM service returned {}: {}", status, text);
            return Err(BotError::Generation(format!("service returned {status}")));
        }

        let parsed: ChatCompletionResponse =
            serde_json::from_str(&text).map_err(|e| BotError::Generation(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| BotError::Generation("empty completion".to_string()))
    }
}
