//! OpenRouter chat-completions backend
//!
//! Any server exposing `POST {host}/api/v1/chat/completions` with the OpenAI
//! request and response shape works here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::FinancialSummary;

use super::{advice_prompt, AdviceBackend};

pub const DEFAULT_HOST: &str = "https://openrouter.ai";
pub const DEFAULT_MODEL: &str = "mistralai/mistral-7b-instruct:free";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct OpenRouterBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl OpenRouterBackend {
    pub fn new(base_url: &str, model: &str, api_key: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Create from environment variables
    ///
    /// Required: `OPENROUTER_API_KEY`
    /// Optional: `OPENROUTER_MODEL`, `OPENROUTER_HOST`
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("OPENROUTER_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())?;
        let model = std::env::var("OPENROUTER_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let host = std::env::var("OPENROUTER_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());

        Some(Self::new(&host, &model, &api_key))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn chat_completion(&self, prompt: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .http_client
            .post(format!("{}/api/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .header("X-Title", "Fintrack")
            .timeout(REQUEST_TIMEOUT)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Advice(format!("OpenRouter error {}: {}", status, body)));
        }

        let chat_response: ChatCompletionResponse = response.json().await?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| Error::Advice("OpenRouter returned no advice".into()))
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[async_trait]
impl AdviceBackend for OpenRouterBackend {
    async fn advise(&self, summary: &FinancialSummary) -> Result<String> {
        let prompt = advice_prompt(summary);
        debug!(model = %self.model, "Requesting advice");
        self.chat_completion(&prompt).await
    }
}
