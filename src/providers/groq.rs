// Groq chat-completion client (OpenAI-compatible API).
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::campaign::NextOption;
use crate::context::SessionContext;
use crate::error::ProviderError;
use crate::providers::{prompt, NextOptionsProvider, ProviderPayload};

const REQUEST_TIMEOUT_SECS: u64 = 60;
const TEMPERATURE: f32 = 0.4;

pub struct GroqProvider {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GroqProvider {
    pub fn new(api_key: &str, base_url: &str, model: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl NextOptionsProvider for GroqProvider {
    fn name(&self) -> &'static str {
        "groq"
    }

    async fn attempt(&self, ctx: &SessionContext) -> Result<Vec<NextOption>, ProviderError> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: prompt::build_system_prompt(ctx),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt::build_user_prompt(ctx),
                },
            ],
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response.json().await?;
        let choice = parsed.choices.into_iter().next().ok_or_else(|| {
            ProviderError::InvalidResponse("no choices in provider response".to_string())
        })?;

        let payload = if let Some(function_call) = choice.message.function_call {
            ProviderPayload::Structured(function_call.arguments)
        } else if let Some(content) = choice.message.content {
            ProviderPayload::Text(content)
        } else if let Some(text) = choice.text {
            ProviderPayload::Text(text)
        } else {
            return Err(ProviderError::InvalidResponse(
                "no message content in provider response".to_string(),
            ));
        };

        payload.into_options()
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: ChatResponseMessage,
    // Some completion-style deployments return the text at the choice level.
    #[serde(default)]
    text: Option<String>,
}

#[derive(Default, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    function_call: Option<FunctionCallPayload>,
}

#[derive(Deserialize)]
struct FunctionCallPayload {
    arguments: String,
}
