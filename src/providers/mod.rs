// Provider-agnostic LLM gateway. Configured providers are tried strictly in
// order; the first success wins and every failure falls through, ending at
// the rule-based engine, so the caller always gets exactly three options.
mod groq;
mod openai;
pub mod prompt;

pub use groq::GroqProvider;
pub use openai::OpenAiProvider;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::campaign::{NextOption, OptionSource};
use crate::context::SessionContext;
use crate::error::ProviderError;
use crate::rules;
use crate::settings::Settings;

/// Uniform capability every LLM provider exposes to the gateway.
#[async_trait]
pub trait NextOptionsProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// One attempt against the provider, no retries. Any failure maps to a
    /// `ProviderError` and means immediate fallthrough to the next provider.
    async fn attempt(&self, ctx: &SessionContext) -> Result<Vec<NextOption>, ProviderError>;
}

/// The two response shapes a chat-completion endpoint can hand back: a plain
/// JSON content string, or the arguments of a structured function call. Each
/// provider resolves its response into one of these; the parsing into options
/// is shared.
#[derive(Debug, Clone)]
pub enum ProviderPayload {
    Text(String),
    Structured(String),
}

impl ProviderPayload {
    /// Parses the payload as JSON, extracts the `options` array (a bare array
    /// is accepted too), rejects empty results, and normalizes each entry.
    pub fn into_options(self) -> Result<Vec<NextOption>, ProviderError> {
        let raw = match self {
            ProviderPayload::Text(raw) | ProviderPayload::Structured(raw) => raw,
        };
        let value: Value = serde_json::from_str(raw.trim()).map_err(|err| {
            ProviderError::InvalidResponse(format!("response was not valid JSON: {err}"))
        })?;

        let items = match value {
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove("options") {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(ProviderError::InvalidResponse(
                        "response missing `options` array".to_string(),
                    ));
                }
            },
            _ => {
                return Err(ProviderError::InvalidResponse(
                    "expected a JSON object or array".to_string(),
                ));
            }
        };

        if items.is_empty() {
            return Err(ProviderError::EmptyOptions);
        }

        Ok(items
            .iter()
            .take(3)
            .enumerate()
            .map(|(idx, item)| normalize_option(idx, item))
            .collect())
    }
}

// Providers are loose about the exact entry shape: ids may be missing, titles
// may arrive as `name`, and bullets may be a `details` array or a single
// `explanation` string that needs flattening into a one-element array.
fn normalize_option(idx: usize, value: &Value) -> NextOption {
    let id = value
        .get("id")
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| (idx + 1).to_string());
    let title = value
        .get("title")
        .or_else(|| value.get("name"))
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_else(|| format!("Option {}", idx + 1));
    let bullets = match value.get("bullets").or_else(|| value.get("details")) {
        Some(Value::Array(items)) => items.iter().map(stringify).collect(),
        _ => {
            let detail = value
                .get("details")
                .or_else(|| value.get("explanation"))
                .map(stringify)
                .unwrap_or_default();
            vec![detail]
        }
    };

    NextOption {
        id,
        title,
        bullets,
        source: None,
    }
}

fn stringify(value: &Value) -> String {
    value
        .as_str()
        .map(String::from)
        .unwrap_or_else(|| value.to_string())
}

/// What the suggestion pipeline hands back to the UI: exactly three options
/// and the source they came from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionsResponse {
    pub options: Vec<NextOption>,
    pub source: OptionSource,
}

/// Tries a constructor-injected, ordered list of providers and falls back to
/// the rule engine. From the caller's point of view this never fails.
pub struct OptionsGateway {
    providers: Vec<Box<dyn NextOptionsProvider>>,
}

impl OptionsGateway {
    pub fn new(providers: Vec<Box<dyn NextOptionsProvider>>) -> Self {
        Self { providers }
    }

    /// Builds the provider chain from settings: Groq first when configured,
    /// then OpenAI. With no credentials the chain is empty and every request
    /// is answered by the rule engine.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut providers: Vec<Box<dyn NextOptionsProvider>> = Vec::new();
        if let Some(api_key) = &settings.groq_api_key {
            providers.push(Box::new(GroqProvider::new(
                api_key,
                &settings.groq_base_url,
                &settings.groq_model,
            )));
        }
        if let Some(api_key) = &settings.openai_api_key {
            providers.push(Box::new(OpenAiProvider::new(
                api_key,
                &settings.openai_model,
            )));
        }
        Self::new(providers)
    }

    /// Produces exactly three options for the context. Provider attempts are
    /// strictly sequential; the first success is returned tagged "llm", and
    /// every failure is logged and absorbed. The rule engine is the terminal
    /// fallback and cannot fail.
    pub async fn next_options(&self, ctx: &SessionContext) -> OptionsResponse {
        for provider in &self.providers {
            match provider.attempt(ctx).await {
                Ok(options) => {
                    log::info!("{} produced the next options", provider.name());
                    return tagged_response(
                        rules::pad_and_renumber(options, ctx),
                        OptionSource::Llm,
                    );
                }
                Err(err) => {
                    log::warn!("{} failed, falling through: {err}", provider.name());
                }
            }
        }

        tagged_response(rules::generate_next_options(ctx), OptionSource::RulesFallback)
    }
}

fn tagged_response(mut options: Vec<NextOption>, source: OptionSource) -> OptionsResponse {
    for option in &mut options {
        option.source = Some(source);
    }
    OptionsResponse { options, source }
}
