// OpenAI chat-completion client.
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs, ResponseFormat,
};
use async_openai::Client;
use async_trait::async_trait;

use crate::campaign::NextOption;
use crate::context::SessionContext;
use crate::error::ProviderError;
use crate::providers::{prompt, NextOptionsProvider, ProviderPayload};

const TEMPERATURE: f32 = 0.7;

pub struct OpenAiProvider {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiProvider {
    pub fn new(api_key: &str, model: &str) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        Self {
            client: Client::with_config(config),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl NextOptionsProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn attempt(&self, ctx: &SessionContext) -> Result<Vec<NextOption>, ProviderError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(prompt::build_system_prompt(ctx))
                    .build()?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt::build_user_prompt(ctx))
                    .build()?
                    .into(),
            ])
            .temperature(TEMPERATURE)
            .response_format(ResponseFormat::JsonObject)
            .build()?;

        let response = self.client.chat().create(request).await?;
        let choice = response.choices.into_iter().next().ok_or_else(|| {
            ProviderError::InvalidResponse("no choices in provider response".to_string())
        })?;

        #[allow(deprecated)]
        let payload = if let Some(function_call) = choice.message.function_call {
            ProviderPayload::Structured(function_call.arguments)
        } else if let Some(content) = choice.message.content {
            ProviderPayload::Text(content)
        } else {
            return Err(ProviderError::InvalidResponse(
                "no message content in provider response".to_string(),
            ));
        };

        payload.into_options()
    }
}
