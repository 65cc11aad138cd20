use super::error::LlmServiceError;
use super::{CompletionRequest, ProviderOverrides};
use crate::infrastructure::config::LlmConfig;
use crate::infrastructure::llm::{api_base, ConnectionProbeResult, ModelDiscoveryClient};
use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use std::time::Duration;

pub struct LlmService {
    config: LlmConfig,
    discovery: ModelDiscoveryClient,
}

impl LlmService {
    pub fn new(config: LlmConfig, discovery: ModelDiscoveryClient) -> Self {
        Self { config, discovery }
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs)
    }

    /// Effective (api_key, base_url) after applying per-call overrides
    fn provider<'a>(&'a self, overrides: &'a ProviderOverrides) -> (&'a str, &'a str) {
        let api_key = overrides.api_key.as_deref().unwrap_or(&self.config.api_key);
        let base_url = overrides
            .base_url
            .as_deref()
            .unwrap_or(&self.config.base_url);
        (api_key.trim(), base_url.trim())
    }
}

#[async_trait]
pub trait LlmServiceApi: Send + Sync {
    /// Single-turn chat completion with the configured model
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmServiceError>;

    async fn list_models(
        &self,
        overrides: ProviderOverrides,
    ) -> Result<Vec<String>, LlmServiceError>;

    async fn test_connection(
        &self,
        overrides: ProviderOverrides,
    ) -> Result<ConnectionProbeResult, LlmServiceError>;
}

#[async_trait]
impl LlmServiceApi for LlmService {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmServiceError> {
        if !self.config.is_configured() {
            return Err(LlmServiceError::NotConfigured);
        }
        if request.prompt.trim().is_empty() {
            return Err(LlmServiceError::Invalid(
                "Prompt cannot be empty".to_string(),
            ));
        }

        tracing::info!(
            model = %self.config.model,
            prompt_length = request.prompt.len(),
            temperature = request.temperature,
            max_tokens = request.max_tokens,
            "Calling LLM"
        );

        let client = Client::with_config(
            OpenAIConfig::new()
                .with_api_key(self.config.api_key.trim())
                .with_api_base(api_base(self.config.base_url.trim())),
        );

        let message: ChatCompletionRequestMessage = ChatCompletionRequestUserMessageArgs::default()
            .content(request.prompt)
            .build()?
            .into();

        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(self.config.model.trim())
            .messages(vec![message])
            .temperature(request.temperature)
            .max_tokens(request.max_tokens)
            .build()?;

        let response = client.chat().create(chat_request).await.map_err(|e| {
            tracing::error!(model = %self.config.model, error = %e, "LLM call failed");
            e
        })?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(LlmServiceError::EmptyResponse)?;

        tracing::info!(response_length = content.len(), "LLM response received");
        Ok(content)
    }

    async fn list_models(
        &self,
        overrides: ProviderOverrides,
    ) -> Result<Vec<String>, LlmServiceError> {
        let (api_key, base_url) = self.provider(&overrides);
        if base_url.is_empty() {
            return Err(LlmServiceError::Invalid("base_url is required".to_string()));
        }
        let models = self
            .discovery
            .fetch_models(api_key, base_url, self.timeout())
            .await?;
        Ok(models)
    }

    async fn test_connection(
        &self,
        overrides: ProviderOverrides,
    ) -> Result<ConnectionProbeResult, LlmServiceError> {
        // Never an Err for provider problems; an empty URL reports as a failed probe
        let (api_key, base_url) = self.provider(&overrides);
        Ok(self
            .discovery
            .test_connection(api_key, base_url, self.timeout())
            .await)
    }
}
