use crate::error::AppError;
use crate::infrastructure::llm::DiscoveryError;
use async_openai::error::OpenAIError;

#[derive(Debug, thiserror::Error)]
pub enum LlmServiceError {
    #[error("LLM is not configured (set LLM_API_KEY, LLM_BASE_URL and LLM_MODEL)")]
    NotConfigured,
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("LLM request failed: {0}")]
    Api(#[from] OpenAIError),
    #[error("LLM returned no content")]
    EmptyResponse,
    #[error("model discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),
}

impl From<LlmServiceError> for AppError {
    fn from(err: LlmServiceError) -> Self {
        match err {
            LlmServiceError::NotConfigured => AppError::Configuration(err.to_string()),
            LlmServiceError::Invalid(msg) => AppError::BadRequest(msg),
            LlmServiceError::Api(_)
            | LlmServiceError::EmptyResponse
            | LlmServiceError::Discovery(_) => AppError::ExternalService(err.to_string()),
        }
    }
}
