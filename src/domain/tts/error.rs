use crate::domain::workflow::WorkflowError;
use crate::error::AppError;
use crate::infrastructure::synthesizers::SynthesizerError;

#[derive(Debug, thiserror::Error)]
pub enum TtsServiceError {
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
    #[error("local TTS generation failed: {0}")]
    Synthesis(#[from] SynthesizerError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<TtsServiceError> for AppError {
    fn from(err: TtsServiceError) -> Self {
        match err {
            TtsServiceError::Invalid(msg) => AppError::BadRequest(msg),
            TtsServiceError::Workflow(e) => AppError::from(e),
            TtsServiceError::Synthesis(SynthesizerError::BinaryNotFound(binary)) => {
                AppError::Configuration(format!("TTS binary '{}' is not installed", binary))
            }
            TtsServiceError::Synthesis(e) => AppError::ExternalService(e.to_string()),
            TtsServiceError::Io(e) => AppError::Internal(e.to_string()),
        }
    }
}
