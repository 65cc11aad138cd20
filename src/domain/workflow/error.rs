use super::artifact::ArtifactKind;
use crate::error::AppError;
use crate::infrastructure::engines::EngineError;

/// Failures of the resolve → execute → normalize pipeline
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("workflow not found: {0}")]
    NotFound(String),
    #[error("{0} generation failed: {1}")]
    GenerationFailed(ArtifactKind, String),
    #[error("No {0} file generated by workflow")]
    NoArtifact(ArtifactKind),
    #[error("failed to download {url}: {reason}")]
    Download { url: String, reason: String },
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<WorkflowError> for AppError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::NotFound(_) => AppError::NotFound(err.to_string()),
            WorkflowError::GenerationFailed(..) | WorkflowError::NoArtifact(_) => {
                AppError::GenerationFailed(err.to_string())
            }
            WorkflowError::Download { .. } => AppError::ExternalService(err.to_string()),
            WorkflowError::Engine(EngineError::Config(msg)) => AppError::Configuration(msg),
            WorkflowError::Engine(EngineError::InvalidWorkflow(msg)) => AppError::BadRequest(msg),
            WorkflowError::Engine(e) => AppError::ExternalService(e.to_string()),
            WorkflowError::Io(e) => AppError::Internal(e.to_string()),
        }
    }
}
