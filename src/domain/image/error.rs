use crate::domain::workflow::WorkflowError;
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum ImageServiceError {
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("no default image workflow configured (set IMAGE_DEFAULT_WORKFLOW)")]
    NoDefaultWorkflow,
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
}

impl From<ImageServiceError> for AppError {
    fn from(err: ImageServiceError) -> Self {
        match err {
            ImageServiceError::Invalid(msg) => AppError::BadRequest(msg),
            ImageServiceError::NoDefaultWorkflow => AppError::Configuration(err.to_string()),
            ImageServiceError::Workflow(e) => AppError::from(e),
        }
    }
}
