use super::error::ImageServiceError;
use super::ImageRequest;
use crate::domain::workflow::{
    ArtifactKind, ConnectionOverrides, WorkflowDispatcher, WorkflowResolver,
};
use crate::infrastructure::engines::WorkflowParams;
use async_trait::async_trait;
use serde_json::Value;

pub const WORKFLOW_PREFIX: &str = "image_";

pub struct ImageService {
    resolver: WorkflowResolver,
    dispatcher: WorkflowDispatcher,
    default_workflow: Option<String>,
    prompt_prefix: String,
}

impl ImageService {
    pub fn new(
        resolver: WorkflowResolver,
        dispatcher: WorkflowDispatcher,
        default_workflow: Option<String>,
        prompt_prefix: String,
    ) -> Self {
        Self {
            resolver,
            dispatcher,
            default_workflow,
            prompt_prefix,
        }
    }
}

#[async_trait]
pub trait ImageServiceApi: Send + Sync {
    /// Generate an image through a workflow and return its path or URL
    async fn generate(&self, request: ImageRequest) -> Result<String, ImageServiceError>;

    fn list_workflows(&self) -> Vec<String>;
}

#[async_trait]
impl ImageServiceApi for ImageService {
    async fn generate(&self, request: ImageRequest) -> Result<String, ImageServiceError> {
        if request.prompt.trim().is_empty() {
            return Err(ImageServiceError::Invalid(
                "Prompt cannot be empty".to_string(),
            ));
        }

        // An explicit workflow does not need a default
        let Some(workflow) = request
            .workflow
            .as_deref()
            .or(self.default_workflow.as_deref())
        else {
            return Err(ImageServiceError::NoDefaultWorkflow);
        };

        let target = self.resolver.resolve(Some(workflow), workflow)?;

        let prefix = request
            .prompt_prefix
            .as_deref()
            .unwrap_or(&self.prompt_prefix);
        let params = workflow_params(&request, prefix);
        let overrides = ConnectionOverrides {
            comfyui_url: request.comfyui_url.as_deref(),
            runninghub_api_key: request.runninghub_api_key.as_deref(),
        };

        tracing::info!(workflow = %target, "Generating image");

        let image = self
            .dispatcher
            .run(
                &target,
                overrides,
                &params,
                ArtifactKind::Image,
                request.output_path.as_deref(),
            )
            .await?;
        Ok(image)
    }

    fn list_workflows(&self) -> Vec<String> {
        self.resolver.list_workflows()
    }
}

pub fn apply_prompt_prefix(prefix: &str, prompt: &str) -> String {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        prompt.to_string()
    } else {
        format!("{}, {}", prefix, prompt)
    }
}

fn workflow_params(request: &ImageRequest, prefix: &str) -> WorkflowParams {
    let mut params = WorkflowParams::new();
    params.insert(
        "prompt".to_string(),
        Value::String(apply_prompt_prefix(prefix, &request.prompt)),
    );
    if let Some(width) = request.width {
        params.insert("width".to_string(), Value::from(width));
    }
    if let Some(height) = request.height {
        params.insert("height".to_string(), Value::from(height));
    }
    if let Some(negative) = &request.negative_prompt {
        params.insert(
            "negative_prompt".to_string(),
            Value::String(negative.clone()),
        );
    }
    for (key, value) in &request.params {
        params.insert(key.clone(), value.clone());
    }
    params
}
