use super::{
    ComfyUiClient, EngineConnection, EngineError, EngineResult, RunningHubClient, WorkflowEngine,
    WorkflowParams,
};
use crate::domain::workflow::{BackendTarget, EngineOrigin};
use crate::infrastructure::config::WorkflowsConfig;
use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

/// Routes a resolved target to the engine that understands it
pub struct WorkflowRunner {
    comfyui: ComfyUiClient,
    runninghub: RunningHubClient,
}

impl WorkflowRunner {
    pub fn new(http_client: reqwest::Client, config: &WorkflowsConfig) -> Self {
        let timeout = Duration::from_secs(config.engine_timeout_secs);
        Self {
            comfyui: ComfyUiClient::new(http_client.clone(), timeout),
            runninghub: RunningHubClient::new(http_client, config.runninghub_url.clone(), timeout),
        }
    }

    pub fn from_clients(comfyui: ComfyUiClient, runninghub: RunningHubClient) -> Self {
        Self {
            comfyui,
            runninghub,
        }
    }

    async fn load_workflow_file(path: &Path) -> Result<Value, EngineError> {
        let contents = tokio::fs::read_to_string(path).await?;
        serde_json::from_str(&contents).map_err(|e| {
            EngineError::InvalidWorkflow(format!("{} is not valid JSON: {}", path.display(), e))
        })
    }
}

#[async_trait]
impl WorkflowEngine for WorkflowRunner {
    async fn execute(
        &self,
        connection: &EngineConnection,
        target: &BackendTarget,
        params: &WorkflowParams,
    ) -> Result<EngineResult, EngineError> {
        match target {
            BackendTarget::BuiltinProvider { name } => Err(EngineError::Config(format!(
                "'{}' is a built-in provider, not a workflow",
                name
            ))),
            BackendTarget::LocalWorkflow { file_path } => {
                tracing::info!(workflow = %file_path.display(), "Executing selfhost workflow");
                let workflow = Self::load_workflow_file(file_path).await?;
                self.comfyui
                    .run(&connection.comfyui_url, workflow, params)
                    .await
            }
            BackendTarget::RemoteWorkflow {
                job_id,
                engine_origin: EngineOrigin::SelfHosted,
            } => {
                tracing::info!(workflow = %job_id, "Executing selfhost workflow from URL");
                let workflow = self.comfyui.fetch_workflow(job_id).await?;
                self.comfyui
                    .run(&connection.comfyui_url, workflow, params)
                    .await
            }
            BackendTarget::RemoteWorkflow {
                job_id,
                engine_origin: EngineOrigin::RunningHub,
            } => {
                let api_key = connection.runninghub_api_key.as_deref().ok_or_else(|| {
                    EngineError::Config(
                        "RunningHub API key is not configured (set RUNNINGHUB_API_KEY)".to_string(),
                    )
                })?;
                tracing::info!(workflow_id = %job_id, "Executing RunningHub workflow");
                self.runninghub.run(api_key, job_id, params).await
            }
        }
    }
}
