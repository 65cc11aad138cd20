use super::artifact::{is_remote, locate_artifact, ArtifactFetcher, ArtifactKind};
use super::error::WorkflowError;
use super::target::BackendTarget;
use crate::infrastructure::engines::{EngineConnection, WorkflowEngine, WorkflowParams};
use std::path::Path;
use std::sync::Arc;

/// Per-call engine connection overrides
#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectionOverrides<'a> {
    pub comfyui_url: Option<&'a str>,
    pub runninghub_api_key: Option<&'a str>,
}

/// Runs a resolved workflow target and normalizes the produced artifact to
/// a single path or URL.
#[derive(Clone)]
pub struct WorkflowDispatcher {
    engine: Arc<dyn WorkflowEngine>,
    fetcher: ArtifactFetcher,
    connection: EngineConnection,
}

impl WorkflowDispatcher {
    pub fn new(
        engine: Arc<dyn WorkflowEngine>,
        fetcher: ArtifactFetcher,
        connection: EngineConnection,
    ) -> Self {
        Self {
            engine,
            fetcher,
            connection,
        }
    }

    /// Execute `target` and return the artifact reference.
    ///
    /// A remote artifact is downloaded only when `output_path` is given, in
    /// which case `output_path` is returned. An empty `output_path` counts as
    /// absent. Local paths and URLs without an
    /// output path are returned as the engine reported them.
    pub async fn run(
        &self,
        target: &BackendTarget,
        overrides: ConnectionOverrides<'_>,
        params: &WorkflowParams,
        kind: ArtifactKind,
        output_path: Option<&str>,
    ) -> Result<String, WorkflowError> {
        let connection = self
            .connection
            .with_overrides(overrides.comfyui_url, overrides.runninghub_api_key);

        tracing::debug!(workflow = %target, params = ?params, "Executing workflow");

        let result = self.engine.execute(&connection, target, params).await?;

        if !result.is_completed() {
            let msg = result
                .msg
                .clone()
                .unwrap_or_else(|| "Unknown error".to_string());
            tracing::error!(workflow = %target, error = %msg, "{} generation failed", kind);
            return Err(WorkflowError::GenerationFailed(kind, msg));
        }

        let Some(artifact) = locate_artifact(&result, kind) else {
            tracing::error!(workflow = %target, "No {} file generated", kind);
            return Err(WorkflowError::NoArtifact(kind));
        };

        if let Some(output_path) = output_path.filter(|path| !path.is_empty()) {
            if is_remote(artifact) {
                self.fetcher.download(artifact, Path::new(output_path)).await?;
                tracing::info!(output_path = %output_path, "Generated {} (workflow)", kind);
                return Ok(output_path.to_string());
            }
        }

        tracing::info!(artifact = %artifact, "Generated {} (workflow)", kind);
        Ok(artifact.to_string())
    }
}
