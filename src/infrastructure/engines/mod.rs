pub mod binding;
pub mod comfyui;
pub mod runner;
pub mod runninghub;

pub use comfyui::ComfyUiClient;
pub use runner::WorkflowRunner;
pub use runninghub::RunningHubClient;

use crate::domain::workflow::BackendTarget;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Named inputs handed to a workflow, in insertion order
pub type WorkflowParams = Map<String, Value>;

const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "flac", "ogg", "m4a"];
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "mkv"];

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("engine request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid workflow: {0}")]
    InvalidWorkflow(String),
    #[error("engine rejected the job: {0}")]
    Rejected(String),
    #[error("unexpected engine response: {0}")]
    Protocol(String),
    #[error("{0}")]
    Config(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Completed,
    Failed,
}

/// Outcome of one workflow execution.
///
/// Every engine fills the same optional fields; which ones are present
/// depends on what the workflow produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineResult {
    pub status: ExecutionStatus,
    pub msg: Option<String>,
    pub job_id: Option<String>,
    pub audios: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub videos: Option<Vec<String>>,
    pub files: Option<Vec<String>>,
    /// Output node id → first artifact reference
    pub outputs: Option<Map<String, Value>>,
}

impl EngineResult {
    pub fn completed() -> Self {
        Self {
            status: ExecutionStatus::Completed,
            msg: None,
            job_id: None,
            audios: None,
            images: None,
            videos: None,
            files: None,
            outputs: None,
        }
    }

    pub fn failed(msg: impl Into<String>) -> Self {
        Self {
            status: ExecutionStatus::Failed,
            msg: Some(msg.into()),
            ..Self::completed()
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == ExecutionStatus::Completed
    }

    /// Record a produced file, sorting it into the matching media list
    pub(crate) fn push_file(&mut self, file_name: &str, reference: String) {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        let bucket = if AUDIO_EXTENSIONS.contains(&extension.as_str()) {
            Some(&mut self.audios)
        } else if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            Some(&mut self.images)
        } else if VIDEO_EXTENSIONS.contains(&extension.as_str()) {
            Some(&mut self.videos)
        } else {
            None
        };

        if let Some(bucket) = bucket {
            bucket.get_or_insert_with(Vec::new).push(reference.clone());
        }
        self.files.get_or_insert_with(Vec::new).push(reference);
    }
}

/// Connection settings for one execution; config defaults plus per-call overrides
#[derive(Debug, Clone, Default)]
pub struct EngineConnection {
    pub comfyui_url: String,
    pub runninghub_api_key: Option<String>,
}

impl EngineConnection {
    pub fn new(comfyui_url: impl Into<String>, runninghub_api_key: impl Into<String>) -> Self {
        let key = runninghub_api_key.into();
        Self {
            comfyui_url: comfyui_url.into(),
            runninghub_api_key: Some(key).filter(|k| !k.trim().is_empty()),
        }
    }

    pub fn with_overrides(
        &self,
        comfyui_url: Option<&str>,
        runninghub_api_key: Option<&str>,
    ) -> Self {
        Self {
            comfyui_url: comfyui_url
                .filter(|url| !url.trim().is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| self.comfyui_url.clone()),
            runninghub_api_key: runninghub_api_key
                .filter(|key| !key.trim().is_empty())
                .map(str::to_string)
                .or_else(|| self.runninghub_api_key.clone()),
        }
    }
}

/// Executes workflows on a ComfyUI-compatible engine.
///
/// Engine-reported failures (validation errors, failed jobs, timeouts) come
/// back as a failed [`EngineResult`]; `Err` is reserved for transport and
/// configuration problems.
#[async_trait]
pub trait WorkflowEngine: Send + Sync {
    async fn execute(
        &self,
        connection: &EngineConnection,
        target: &BackendTarget,
        params: &WorkflowParams,
    ) -> Result<EngineResult, EngineError>;
}
