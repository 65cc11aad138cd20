use super::error::TtsServiceError;
use super::SynthesisRequest;
use crate::domain::workflow::artifact::ensure_parent_dir;
use crate::domain::workflow::{
    ArtifactKind, BackendTarget, ConnectionOverrides, WorkflowDispatcher, WorkflowResolver,
};
use crate::infrastructure::engines::WorkflowParams;
use crate::infrastructure::synthesizers::{LocalSynthesizer, SpeechParams};
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

/// Provider names handled by the local synthesizer instead of a workflow
pub const BUILTIN_PROVIDERS: &[&str] = &["edge", "edge-tts"];

pub const WORKFLOW_PREFIX: &str = "tts_";

const DEFAULT_VOICE: &str = "zh-CN-YunjianNeural";
const DEFAULT_RATE: &str = "+0%";
const DEFAULT_VOLUME: &str = "+0%";
const DEFAULT_PITCH: &str = "+0Hz";

pub struct TtsService {
    resolver: WorkflowResolver,
    dispatcher: WorkflowDispatcher,
    synthesizer: Arc<dyn LocalSynthesizer>,
    default_workflow: String,
    temp_dir: PathBuf,
}

impl TtsService {
    pub fn new(
        resolver: WorkflowResolver,
        dispatcher: WorkflowDispatcher,
        synthesizer: Arc<dyn LocalSynthesizer>,
        default_workflow: String,
        temp_dir: PathBuf,
    ) -> Self {
        Self {
            resolver,
            dispatcher,
            synthesizer,
            default_workflow,
            temp_dir,
        }
    }
}

#[async_trait]
pub trait TtsServiceApi: Send + Sync {
    /// Synthesize speech and return the path (or URL) of the audio.
    ///
    /// This operation:
    /// - Resolves `request.workflow` (or the configured default)
    /// - Runs the built-in provider or the workflow engine
    /// - Downloads remote audio when an output path was requested
    async fn synthesize(&self, request: SynthesisRequest) -> Result<String, TtsServiceError>;

    /// Run an already-resolved target
    async fn dispatch(
        &self,
        request: &SynthesisRequest,
        target: &BackendTarget,
        output_path: Option<&str>,
    ) -> Result<String, TtsServiceError>;

    /// Workflow file names available to this service
    fn list_workflows(&self) -> Vec<String>;
}

#[async_trait]
impl TtsServiceApi for TtsService {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<String, TtsServiceError> {
        if request.text.trim().is_empty() {
            return Err(TtsServiceError::Invalid("Text cannot be empty".to_string()));
        }

        tracing::info!(
            workflow = request.workflow.as_deref().unwrap_or(&self.default_workflow),
            text_length = request.text.len(),
            "TTS synthesis request"
        );

        let target = self
            .resolver
            .resolve(request.workflow.as_deref(), &self.default_workflow)?;

        self.dispatch(&request, &target, request.output_path.as_deref())
            .await
    }

    async fn dispatch(
        &self,
        request: &SynthesisRequest,
        target: &BackendTarget,
        output_path: Option<&str>,
    ) -> Result<String, TtsServiceError> {
        match target {
            BackendTarget::BuiltinProvider { name } => {
                self.call_builtin(name, request, output_path).await
            }
            BackendTarget::LocalWorkflow { .. } | BackendTarget::RemoteWorkflow { .. } => {
                let params = workflow_params(request);
                let overrides = ConnectionOverrides {
                    comfyui_url: request.comfyui_url.as_deref(),
                    runninghub_api_key: request.runninghub_api_key.as_deref(),
                };

                tracing::info!(workflow = %target, "Using TTS workflow");

                let audio = self
                    .dispatcher
                    .run(target, overrides, &params, ArtifactKind::Audio, output_path)
                    .await?;
                Ok(audio)
            }
        }
    }

    fn list_workflows(&self) -> Vec<String> {
        self.resolver.list_workflows()
    }
}

impl TtsService {
    pub fn builtins(&self) -> Vec<String> {
        self.resolver
            .builtins()
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    async fn call_builtin(
        &self,
        provider: &str,
        request: &SynthesisRequest,
        output_path: Option<&str>,
    ) -> Result<String, TtsServiceError> {
        tracing::info!(provider = %provider, "Using built-in TTS provider");

        let output_path = output_path.filter(|path| !path.is_empty());
        let path = match output_path {
            Some(path) => PathBuf::from(path),
            None => self
                .temp_dir
                .join(format!("{}.mp3", Uuid::new_v4().simple())),
        };
        ensure_parent_dir(&path).await?;

        let speech = SpeechParams {
            text: request.text.clone(),
            voice: request.voice.clone().unwrap_or_else(|| DEFAULT_VOICE.to_string()),
            rate: request.rate.clone().unwrap_or_else(|| DEFAULT_RATE.to_string()),
            volume: request
                .volume
                .clone()
                .unwrap_or_else(|| DEFAULT_VOLUME.to_string()),
            pitch: request.pitch.clone().unwrap_or_else(|| DEFAULT_PITCH.to_string()),
            extras: request.params.clone(),
        };

        if let Err(e) = self.synthesizer.synthesize(&speech, &path).await {
            tracing::error!(provider = %provider, error = %e, "Local TTS generation error");
            return Err(e.into());
        }

        let path = match output_path {
            Some(path) => path.to_string(),
            None => path.to_string_lossy().into_owned(),
        };
        tracing::info!(provider = %provider, output_path = %path, "Generated audio");
        Ok(path)
    }
}

/// `text`, then every supplied named parameter, then the caller's extras.
/// Extras are merged last, so they overwrite named parameters.
fn workflow_params(request: &SynthesisRequest) -> WorkflowParams {
    let mut params = WorkflowParams::new();
    params.insert("text".to_string(), Value::String(request.text.clone()));

    let named = [
        ("voice", &request.voice),
        ("rate", &request.rate),
        ("volume", &request.volume),
        ("pitch", &request.pitch),
    ];
    for (key, value) in named {
        if let Some(value) = value {
            params.insert(key.to_string(), Value::String(value.clone()));
        }
    }

    for (key, value) in &request.params {
        params.insert(key.clone(), value.clone());
    }

    params
}
