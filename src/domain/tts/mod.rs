pub mod error;
pub mod service;

pub use error::TtsServiceError;
pub use service::{TtsService, TtsServiceApi, BUILTIN_PROVIDERS};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request for POST /api/tts/synthesize
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SynthesisRequest {
    pub text: String,
    /// Built-in provider name, workflow file name, path, URL or RunningHub id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
    // Engine connection overrides, workflow mode only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comfyui_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runninghub_api_key: Option<String>,
    /// Backend-specific extras
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub params: Map<String, Value>,
}

impl SynthesisRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Response for POST /api/tts/synthesize
#[derive(Debug, Serialize, Deserialize)]
pub struct SynthesisResponse {
    pub audio_path: String,
}

/// Response for GET /api/tts/workflows
#[derive(Debug, Serialize, Deserialize)]
pub struct WorkflowListResponse {
    pub builtins: Vec<String>,
    pub workflows: Vec<String>,
}
