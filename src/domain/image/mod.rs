pub mod error;
pub mod service;

pub use error::ImageServiceError;
pub use service::{ImageService, ImageServiceApi};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request for POST /api/image/generate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageRequest {
    pub prompt: String,
    /// Workflow file name, path, URL or RunningHub id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workflow: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    /// Replaces the configured prompt prefix; an empty string disables it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comfyui_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runninghub_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub params: Map<String, Value>,
}

impl ImageRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }
}

/// Response for POST /api/image/generate
#[derive(Debug, Serialize, Deserialize)]
pub struct ImageResponse {
    pub image_path: String,
}
