pub mod edge_tts;

pub use edge_tts::EdgeTtsSynthesizer;

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum SynthesizerError {
    #[error("synthesizer binary '{0}' not found")]
    BinaryNotFound(String),
    #[error("synthesizer exited with {code:?}: {stderr}")]
    Failed { code: Option<i32>, stderr: String },
    #[error("synthesizer produced no output at {0}")]
    MissingOutput(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fully-defaulted input for a local synthesis call
#[derive(Debug, Clone)]
pub struct SpeechParams {
    pub text: String,
    pub voice: String,
    pub rate: String,
    pub volume: String,
    pub pitch: String,
    /// Provider-specific extras, passed through untouched
    pub extras: Map<String, Value>,
}

/// Speech synthesis implemented by a local library or program.
/// Implementations write the audio to `output_path` themselves.
#[async_trait]
pub trait LocalSynthesizer: Send + Sync {
    async fn synthesize(&self, speech: &SpeechParams, output_path: &Path)
        -> Result<(), SynthesizerError>;
}
