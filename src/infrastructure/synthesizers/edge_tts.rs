use super::{LocalSynthesizer, SpeechParams, SynthesizerError};
use async_trait::async_trait;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::Path;
use tokio::process::Command;

/// Microsoft Edge online voices through the `edge-tts` command line
pub struct EdgeTtsSynthesizer {
    binary: String,
}

impl EdgeTtsSynthesizer {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn build_command(&self, speech: &SpeechParams, output_path: &Path) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .arg("--text")
            .arg(&speech.text)
            .arg("--voice")
            .arg(&speech.voice)
            // Values such as "-20%" must be glued to their flag
            .arg(format!("--rate={}", speech.rate))
            .arg(format!("--volume={}", speech.volume))
            .arg(format!("--pitch={}", speech.pitch))
            .arg("--write-media")
            .arg(output_path);

        for (key, value) in &speech.extras {
            match (key.as_str(), value) {
                ("proxy", Value::String(proxy)) => {
                    command.arg("--proxy").arg(proxy);
                }
                _ => tracing::debug!(param = %key, "Ignoring parameter unsupported by edge-tts"),
            }
        }

        command
    }
}

#[async_trait]
impl LocalSynthesizer for EdgeTtsSynthesizer {
    async fn synthesize(
        &self,
        speech: &SpeechParams,
        output_path: &Path,
    ) -> Result<(), SynthesizerError> {
        let start_time = std::time::Instant::now();

        tracing::info!(
            voice = %speech.voice,
            rate = %speech.rate,
            text_length = speech.text.len(),
            "Starting edge-tts synthesis"
        );

        let output = self
            .build_command(speech, output_path)
            .output()
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => SynthesizerError::BinaryNotFound(self.binary.clone()),
                _ => SynthesizerError::Io(e),
            })?;

        if !output.status.success() {
            return Err(SynthesizerError::Failed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        if !tokio::fs::try_exists(output_path).await.unwrap_or(false) {
            return Err(SynthesizerError::MissingOutput(
                output_path.display().to_string(),
            ));
        }

        tracing::info!(
            provider = "edge-tts",
            latency_ms = start_time.elapsed().as_millis(),
            output_path = %output_path.display(),
            "TTS synthesis completed"
        );

        Ok(())
    }
}
