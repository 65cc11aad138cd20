use super::error::WorkflowError;
use crate::infrastructure::engines::EngineResult;
use std::fmt;
use std::path::Path;

/// The kind of media a workflow is expected to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Audio,
    Image,
}

impl ArtifactKind {
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            ArtifactKind::Audio => &["mp3", "wav", "flac"],
            ArtifactKind::Image => &["png", "jpg", "jpeg", "webp"],
        }
    }

    /// Whether the raw string ends in one of this kind's extensions.
    /// Engines report ComfyUI view URLs (`/view?filename=a.mp3`), so the
    /// whole value is matched, query string included.
    pub fn matches(&self, reference: &str) -> bool {
        self.extensions()
            .iter()
            .any(|ext| reference.ends_with(&format!(".{}", ext)))
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactKind::Audio => write!(f, "audio"),
            ArtifactKind::Image => write!(f, "image"),
        }
    }
}

pub fn is_remote(reference: &str) -> bool {
    reference.starts_with("http://") || reference.starts_with("https://")
}

/// Pick the produced artifact out of an engine result.
///
/// Probe order: the dedicated list for `kind`, then the generic file list,
/// then the outputs map in engine order (first value with a matching
/// extension wins).
pub fn locate_artifact(result: &EngineResult, kind: ArtifactKind) -> Option<&str> {
    let dedicated = match kind {
        ArtifactKind::Audio => result.audios.as_deref(),
        ArtifactKind::Image => result.images.as_deref(),
    };

    if let Some(first) = dedicated.and_then(|list| list.first()) {
        return Some(first.as_str());
    }

    if let Some(first) = result.files.as_deref().and_then(|list| list.first()) {
        return Some(first.as_str());
    }

    result.outputs.as_ref().and_then(|outputs| {
        outputs
            .values()
            .filter_map(|value| value.as_str())
            .find(|value| kind.matches(value))
    })
}

/// Downloads remote artifacts to a caller-chosen location
#[derive(Clone)]
pub struct ArtifactFetcher {
    http_client: reqwest::Client,
}

impl ArtifactFetcher {
    pub fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    /// Fetch `url` and write the body to `output_path`, creating parent
    /// directories. Non-success statuses are errors.
    pub async fn download(&self, url: &str, output_path: &Path) -> Result<u64, WorkflowError> {
        ensure_parent_dir(output_path).await?;

        tracing::info!(
            url = %url,
            output_path = %output_path.display(),
            "Downloading artifact"
        );

        let download_error = |reason: String| WorkflowError::Download {
            url: url.to_string(),
            reason,
        };

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| download_error(e.to_string()))?
            .error_for_status()
            .map_err(|e| download_error(e.to_string()))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| download_error(e.to_string()))?;

        tokio::fs::write(output_path, &bytes).await?;

        tracing::debug!(size_bytes = bytes.len(), "Artifact written");

        Ok(bytes.len() as u64)
    }
}

pub async fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => tokio::fs::create_dir_all(parent).await,
        _ => Ok(()),
    }
}
