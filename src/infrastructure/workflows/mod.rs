use crate::domain::workflow::{BackendTarget, EngineOrigin, WorkflowError};
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Engine-specific folders searched after the workflows root
const ENGINE_SUBDIRS: [&str; 2] = ["selfhost", "runninghub"];

/// Finds workflows on disk and classifies free-form workflow identifiers.
///
/// Accepted identifiers:
/// - `http://` / `https://` URLs of a workflow document (selfhost)
/// - absolute or relative paths to a workflow file
/// - numeric RunningHub workflow ids
/// - bare names, looked up under the workflows directory with and without
///   the service prefix and `.json` suffix
#[derive(Debug, Clone)]
pub struct WorkflowLocator {
    workflows_dir: PathBuf,
}

impl WorkflowLocator {
    pub fn new(workflows_dir: impl Into<PathBuf>) -> Self {
        Self {
            workflows_dir: workflows_dir.into(),
        }
    }

    pub fn locate(&self, identifier: &str, prefix: &str) -> Result<BackendTarget, WorkflowError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(WorkflowError::NotFound("(empty workflow name)".to_string()));
        }

        if identifier.starts_with("http://") || identifier.starts_with("https://") {
            return Ok(BackendTarget::RemoteWorkflow {
                job_id: identifier.to_string(),
                engine_origin: EngineOrigin::SelfHosted,
            });
        }

        if looks_like_path(identifier) {
            let path = PathBuf::from(identifier);
            if path.is_file() {
                return self.classify_file(path);
            }
            return Err(WorkflowError::NotFound(identifier.to_string()));
        }

        if identifier.bytes().all(|b| b.is_ascii_digit()) {
            return Ok(BackendTarget::RemoteWorkflow {
                job_id: identifier.to_string(),
                engine_origin: EngineOrigin::RunningHub,
            });
        }

        for dir in self.search_dirs() {
            for candidate in candidate_names(identifier, prefix) {
                let path = dir.join(&candidate);
                if path.is_file() {
                    tracing::debug!(workflow = %path.display(), "Resolved workflow file");
                    return self.classify_file(path);
                }
            }
        }

        Err(WorkflowError::NotFound(identifier.to_string()))
    }

    /// File names of every workflow with the given prefix, sorted and deduplicated
    pub fn list(&self, prefix: &str) -> Vec<String> {
        let mut names = BTreeSet::new();

        for dir in self.search_dirs() {
            let Ok(entries) = std::fs::read_dir(&dir) else {
                continue;
            };
            for entry in entries.flatten() {
                let path = entry.path();
                let is_json = path.extension().and_then(|ext| ext.to_str()) == Some("json");
                let Some(name) = path.file_name().and_then(|name| name.to_str()) else {
                    continue;
                };
                if is_json && name.starts_with(prefix) && path.is_file() {
                    names.insert(name.to_string());
                }
            }
        }

        names.into_iter().collect()
    }

    fn search_dirs(&self) -> Vec<PathBuf> {
        std::iter::once(self.workflows_dir.clone())
            .chain(ENGINE_SUBDIRS.iter().map(|sub| self.workflows_dir.join(sub)))
            .collect()
    }

    /// A file is either a ComfyUI workflow or a RunningHub descriptor
    /// (`{"source": "runninghub", "workflow_id": ...}`)
    fn classify_file(&self, path: PathBuf) -> Result<BackendTarget, WorkflowError> {
        let contents = std::fs::read_to_string(&path)?;

        if let Ok(document) = serde_json::from_str::<Value>(&contents) {
            let is_runninghub = document.get("source").and_then(Value::as_str) == Some("runninghub");
            let workflow_id = match document.get("workflow_id") {
                Some(Value::String(id)) => Some(id.clone()),
                Some(Value::Number(id)) => Some(id.to_string()),
                _ => None,
            };

            if let (true, Some(job_id)) = (is_runninghub, workflow_id) {
                return Ok(BackendTarget::RemoteWorkflow {
                    job_id,
                    engine_origin: EngineOrigin::RunningHub,
                });
            }
        }

        Ok(BackendTarget::LocalWorkflow { file_path: path })
    }
}

fn looks_like_path(identifier: &str) -> bool {
    Path::new(identifier).is_absolute()
        || identifier.contains('/')
        || identifier.contains(std::path::MAIN_SEPARATOR)
}

fn candidate_names(name: &str, prefix: &str) -> Vec<String> {
    let mut candidates = vec![name.to_string()];
    if !name.ends_with(".json") {
        candidates.push(format!("{}.json", name));
    }
    if !prefix.is_empty() && !name.starts_with(prefix) {
        candidates.push(format!("{}{}", prefix, name));
        if !name.ends_with(".json") {
            candidates.push(format!("{}{}.json", prefix, name));
        }
    }
    candidates
}
