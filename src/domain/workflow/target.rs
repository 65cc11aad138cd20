use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Which remote workflow engine a job identifier belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineOrigin {
    /// A ComfyUI server; the job identifier is a workflow URL
    SelfHosted,
    /// RunningHub hosted job templates, identified by numeric workflow id
    RunningHub,
}

impl fmt::Display for EngineOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineOrigin::SelfHosted => write!(f, "selfhost"),
            EngineOrigin::RunningHub => write!(f, "runninghub"),
        }
    }
}

/// Where a generation request is executed, as decided by the resolver
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendTarget {
    BuiltinProvider {
        name: String,
    },
    LocalWorkflow {
        file_path: PathBuf,
    },
    RemoteWorkflow {
        job_id: String,
        engine_origin: EngineOrigin,
    },
}

impl fmt::Display for BackendTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendTarget::BuiltinProvider { name } => write!(f, "builtin:{}", name),
            BackendTarget::LocalWorkflow { file_path } => {
                write!(f, "selfhost:{}", file_path.display())
            }
            BackendTarget::RemoteWorkflow {
                job_id,
                engine_origin,
            } => write!(f, "{}:{}", engine_origin, job_id),
        }
    }
}
