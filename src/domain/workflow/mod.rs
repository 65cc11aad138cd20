pub mod artifact;
pub mod dispatcher;
pub mod error;
pub mod resolver;
pub mod target;

pub use artifact::{locate_artifact, ArtifactFetcher, ArtifactKind};
pub use dispatcher::{ConnectionOverrides, WorkflowDispatcher};
pub use error::WorkflowError;
pub use resolver::WorkflowResolver;
pub use target::{BackendTarget, EngineOrigin};
