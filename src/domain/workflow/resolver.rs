use super::error::WorkflowError;
use super::target::BackendTarget;
use crate::infrastructure::workflows::WorkflowLocator;
use std::sync::Arc;

/// Decides where a generation request runs.
///
/// Built-in provider names win over everything else, including a workflow
/// file with the same name; anything else goes through the locator.
#[derive(Clone)]
pub struct WorkflowResolver {
    locator: Arc<WorkflowLocator>,
    prefix: &'static str,
    builtins: &'static [&'static str],
}

impl WorkflowResolver {
    pub fn new(
        locator: Arc<WorkflowLocator>,
        prefix: &'static str,
        builtins: &'static [&'static str],
    ) -> Self {
        Self {
            locator,
            prefix,
            builtins,
        }
    }

    pub fn resolve(
        &self,
        identifier: Option<&str>,
        default_identifier: &str,
    ) -> Result<BackendTarget, WorkflowError> {
        let identifier = identifier.unwrap_or(default_identifier);

        // Exact, case-sensitive match only
        if self.builtins.contains(&identifier) {
            tracing::debug!(provider = %identifier, "Using built-in provider");
            return Ok(BackendTarget::BuiltinProvider {
                name: identifier.to_string(),
            });
        }

        self.locator.locate(identifier, self.prefix)
    }

    pub fn builtins(&self) -> &'static [&'static str] {
        self.builtins
    }

    pub fn list_workflows(&self) -> Vec<String> {
        self.locator.list(self.prefix)
    }
}
