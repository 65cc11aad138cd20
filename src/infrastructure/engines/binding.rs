//! Parameter binding for ComfyUI API-format workflows.
//!
//! A node opts into receiving a parameter through its title: `$name` binds
//! `params["name"]` to `inputs["name"]`, `$name.field` binds it to
//! `inputs["field"]`. A trailing `!` marks the parameter as required.

use super::{EngineError, WorkflowParams};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub node_id: String,
    pub param: String,
    pub field: String,
    pub required: bool,
}

impl Binding {
    fn parse(node_id: &str, title: &str) -> Option<Self> {
        let expr = title.trim().strip_prefix('$')?;
        let (expr, required) = match expr.strip_suffix('!') {
            Some(stripped) => (stripped, true),
            None => (expr, false),
        };

        let (param, field) = match expr.split_once('.') {
            Some((param, field)) => (param, field),
            None => (expr, expr),
        };

        if param.is_empty() || field.is_empty() {
            return None;
        }

        Some(Self {
            node_id: node_id.to_string(),
            param: param.to_string(),
            field: field.to_string(),
            required,
        })
    }
}

/// Collect every binding declared in `workflow`, in document order
pub fn bindings(workflow: &Value) -> Vec<Binding> {
    let Some(nodes) = workflow.as_object() else {
        return Vec::new();
    };

    nodes
        .iter()
        .filter_map(|(node_id, node)| {
            let title = node.pointer("/_meta/title")?.as_str()?;
            Binding::parse(node_id, title)
        })
        .collect()
}

/// Resolve bindings against `params`, failing on a missing required one.
///
/// Returns `(binding, value)` pairs for the parameters that were supplied.
pub fn resolve<'a>(
    workflow: &Value,
    params: &'a WorkflowParams,
) -> Result<Vec<(Binding, &'a Value)>, EngineError> {
    let mut resolved = Vec::new();

    for binding in bindings(workflow) {
        match params.get(&binding.param) {
            Some(value) => resolved.push((binding, value)),
            None if binding.required => {
                return Err(EngineError::InvalidWorkflow(format!(
                    "missing required parameter '{}' for node {}",
                    binding.param, binding.node_id
                )));
            }
            None => {}
        }
    }

    Ok(resolved)
}

/// Write bound parameters into the workflow's node inputs
pub fn apply(workflow: &mut Value, params: &WorkflowParams) -> Result<usize, EngineError> {
    let resolved: Vec<(Binding, Value)> = resolve(workflow, params)?
        .into_iter()
        .map(|(binding, value)| (binding, value.clone()))
        .collect();

    let count = resolved.len();
    for (binding, value) in resolved {
        let node = workflow
            .get_mut(&binding.node_id)
            .and_then(Value::as_object_mut)
            .ok_or_else(|| {
                EngineError::InvalidWorkflow(format!("node {} is not an object", binding.node_id))
            })?;

        let inputs = node
            .entry("inputs")
            .or_insert_with(|| Value::Object(Default::default()));

        match inputs.as_object_mut() {
            Some(inputs) => {
                inputs.insert(binding.field.clone(), value);
            }
            None => {
                return Err(EngineError::InvalidWorkflow(format!(
                    "node {} has malformed inputs",
                    binding.node_id
                )))
            }
        }

        tracing::debug!(
            node_id = %binding.node_id,
            param = %binding.param,
            field = %binding.field,
            "Bound workflow parameter"
        );
    }

    Ok(count)
}
