use super::{binding, EngineError, EngineResult, WorkflowParams};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Every RunningHub OpenAPI response is wrapped in this envelope
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    code: i64,
    #[serde(default)]
    msg: String,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct WorkflowJson {
    /// The API-format workflow, serialized as a string
    prompt: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatedTask {
    task_id: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskOutput {
    file_url: String,
    #[serde(default)]
    file_type: Option<String>,
    #[serde(default)]
    node_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NodeInfo {
    node_id: String,
    field_name: String,
    field_value: Value,
}

/// Client for RunningHub hosted workflows
#[derive(Clone)]
pub struct RunningHubClient {
    http_client: reqwest::Client,
    base_url: String,
    poll_interval: Duration,
    timeout: Duration,
}

impl RunningHubClient {
    pub fn new(http_client: reqwest::Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            poll_interval: POLL_INTERVAL,
            timeout,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Run hosted workflow `workflow_id`, mapping `params` onto its bound nodes.
    ///
    /// Jobs rejected by RunningHub come back as a failed result.
    pub async fn run(
        &self,
        api_key: &str,
        workflow_id: &str,
        params: &WorkflowParams,
    ) -> Result<EngineResult, EngineError> {
        match self.submit_and_wait(api_key, workflow_id, params).await {
            Err(EngineError::Rejected(msg)) => {
                tracing::warn!(workflow_id = %workflow_id, error = %msg, "RunningHub rejected job");
                Ok(EngineResult::failed(msg))
            }
            other => other,
        }
    }

    async fn submit_and_wait(
        &self,
        api_key: &str,
        workflow_id: &str,
        params: &WorkflowParams,
    ) -> Result<EngineResult, EngineError> {
        let workflow = self.fetch_workflow(api_key, workflow_id).await?;
        let node_info_list: Vec<NodeInfo> = binding::resolve(&workflow, params)?
            .into_iter()
            .map(|(binding, value)| NodeInfo {
                node_id: binding.node_id,
                field_name: binding.field,
                field_value: value.clone(),
            })
            .collect();

        tracing::info!(
            workflow_id = %workflow_id,
            bound_params = node_info_list.len(),
            "Creating RunningHub task"
        );

        let created: CreatedTask = self
            .call(
                "/task/openapi/create",
                json!({
                    "apiKey": api_key,
                    "workflowId": workflow_id,
                    "nodeInfoList": node_info_list,
                }),
            )
            .await?;
        let task_id = match created.task_id {
            Value::String(id) => id,
            other => other.to_string(),
        };

        let started = Instant::now();
        loop {
            let status: String = self
                .call(
                    "/task/openapi/status",
                    json!({ "apiKey": api_key, "taskId": task_id }),
                )
                .await?;

            match status.as_str() {
                "SUCCESS" => break,
                "FAILED" => {
                    let mut result = EngineResult::failed("RunningHub task failed");
                    result.job_id = Some(task_id);
                    return Ok(result);
                }
                _ => {}
            }

            if started.elapsed() >= self.timeout {
                let mut result = EngineResult::failed(format!(
                    "Task did not finish within {}s",
                    self.timeout.as_secs()
                ));
                result.job_id = Some(task_id);
                return Ok(result);
            }

            tracing::debug!(task_id = %task_id, status = %status, "RunningHub task pending");
            tokio::time::sleep(self.poll_interval).await;
        }

        let outputs: Vec<TaskOutput> = self
            .call(
                "/task/openapi/outputs",
                json!({ "apiKey": api_key, "taskId": task_id }),
            )
            .await?;

        let mut result = EngineResult::completed();
        result.job_id = Some(task_id);

        let mut first_by_node = Map::new();
        for output in outputs {
            let name = match &output.file_type {
                Some(file_type) => format!("output.{}", file_type),
                None => output
                    .file_url
                    .split(['?', '#'])
                    .next()
                    .unwrap_or_default()
                    .to_string(),
            };
            if let Some(node_id) = &output.node_id {
                if !first_by_node.contains_key(node_id) {
                    first_by_node.insert(node_id.clone(), Value::String(output.file_url.clone()));
                }
            }
            result.push_file(&name, output.file_url);
        }
        if !first_by_node.is_empty() {
            result.outputs = Some(first_by_node);
        }

        Ok(result)
    }

    async fn fetch_workflow(&self, api_key: &str, workflow_id: &str) -> Result<Value, EngineError> {
        let workflow: WorkflowJson = self
            .call(
                "/api/openapi/getJsonApiFormat",
                json!({ "apiKey": api_key, "workflowId": workflow_id }),
            )
            .await?;

        serde_json::from_str(&workflow.prompt).map_err(|e| {
            EngineError::InvalidWorkflow(format!("workflow {} is not valid JSON: {}", workflow_id, e))
        })
    }

    async fn call<T: DeserializeOwned>(&self, path: &str, body: Value) -> Result<T, EngineError> {
        let envelope: Envelope<T> = self
            .http_client
            .post(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if envelope.code != 0 {
            return Err(EngineError::Rejected(if envelope.msg.is_empty() {
                format!("RunningHub error code {}", envelope.code)
            } else {
                envelope.msg
            }));
        }

        envelope
            .data
            .ok_or_else(|| EngineError::Protocol(format!("{} returned no data", path)))
    }
}
