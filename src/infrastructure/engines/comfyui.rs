use super::{binding, EngineError, EngineResult, WorkflowParams};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::time::{Duration, Instant};
use uuid::Uuid;

const POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Deserialize)]
struct QueuePromptResponse {
    prompt_id: String,
    #[serde(default)]
    node_errors: Map<String, Value>,
}

/// Client for a self-hosted ComfyUI server
#[derive(Clone)]
pub struct ComfyUiClient {
    http_client: reqwest::Client,
    poll_interval: Duration,
    timeout: Duration,
}

impl ComfyUiClient {
    pub fn new(http_client: reqwest::Client, timeout: Duration) -> Self {
        Self {
            http_client,
            poll_interval: POLL_INTERVAL,
            timeout,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Fetch a workflow document published at `url`
    pub async fn fetch_workflow(&self, url: &str) -> Result<Value, EngineError> {
        tracing::debug!(url = %url, "Fetching workflow document");

        let workflow = self
            .http_client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        Ok(workflow)
    }

    /// Bind `params`, queue the workflow and wait for its history entry
    pub async fn run(
        &self,
        base_url: &str,
        mut workflow: Value,
        params: &WorkflowParams,
    ) -> Result<EngineResult, EngineError> {
        let base_url = base_url.trim_end_matches('/');
        let bound = binding::apply(&mut workflow, params)?;

        let client_id = Uuid::new_v4().to_string();
        tracing::info!(
            comfyui_url = %base_url,
            bound_params = bound,
            "Queueing ComfyUI workflow"
        );

        let response = self
            .http_client
            .post(format!("{}/prompt", base_url))
            .json(&json!({ "prompt": workflow, "client_id": client_id }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status.as_u16(), "ComfyUI rejected workflow");
            return Ok(EngineResult::failed(format!(
                "ComfyUI rejected workflow (HTTP {}): {}",
                status.as_u16(),
                describe_rejection(&body)
            )));
        }

        let queued: QueuePromptResponse = response.json().await?;
        if !queued.node_errors.is_empty() {
            return Ok(EngineResult::failed(format!(
                "Workflow validation failed: {}",
                Value::Object(queued.node_errors)
            )));
        }

        self.wait_for_history(base_url, &queued.prompt_id).await
    }

    async fn wait_for_history(
        &self,
        base_url: &str,
        prompt_id: &str,
    ) -> Result<EngineResult, EngineError> {
        let started = Instant::now();
        let history_url = format!("{}/history/{}", base_url, prompt_id);

        loop {
            let history: Map<String, Value> = self
                .http_client
                .get(&history_url)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            if let Some(entry) = history.get(prompt_id) {
                tracing::info!(
                    prompt_id = %prompt_id,
                    elapsed_ms = started.elapsed().as_millis(),
                    "ComfyUI workflow finished"
                );
                return Ok(collect_result(base_url, prompt_id, entry));
            }

            if started.elapsed() >= self.timeout {
                tracing::warn!(prompt_id = %prompt_id, "ComfyUI workflow timed out");
                let mut result = EngineResult::failed(format!(
                    "Workflow did not finish within {}s",
                    self.timeout.as_secs()
                ));
                result.job_id = Some(prompt_id.to_string());
                return Ok(result);
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

/// Turn a `/history/{id}` entry into an engine result
fn collect_result(base_url: &str, prompt_id: &str, entry: &Value) -> EngineResult {
    let status = entry.pointer("/status/status_str").and_then(Value::as_str);

    if status == Some("error") {
        let mut result = EngineResult::failed(execution_error_message(entry));
        result.job_id = Some(prompt_id.to_string());
        return result;
    }

    let mut result = EngineResult::completed();
    result.job_id = Some(prompt_id.to_string());

    let Some(outputs) = entry.get("outputs").and_then(Value::as_object) else {
        return result;
    };

    let mut first_by_node = Map::new();
    for (node_id, node_output) in outputs {
        let Some(node_output) = node_output.as_object() else {
            continue;
        };

        for items in node_output.values().filter_map(Value::as_array) {
            for item in items {
                let Some(filename) = item.get("filename").and_then(Value::as_str) else {
                    continue;
                };
                let subfolder = item.get("subfolder").and_then(Value::as_str).unwrap_or("");
                let kind = item.get("type").and_then(Value::as_str).unwrap_or("output");

                let url = view_url(base_url, filename, subfolder, kind);
                if !first_by_node.contains_key(node_id) {
                    first_by_node.insert(node_id.clone(), Value::String(url.clone()));
                }
                result.push_file(filename, url);
            }
        }
    }

    if !first_by_node.is_empty() {
        result.outputs = Some(first_by_node);
    }

    result
}

fn view_url(base_url: &str, filename: &str, subfolder: &str, kind: &str) -> String {
    format!(
        "{}/view?filename={}&subfolder={}&type={}",
        base_url,
        urlencoding::encode(filename),
        urlencoding::encode(subfolder),
        urlencoding::encode(kind)
    )
}

fn execution_error_message(entry: &Value) -> String {
    entry
        .pointer("/status/messages")
        .and_then(Value::as_array)
        .and_then(|messages| {
            messages.iter().find_map(|message| {
                let pair = message.as_array()?;
                if pair.first()?.as_str()? != "execution_error" {
                    return None;
                }
                pair.get(1)?
                    .get("exception_message")?
                    .as_str()
                    .map(|msg| msg.trim().to_string())
            })
        })
        .unwrap_or_else(|| "Workflow execution failed".to_string())
}

fn describe_rejection(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}
