use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("HTTP {0}")]
    Status(u16),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Outcome of a connectivity probe. Failures are data, not errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionProbeResult {
    pub success: bool,
    pub message: String,
    pub model_count: usize,
}

impl ConnectionProbeResult {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            model_count: 0,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}

/// The `/v1` API root of an OpenAI-compatible base URL, with or without the
/// version segment. Trailing slashes are ignored.
pub fn api_base(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if base.ends_with("/v1") {
        base.to_string()
    } else {
        format!("{}/v1", base)
    }
}

pub fn models_url(base_url: &str) -> String {
    format!("{}/models", api_base(base_url))
}

/// Lists models on an OpenAI-compatible endpoint
#[derive(Clone, Default)]
pub struct ModelDiscoveryClient {
    http_client: reqwest::Client,
}

impl ModelDiscoveryClient {
    pub fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    /// Model ids sorted lexicographically
    pub async fn fetch_models(
        &self,
        api_key: &str,
        base_url: &str,
        timeout: Duration,
    ) -> Result<Vec<String>, DiscoveryError> {
        let url = models_url(base_url);
        tracing::debug!(url = %url, "Fetching model list");

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(api_key)
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "Model list request rejected");
            return Err(DiscoveryError::Status(status.as_u16()));
        }

        let list: ModelList = response.json().await?;
        let mut models: Vec<String> = list.data.into_iter().map(|entry| entry.id).collect();
        models.sort();

        tracing::info!(url = %url, count = models.len(), "Fetched model list");
        Ok(models)
    }

    /// Probe the endpoint and describe the outcome in a user-facing message
    pub async fn test_connection(
        &self,
        api_key: &str,
        base_url: &str,
        timeout: Duration,
    ) -> ConnectionProbeResult {
        match self.fetch_models(api_key, base_url, timeout).await {
            Ok(models) => ConnectionProbeResult {
                success: true,
                message: format!("Connection successful! {} models available.", models.len()),
                model_count: models.len(),
            },
            Err(e) => {
                let message = probe_message(&e);
                tracing::warn!(base_url = %base_url, error = %e, "LLM connection test failed");
                ConnectionProbeResult::failure(message)
            }
        }
    }
}

fn probe_message(err: &DiscoveryError) -> String {
    match err {
        DiscoveryError::Status(401) => "Authentication failed: Invalid API Key".to_string(),
        DiscoveryError::Status(403) => {
            "Access forbidden: Check your API Key permissions".to_string()
        }
        DiscoveryError::Status(404) => "API endpoint not found: Check your Base URL".to_string(),
        DiscoveryError::Status(code) => format!("API error: HTTP {}", code),
        // A connect timeout is both; it reads as a timeout
        DiscoveryError::Http(e) if e.is_timeout() => {
            "Connection timeout: Server did not respond in time".to_string()
        }
        DiscoveryError::Http(e) if e.is_connect() => {
            "Connection failed: Cannot reach the server".to_string()
        }
        DiscoveryError::Http(e) => format!("Error: {}", e),
    }
}
