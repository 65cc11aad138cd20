use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{
    domain::llm::{
        CompletionRequest, CompletionResponse, LlmService, LlmServiceApi, ModelListResponse,
        ProviderOverrides,
    },
    error::AppResult,
    infrastructure::llm::ConnectionProbeResult,
};

pub struct LlmController {
    llm_service: Arc<LlmService>,
}

impl LlmController {
    pub fn new(llm_service: Arc<LlmService>) -> Self {
        Self { llm_service }
    }

    /// POST /api/llm/complete
    pub async fn complete(
        State(controller): State<Arc<LlmController>>,
        Json(request): Json<CompletionRequest>,
    ) -> AppResult<Json<CompletionResponse>> {
        let content = controller.llm_service.complete(request).await?;
        Ok(Json(CompletionResponse { content }))
    }

    /// POST /api/llm/models - List models, optionally with other credentials
    pub async fn list_models(
        State(controller): State<Arc<LlmController>>,
        Json(overrides): Json<ProviderOverrides>,
    ) -> AppResult<Json<ModelListResponse>> {
        let models = controller.llm_service.list_models(overrides).await?;
        Ok(Json(ModelListResponse { models }))
    }

    /// POST /api/llm/test - Connectivity probe. Failures are reported in the body.
    pub async fn test_connection(
        State(controller): State<Arc<LlmController>>,
        Json(overrides): Json<ProviderOverrides>,
    ) -> AppResult<Json<ConnectionProbeResult>> {
        let result = controller.llm_service.test_connection(overrides).await?;
        Ok(Json(result))
    }
}
