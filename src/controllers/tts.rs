use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{
    domain::tts::{
        SynthesisRequest, SynthesisResponse, TtsService, TtsServiceApi, WorkflowListResponse,
    },
    error::AppResult,
};

pub struct TtsController {
    tts_service: Arc<TtsService>,
}

impl TtsController {
    pub fn new(tts_service: Arc<TtsService>) -> Self {
        Self { tts_service }
    }

    /// POST /api/tts/synthesize - Convert text to speech
    pub async fn synthesize(
        State(controller): State<Arc<TtsController>>,
        Json(request): Json<SynthesisRequest>,
    ) -> AppResult<Json<SynthesisResponse>> {
        let audio_path = controller.tts_service.synthesize(request).await?;
        Ok(Json(SynthesisResponse { audio_path }))
    }

    /// GET /api/tts/workflows - Built-in providers and TTS workflow files
    pub async fn list_workflows(
        State(controller): State<Arc<TtsController>>,
    ) -> AppResult<Json<WorkflowListResponse>> {
        Ok(Json(WorkflowListResponse {
            builtins: controller.tts_service.builtins(),
            workflows: controller.tts_service.list_workflows(),
        }))
    }
}
