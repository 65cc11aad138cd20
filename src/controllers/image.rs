use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{
    domain::image::{ImageRequest, ImageResponse, ImageService, ImageServiceApi},
    domain::tts::WorkflowListResponse,
    error::AppResult,
};

pub struct ImageController {
    image_service: Arc<ImageService>,
}

impl ImageController {
    pub fn new(image_service: Arc<ImageService>) -> Self {
        Self { image_service }
    }

    /// POST /api/image/generate
    pub async fn generate(
        State(controller): State<Arc<ImageController>>,
        Json(request): Json<ImageRequest>,
    ) -> AppResult<Json<ImageResponse>> {
        let image_path = controller.image_service.generate(request).await?;
        Ok(Json(ImageResponse { image_path }))
    }

    /// GET /api/image/workflows
    pub async fn list_workflows(
        State(controller): State<Arc<ImageController>>,
    ) -> AppResult<Json<WorkflowListResponse>> {
        Ok(Json(WorkflowListResponse {
            builtins: Vec::new(),
            workflows: controller.image_service.list_workflows(),
        }))
    }
}
