use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::infrastructure::config::Config;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub async fn health_ready(State(config): State<Arc<Config>>) -> impl IntoResponse {
    let status = if config.validate_required() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(json!({
            "status": if status == StatusCode::OK { "ready" } else { "not_ready" },
            "llm_configured": config.is_llm_configured(),
            "tts_default_workflow": config.tts.default_workflow,
            "image_default_workflow": config.image.default_workflow,
        })),
    )
}
