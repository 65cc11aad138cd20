pub mod request_id;

pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::controllers::{
    health, i18n::I18nController, image::ImageController, llm::LlmController,
    tts::TtsController,
};
use crate::infrastructure::config::Config;

/// Build the application router with all routes configured
pub fn build_router(
    config: Arc<Config>,
    tts_controller: Arc<TtsController>,
    image_controller: Arc<ImageController>,
    llm_controller: Arc<LlmController>,
    i18n_controller: Arc<I18nController>,
) -> Router {
    let tts_routes = Router::new()
        .route("/api/tts/synthesize", post(TtsController::synthesize))
        .route("/api/tts/workflows", get(TtsController::list_workflows))
        .with_state(tts_controller);

    let image_routes = Router::new()
        .route("/api/image/generate", post(ImageController::generate))
        .route("/api/image/workflows", get(ImageController::list_workflows))
        .with_state(image_controller);

    let llm_routes = Router::new()
        .route("/api/llm/complete", post(LlmController::complete))
        .route("/api/llm/models", post(LlmController::list_models))
        .route("/api/llm/test", post(LlmController::test_connection))
        .with_state(llm_controller);

    let i18n_routes = Router::new()
        .route("/api/i18n/languages", get(I18nController::languages))
        .route("/api/i18n/language", put(I18nController::set_language))
        .route("/api/i18n/translate", get(I18nController::translate))
        .with_state(i18n_controller);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(config)
        .merge(tts_routes)
        .merge(image_routes)
        .merge(llm_routes)
        .merge(i18n_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Start the HTTP server
pub async fn start_http_server(
    config: Arc<Config>,
    app: Router,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
