use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use reelforge_backend::controllers::{
    i18n::I18nController, image::ImageController, llm::LlmController, tts::TtsController,
};
use reelforge_backend::domain::{
    i18n::{self, Localizer},
    image::{self, ImageService},
    llm::LlmService,
    tts::{self, TtsService},
    workflow::{ArtifactFetcher, WorkflowDispatcher, WorkflowResolver},
};
use reelforge_backend::infrastructure::config::{Config, LogFormat};
use reelforge_backend::infrastructure::engines::{EngineConnection, WorkflowRunner};
use reelforge_backend::infrastructure::http::{build_router, start_http_server};
use reelforge_backend::infrastructure::llm::ModelDiscoveryClient;
use reelforge_backend::infrastructure::synthesizers::edge_tts::EdgeTtsSynthesizer;
use reelforge_backend::infrastructure::workflows::WorkflowLocator;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting {} on {}:{}",
        config.project_name,
        config.host,
        config.port
    );

    if !config.validate_required() {
        tracing::warn!("LLM is not configured. Set LLM_API_KEY, LLM_BASE_URL and LLM_MODEL");
    }
    if config.image.default_workflow.is_none() {
        tracing::warn!("No default image workflow configured (IMAGE_DEFAULT_WORKFLOW)");
    }

    tokio::fs::create_dir_all(&config.temp_dir).await?;
    tracing::info!(temp_dir = %config.temp_dir.display(), "Temp directory ready");

    // Localization registry is process-wide
    let localizer = i18n::init(Localizer::load_dir(
        &config.locales_dir,
        config.default_language.clone(),
    ));

    let config = Arc::new(config);
    let http_client = reqwest::Client::new();

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate infrastructure clients
    tracing::info!("Instantiating engine clients...");
    let locator = Arc::new(WorkflowLocator::new(config.workflows.dir.clone()));
    let engine = Arc::new(WorkflowRunner::new(http_client.clone(), &config.workflows));
    let fetcher = ArtifactFetcher::new(http_client.clone());
    let connection = EngineConnection::new(
        config.image.comfyui_url.clone(),
        config.image.runninghub_api_key.clone(),
    );
    let synthesizer = Arc::new(EdgeTtsSynthesizer::new(config.tts.edge_tts_binary.clone()));

    // 2. Instantiate services
    tracing::info!("Instantiating services...");
    let tts_service = Arc::new(TtsService::new(
        WorkflowResolver::new(
            locator.clone(),
            tts::service::WORKFLOW_PREFIX,
            tts::BUILTIN_PROVIDERS,
        ),
        WorkflowDispatcher::new(engine.clone(), fetcher.clone(), connection.clone()),
        synthesizer,
        config.tts.default_workflow.clone(),
        config.temp_dir.clone(),
    ));
    let image_service = Arc::new(ImageService::new(
        WorkflowResolver::new(locator, image::service::WORKFLOW_PREFIX, &[]),
        WorkflowDispatcher::new(engine, fetcher, connection),
        config.image.default_workflow.clone(),
        config.image.prompt_prefix.clone(),
    ));
    let llm_service = Arc::new(LlmService::new(
        config.llm.clone(),
        ModelDiscoveryClient::new(http_client),
    ));

    // 3. Instantiate controllers
    tracing::info!("Instantiating controllers...");
    let tts_controller = Arc::new(TtsController::new(tts_service));
    let image_controller = Arc::new(ImageController::new(image_service));
    let llm_controller = Arc::new(LlmController::new(llm_service));
    let i18n_controller = Arc::new(I18nController::new(localizer));

    let app = build_router(
        config.clone(),
        tts_controller,
        image_controller,
        llm_controller,
        i18n_controller,
    );

    start_http_server(config, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "reelforge_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "reelforge_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
