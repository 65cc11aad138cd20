use anyhow::Result;
use axum::Router;
use reelforge_backend::controllers::{
    i18n::I18nController, image::ImageController, llm::LlmController, tts::TtsController,
};
use reelforge_backend::domain::{
    i18n::Localizer,
    image::{self, ImageService},
    llm::LlmService,
    tts::{self, TtsService},
    workflow::{ArtifactFetcher, WorkflowDispatcher, WorkflowResolver},
};
use reelforge_backend::infrastructure::config::{
    Config, Environment, ImageConfig, LlmConfig, LogFormat, TtsConfig, WorkflowsConfig,
};
use reelforge_backend::infrastructure::engines::EngineConnection;
use reelforge_backend::infrastructure::http::build_router;
use reelforge_backend::infrastructure::llm::ModelDiscoveryClient;
use reelforge_backend::infrastructure::workflows::WorkflowLocator;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use test_context::AsyncTestContext;
use tokio::net::TcpListener;

pub mod api_client;

use api_client::TestClient;
use fakes::{FakeEngine, FakeSynthesizer};

pub struct TestContext {
    pub client: TestClient,
    pub config: Config,
    pub engine: Arc<FakeEngine>,
    pub synthesizer: Arc<FakeSynthesizer>,
    pub provider_url: String,
    pub scratch: TempDir,
}

impl TestContext {
    pub fn temp_dir(&self) -> &Path {
        &self.config.temp_dir
    }

    pub fn output_path(&self, name: &str) -> PathBuf {
        self.scratch.path().join("output").join(name)
    }
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async {
            let scratch = tempfile::tempdir().expect("Failed to create scratch dir");
            write_workflows(&scratch.path().join("workflows"))
                .expect("Failed to write workflow fixtures");

            let provider_url = mock_provider::start().await;

            let config = Config {
                project_name: "ReelForge".to_string(),
                host: "127.0.0.1".to_string(),
                port: 0, // Will be assigned by the OS
                environment: Environment::Development,
                log_format: LogFormat::Pretty,
                llm: LlmConfig {
                    api_key: mock_provider::PROVIDER_API_KEY.to_string(),
                    base_url: provider_url.clone(),
                    model: "qwen-max".to_string(),
                    timeout_secs: 5,
                },
                tts: TtsConfig {
                    default_workflow: "edge".to_string(),
                    edge_tts_binary: "edge-tts".to_string(),
                },
                image: ImageConfig {
                    default_workflow: Some("flux".to_string()),
                    comfyui_url: "http://127.0.0.1:8188".to_string(),
                    runninghub_api_key: String::new(),
                    prompt_prefix: "Pure white background".to_string(),
                },
                workflows: WorkflowsConfig {
                    dir: scratch.path().join("workflows"),
                    runninghub_url: "http://127.0.0.1:9".to_string(),
                    engine_timeout_secs: 5,
                },
                temp_dir: scratch.path().join("temp"),
                locales_dir: Path::new(env!("CARGO_MANIFEST_DIR")).join("locales"),
                default_language: "zh_CN".to_string(),
            };

            let engine = Arc::new(FakeEngine::new());
            let synthesizer = Arc::new(FakeSynthesizer::new());

            let app = create_app_with_fakes(config.clone(), engine.clone(), synthesizer.clone());

            // Start server
            let listener = TcpListener::bind("127.0.0.1:0")
                .await
                .expect("Failed to bind listener");
            let addr = listener.local_addr().expect("Failed to get local addr");
            let base_url = format!("http://{}", addr);

            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            let client = TestClient::new(&base_url);

            Self {
                client,
                config,
                engine,
                synthesizer,
                provider_url,
                scratch,
            }
        }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {
            // Scratch directory is removed when the TempDir drops
        }
    }
}

fn write_workflows(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir.join("runninghub"))?;

    let tts_workflow = json!({
        "3": {"class_type": "IndexTTS", "_meta": {"title": "$text.text!"}, "inputs": {"text": ""}},
        "4": {"class_type": "SaveAudio", "_meta": {"title": "Save"}, "inputs": {"filename_prefix": "tts"}}
    });
    std::fs::write(
        dir.join("tts_narrator.json"),
        serde_json::to_vec_pretty(&tts_workflow)?,
    )?;

    let image_workflow = json!({
        "6": {"class_type": "CLIPTextEncode", "_meta": {"title": "$prompt.text!"}, "inputs": {"text": ""}},
        "9": {"class_type": "SaveImage", "_meta": {"title": "Save"}, "inputs": {"filename_prefix": "img"}}
    });
    std::fs::write(
        dir.join("image_flux.json"),
        serde_json::to_vec_pretty(&image_workflow)?,
    )?;

    std::fs::write(
        dir.join("runninghub").join("tts_cloud.json"),
        serde_json::to_vec(&json!({"source": "runninghub", "workflow_id": "1983513964837543938"}))?,
    )?;

    Ok(())
}

fn create_app_with_fakes(
    config: Config,
    engine: Arc<FakeEngine>,
    synthesizer: Arc<FakeSynthesizer>,
) -> Router {
    let config = Arc::new(config);
    let http_client = reqwest::Client::new();

    let locator = Arc::new(WorkflowLocator::new(config.workflows.dir.clone()));
    let fetcher = ArtifactFetcher::new(http_client.clone());
    let connection = EngineConnection::new(
        config.image.comfyui_url.clone(),
        config.image.runninghub_api_key.clone(),
    );

    // Instantiate services
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

    // Each context gets its own registry so language switches don't leak
    let localizer = Arc::new(Localizer::load_dir(
        &config.locales_dir,
        config.default_language.clone(),
    ));

    // Instantiate controllers
    let tts_controller = Arc::new(TtsController::new(tts_service));
    let image_controller = Arc::new(ImageController::new(image_service));
    let llm_controller = Arc::new(LlmController::new(llm_service));
    let i18n_controller = Arc::new(I18nController::new(localizer));

    build_router(
        config,
        tts_controller,
        image_controller,
        llm_controller,
        i18n_controller,
    )
}
