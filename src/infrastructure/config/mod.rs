use serde::Deserialize;
use std::env;
use std::path::PathBuf;

const DEFAULT_PROMPT_PREFIX: &str = "Pure white background, minimalist illustration, matchstick figure style, black and white line drawing, simple clean lines";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub project_name: String,
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    pub llm: LlmConfig,
    pub tts: TtsConfig,
    pub image: ImageConfig,
    pub workflows: WorkflowsConfig,
    // Generated artifacts without an explicit output path land here
    pub temp_dir: PathBuf,
    // Localization
    pub locales_dir: PathBuf,
    pub default_language: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    pub default_workflow: String,
    pub edge_tts_binary: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageConfig {
    /// Required for image generation, there is no built-in fallback
    pub default_workflow: Option<String>,
    pub comfyui_url: String,
    pub runninghub_api_key: String,
    pub prompt_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowsConfig {
    pub dir: PathBuf,
    pub runninghub_url: String,
    /// How long the engine client waits for a queued job before giving up
    pub engine_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LlmConfig {
    /// All three connection fields are present after trimming
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
            && !self.base_url.trim().is_empty()
            && !self.model.trim().is_empty()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Missing keys fall back to defaults; malformed numbers are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Box<dyn std::error::Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let config = Config {
            project_name: var("PROJECT_NAME", "ReelForge"),
            host: var("HOST", "0.0.0.0"),
            port: var("PORT", "8080").parse()?,
            environment: match var("ENVIRONMENT", "development").as_str() {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match var("LOG_FORMAT", "pretty").as_str() {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            llm: LlmConfig {
                api_key: var("LLM_API_KEY", ""),
                base_url: var("LLM_BASE_URL", ""),
                model: var("LLM_MODEL", ""),
                timeout_secs: var("LLM_TIMEOUT_SECS", "10").parse()?,
            },
            tts: TtsConfig {
                default_workflow: var("TTS_DEFAULT_WORKFLOW", "edge"),
                edge_tts_binary: var("EDGE_TTS_BINARY", "edge-tts"),
            },
            image: ImageConfig {
                default_workflow: lookup("IMAGE_DEFAULT_WORKFLOW").filter(|s| !s.trim().is_empty()),
                comfyui_url: var("COMFYUI_URL", "http://127.0.0.1:8188"),
                runninghub_api_key: var("RUNNINGHUB_API_KEY", ""),
                prompt_prefix: var("IMAGE_PROMPT_PREFIX", DEFAULT_PROMPT_PREFIX),
            },
            workflows: WorkflowsConfig {
                dir: PathBuf::from(var("WORKFLOWS_DIR", "workflows")),
                runninghub_url: var("RUNNINGHUB_URL", "https://www.runninghub.cn"),
                engine_timeout_secs: var("ENGINE_TIMEOUT_SECS", "600").parse()?,
            },
            temp_dir: lookup("TEMP_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| env::temp_dir().join("reelforge")),
            locales_dir: PathBuf::from(var("LOCALES_DIR", "locales")),
            default_language: var("DEFAULT_LANGUAGE", "zh_CN"),
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn is_llm_configured(&self) -> bool {
        self.llm.is_configured()
    }

    /// Validate required configuration
    pub fn validate_required(&self) -> bool {
        self.is_llm_configured()
    }
}
