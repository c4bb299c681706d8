use crate::completion::{DEFAULT_COMPLETION_BASE_URL, DEFAULT_MODEL};
use crate::ocr::DEFAULT_VISION_BASE_URL;
use ::config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Process-wide configuration, resolved once at startup and passed explicitly
/// into the collaborators. Pipeline code never reads the environment ad hoc,
/// which keeps it testable with injected fakes.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
    #[serde(default)]
    pub recommendation: RecommendationConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Completion-service settings.
#[derive(Debug, Deserialize, Clone)]
pub struct CompletionConfig {
    /// Bearer token; falls back to the GROQ_API_KEY environment variable.
    pub api_key: Option<String>,
    #[serde(default = "default_completion_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        CompletionConfig {
            api_key: None,
            base_url: default_completion_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl CompletionConfig {
    /// Config first, then the conventional environment variable.
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("GROQ_API_KEY").ok())
            .ok_or_else(|| {
                ConfigError::Message("GROQ_API_KEY not found in config or environment".to_string())
            })
    }
}

/// OCR-engine settings.
#[derive(Debug, Deserialize, Clone)]
pub struct OcrConfig {
    /// Vision API key; falls back to the GOOGLE_API_KEY environment variable.
    pub api_key: Option<String>,
    #[serde(default = "default_vision_base_url")]
    pub base_url: String,
    /// Single recognition locale, passed to the engine as a language hint.
    #[serde(default = "default_locale")]
    pub locale: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        OcrConfig {
            api_key: None,
            base_url: default_vision_base_url(),
            locale: default_locale(),
        }
    }
}

impl OcrConfig {
    pub fn resolve_api_key(&self) -> Result<String, ConfigError> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("GOOGLE_API_KEY").ok())
            .ok_or_else(|| {
                ConfigError::Message("GOOGLE_API_KEY not found in config or environment".to_string())
            })
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct RecommendationConfig {
    /// How many recipes the recommendation prompt asks for.
    #[serde(default = "default_recipe_count")]
    pub recipe_count: u32,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        RecommendationConfig {
            recipe_count: default_recipe_count(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind: default_bind(),
        }
    }
}

// Default value functions
fn default_completion_base_url() -> String {
    DEFAULT_COMPLETION_BASE_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2000
}

fn default_vision_base_url() -> String {
    DEFAULT_VISION_BASE_URL.to_string()
}

fn default_locale() -> String {
    "ko".to_string()
}

fn default_recipe_count() -> u32 {
    10
}

fn default_bind() -> String {
    "0.0.0.0:8000".to_string()
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with PANTRY__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: PANTRY__COMPLETION__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Optional config file (can be missing)
            .add_source(File::with_name("config").required(false))
            // Use double underscore for nested: PANTRY__COMPLETION__API_KEY
            .add_source(
                Environment::with_prefix("PANTRY")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}
