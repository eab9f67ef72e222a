//! Configuration loading for RepurposeAI.
//! Reads repurpose.toml from the current directory or path in REPURPOSE_CONFIG env var.

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String { "127.0.0.1:8000".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Which backend serves completions: "gemini" or "ollama".
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub ollama: OllamaConfig,
}

fn default_provider() -> String { "gemini".to_string() }

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            gemini: GeminiConfig::default(),
            ollama: OllamaConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default = "default_gemini_model")]
    pub model: String,
    #[serde(default = "default_gemini_base_url")]
    pub base_url: String,
    /// Empty means unset; the GEMINI_API_KEY env var is used instead.
    #[serde(default)]
    pub api_key: String,
}

fn default_gemini_model()    -> String { "gemini-flash-latest".to_string() }
fn default_gemini_base_url() -> String { "https://generativelanguage.googleapis.com/v1beta".to_string() }

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: default_gemini_model(),
            base_url: default_gemini_base_url(),
            api_key: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    #[serde(default = "default_ollama_base_url")]
    pub base_url: String,
    #[serde(default = "default_ollama_model")]
    pub model: String,
}

fn default_ollama_base_url() -> String { "http://localhost:11434".to_string() }
fn default_ollama_model()    -> String { "llama3:8b".to_string() }

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: default_ollama_base_url(),
            model: default_ollama_model(),
        }
    }
}


impl Config {
    /// Load configuration from repurpose.toml.
    /// Checks REPURPOSE_CONFIG env var first, then current directory.
    /// A missing file is not an error; every setting has a default.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("REPURPOSE_CONFIG")
            .unwrap_or_else(|_| "repurpose.toml".to_string());

        if !Path::new(&path).exists() {
            tracing::warn!(
                "Config file not found: {path}. Using defaults; copy \
                 repurpose.example.toml to repurpose.toml to customize."
            );
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
