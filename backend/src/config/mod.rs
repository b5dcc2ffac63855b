//! Configuration management for the AquaFit backend
//!
//! Configuration is loaded hierarchically:
//! 1. Default values (in code)
//! 2. TOML config files (config/development.toml or config/production.toml)
//! 3. Environment variables (prefix: AQUAFIT__)

use anyhow::Result;
use aquafit_shared::MAX_IMAGE_BYTES;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
}

/// Vision model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    pub enabled: bool,
    pub api_base: String,
    pub model: String,
    /// Only ever read from files or the environment
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    pub request_timeout_secs: u64,
    pub temperature: f32,
}

impl AiConfig {
    pub fn api_key(&self) -> Option<SecretString> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(|key| SecretString::new(key.to_string()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-1.5-flash".to_string(),
            api_key: None,
            request_timeout_secs: 60,
            temperature: 0.4,
        }
    }
}

/// Analysis workflow limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub max_attempts: u32,
    pub max_image_bytes: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            max_image_bytes: MAX_IMAGE_BYTES,
        }
    }
}

/// Upstream account endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub base_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                request_timeout_secs: 360,
            },
            ai: AiConfig::default(),
            analysis: AnalysisConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    ///
    /// Loading order (later sources override earlier):
    /// 1. Default values
    /// 2. Config file based on RUST_ENV (development.toml or production.toml)
    /// 3. Environment variables with AQUAFIT__ prefix
    pub fn load() -> Result<Self> {
        let env = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_file = format!("config/{}.toml", env);

        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            // Load from environment-specific config file
            .add_source(config::File::with_name(&config_file).required(false))
            // Override with environment variables (AQUAFIT__ prefix)
            // e.g., AQUAFIT__AI__MODEL=gemini-1.5-pro sets ai.model
            .add_source(config::Environment::with_prefix("AQUAFIT").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Check if running in production mode
    pub fn is_production() -> bool {
        env::var("RUST_ENV")
            .map(|v| v == "production")
            .unwrap_or(false)
    }

    /// Problems that make this configuration unusable
    pub fn problems(&self) -> Vec<&'static str> {
        let mut problems = Vec::new();
        if self.ai.enabled && self.ai.api_key().is_none() {
            problems.push("ai.api_key is required when ai.enabled is true");
        }
        if self.analysis.max_attempts == 0 {
            problems.push("analysis.max_attempts must be at least 1");
        }
        if self.analysis.max_image_bytes == 0 {
            problems.push("analysis.max_image_bytes must be positive");
        }
        problems
    }

    /// Largest request body accepted, leaving room for multipart framing
    /// and the profile field
    pub fn body_limit_bytes(&self) -> usize {
        self.analysis.max_image_bytes + 64 * 1024
    }
}
