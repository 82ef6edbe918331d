use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Gemini commentary provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    /// Generative Language API base URL
    pub api_base_url: String,

    /// Model name (e.g., "gemini-1.5-flash")
    pub model: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// HTTP request timeout in milliseconds
    pub request_timeout_ms: u64,

    /// Sampling temperature
    pub temperature: f32,

    /// Upper bound on generated tokens per comment
    pub max_output_tokens: u32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-1.5-flash".to_string(),
            api_key_env: "GOOGLE_API_KEY".to_string(),
            request_timeout_ms: 10_000,
            temperature: 0.9,
            max_output_tokens: 256,
        }
    }
}

impl GeminiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();

        if let Ok(base_url) = std::env::var("GEMINI_API_BASE_URL") {
            config.api_base_url = base_url;
        }

        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            config.model = model;
        }

        if let Ok(key_env) = std::env::var("GEMINI_API_KEY_ENV") {
            config.api_key_env = key_env;
        }

        if let Ok(timeout) = std::env::var("GEMINI_TIMEOUT_SECS") {
            let secs: u64 = timeout.parse().context("GEMINI_TIMEOUT_SECS must be an integer")?;
            config.request_timeout_ms = secs
                .checked_mul(1_000)
                .ok_or_else(|| anyhow::anyhow!("GEMINI_TIMEOUT_SECS is too large ({secs})"))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make every request fail
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.request_timeout_ms == 0 {
            anyhow::bail!("Gemini request timeout must be greater than 0");
        }

        if self.model.trim().is_empty() {
            anyhow::bail!("Gemini model name must not be empty");
        }

        Ok(())
    }

    /// Get the API key from the environment
    pub fn api_key(&self) -> anyhow::Result<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("Gemini API key not found in ${}", self.api_key_env))
    }

    /// Request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// generateContent URL for the configured model, without credentials
    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base_url.trim_end_matches('/'),
            self.model
        )
    }
}
