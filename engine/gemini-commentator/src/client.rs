use crate::config::GeminiConfig;
use crate::error::{GeminiError, Result};
use crate::models::{GenerateContentRequest, GenerateContentResponse, GenerationConfig};
use async_trait::async_trait;
use fantasy_leaderboard::{CommentaryError, CommentaryProvider, CommentaryRequest};
use reqwest::Client;
use tracing::{debug, warn};

/// Header carrying the API key; keeps it out of URLs and error messages
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Commentary provider backed by the Gemini generateContent API
pub struct GeminiCommentator {
    config: GeminiConfig,
    api_key: String,
    client: Client,
}

impl GeminiCommentator {
    /// Create a client, reading the API key from the configured variable
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let api_key = config.api_key().map_err(|e| GeminiError::Config(e.to_string()))?;
        Self::with_api_key(config, api_key)
    }

    /// Create a client with an explicit API key
    pub fn with_api_key(config: GeminiConfig, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| GeminiError::Http(e.without_url()))?;
        Self::with_client(config, api_key, client)
    }

    /// Create a client around a preconfigured HTTP client
    pub fn with_client(
        config: GeminiConfig,
        api_key: impl Into<String>,
        client: Client,
    ) -> Result<Self> {
        config.validate().map_err(|e| GeminiError::Config(e.to_string()))?;

        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GeminiError::Config("Gemini API key is empty".to_string()));
        }
        Ok(Self { config, api_key, client })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Send one prompt and return the generated text
    pub async fn generate_text(&self, prompt: &str) -> Result<String> {
        let body = GenerateContentRequest::from_prompt(
            prompt,
            Some(GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens: self.config.max_output_tokens,
            }),
        );

        debug!("Requesting commentary from {}", self.config.endpoint());

        let response = self
            .client
            .post(self.config.endpoint())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&body)
            .send()
            .await
            .map_err(GeminiError::from_request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Gemini request failed with status {}", status);
            return Err(GeminiError::Status { status: status.as_u16(), body });
        }

        let payload: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GeminiError::Decode(e.without_url().to_string()))?;

        payload.text().ok_or(GeminiError::EmptyResponse)
    }
}

#[async_trait]
impl CommentaryProvider for GeminiCommentator {
    async fn generate(
        &self,
        request: &CommentaryRequest,
    ) -> std::result::Result<String, CommentaryError> {
        self.generate_text(&request.prompt()).await.map_err(CommentaryError::from)
    }
}
