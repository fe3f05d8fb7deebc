use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::debug;

use crate::{
    client::{ApiKey, GenerationClient, GenerationRequest, ResponseMode, http_client, status_error},
    error::GenerationError,
};

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Google Gemini `generateContent` endpoint.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(base_url: Option<&str>, timeout_secs: u64) -> Result<Self, GenerationError> {
        Ok(Self {
            client: http_client(timeout_secs)?,
            base_url: base_url
                .unwrap_or(GEMINI_BASE_URL)
                .trim_end_matches('/')
                .to_owned(),
        })
    }

    fn request_body(request: &GenerationRequest) -> Value {
        let mut body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }]
            }]
        });
        if request.mode == ResponseMode::Json {
            body["generationConfig"] = json!({ "responseMimeType": "application/json" });
        }
        body
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(
        &self,
        api_key: &ApiKey,
        request: &GenerationRequest,
    ) -> Result<String, GenerationError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, request.model
        );
        debug!("gemini request to model {}", request.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key.expose())
            .json(&Self::request_body(request))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let data: Value = response.json().await?;
        let text: String = data["candidates"][0]["content"]["parts"]
            .as_array()
            .map(|parts| parts.iter().filter_map(|p| p["text"].as_str()).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }
        Ok(text)
    }
}
