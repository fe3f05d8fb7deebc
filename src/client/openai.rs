use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::debug;

use crate::{
    client::{ApiKey, GenerationClient, GenerationRequest, ResponseMode, http_client, status_error},
    error::GenerationError,
    prompt::PromptTemplate,
};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Any OpenAI-compatible `chat/completions` endpoint, local servers included.
pub struct OpenAiCompatClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenAiCompatClient {
    pub fn new(base_url: Option<&str>, timeout_secs: u64) -> Result<Self, GenerationError> {
        Ok(Self {
            client: http_client(timeout_secs)?,
            base_url: base_url
                .unwrap_or(OPENAI_BASE_URL)
                .trim_end_matches('/')
                .to_owned(),
        })
    }
}

#[async_trait]
impl GenerationClient for OpenAiCompatClient {
    async fn generate(
        &self,
        api_key: &ApiKey,
        request: &GenerationRequest,
    ) -> Result<String, GenerationError> {
        let url = format!("{}/chat/completions", self.base_url);

        let mut body = json!({
            "model": request.model,
            "messages": [{ "role": "user", "content": request.prompt }],
        });
        // json_object mode forces an object root, which the risk table array cannot use
        if request.mode == ResponseMode::Json
            && request.template == PromptTemplate::EquipmentRecommendation
        {
            body["response_format"] = json!({ "type": "json_object" });
        }
        debug!("chat completion request to model {}", request.model);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key.expose())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let data: Value = response.json().await?;
        match data["choices"][0]["message"]["content"].as_str() {
            Some(text) if !text.trim().is_empty() => Ok(text.to_owned()),
            _ => Err(GenerationError::EmptyResponse),
        }
    }
}
