pub mod credential;
pub mod gemini;
pub mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{error::GenerationError, prompt::PromptTemplate};

pub use credential::{ApiKey, resolve_api_key};
pub use gemini::GeminiClient;
pub use openai::OpenAiCompatClient;

/// How strictly the service is asked to emit JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    /// The service is configured to emit JSON only.
    #[default]
    Json,
    /// Free-form output; the extractor's rescue tier does the work.
    Unconstrained,
}

/// One prompt sent to the generation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub template: PromptTemplate,
    pub prompt: String,
    pub model: String,
    pub mode: ResponseMode,
}

impl GenerationRequest {
    pub fn new(
        template: PromptTemplate,
        prompt: impl Into<String>,
        model: impl Into<String>,
        mode: ResponseMode,
    ) -> Self {
        Self {
            template,
            prompt: prompt.into(),
            model: model.into(),
            mode,
        }
    }
}

/// A hosted text-generation endpoint. Returns the raw text output.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(
        &self,
        api_key: &ApiKey,
        request: &GenerationRequest,
    ) -> Result<String, GenerationError>;
}

#[async_trait]
impl<T: GenerationClient + ?Sized> GenerationClient for Box<T> {
    async fn generate(
        &self,
        api_key: &ApiKey,
        request: &GenerationRequest,
    ) -> Result<String, GenerationError> {
        (**self).generate(api_key, request).await
    }
}

/// Maps a non-success HTTP response to a generation error.
pub(crate) async fn status_error(response: reqwest::Response) -> GenerationError {
    let code = response.status().as_u16();
    if code == 429 {
        let retry_after_secs = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse().ok())
            .unwrap_or(60);
        return GenerationError::RateLimited { retry_after_secs };
    }
    let body = response.text().await.unwrap_or_default();
    GenerationError::Status { code, body }
}

pub(crate) fn http_client(timeout_secs: u64) -> Result<reqwest::Client, GenerationError> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| GenerationError::Client(e.to_string()))
}
