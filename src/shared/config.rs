use std::{fmt, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    client::{GeminiClient, GenerationClient, OpenAiCompatClient, ResponseMode},
    error::{Error, GenerationError, Result},
    input::TagCatalog,
};

pub const DEFAULT_MODEL: &str = "gemini-flash-latest";
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Which wire protocol the generation service speaks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Gemini,
    OpenAi,
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Provider::Gemini),
            "openai" => Ok(Provider::OpenAi),
            other => Err(Error::Config(format!("unknown provider `{other}`"))),
        }
    }
}

/// Pipeline configuration, loaded from TOML with environment overrides.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub provider: Provider,
    pub model: String,
    pub base_url: Option<String>,
    pub response_mode: ResponseMode,
    /// Applied to the HTTP client; the pipeline itself sets no deadline.
    pub request_timeout_secs: u64,
    pub log_level: String,
    /// Secrets-store key. Takes precedence over the environment.
    pub api_key: Option<String>,
    pub api_key_env: String,
    pub tags: TagCatalog,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Gemini,
            model: DEFAULT_MODEL.to_owned(),
            base_url: None,
            response_mode: ResponseMode::Json,
            request_timeout_secs: 120,
            log_level: "info".to_owned(),
            api_key: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_owned(),
            tags: TagCatalog::default(),
        }
    }
}

impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("response_mode", &self.response_mode)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("log_level", &self.log_level)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("api_key_env", &self.api_key_env)
            .field("tags", &self.tags)
            .finish()
    }
}

impl PipelineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Applies `RUSAFETY_PROVIDER`, `RUSAFETY_MODEL` and `RUSAFETY_BASE_URL`.
    pub fn with_env_overrides(self) -> Result<Self> {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Same as [`Self::with_env_overrides`] with an injectable lookup.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(provider) = lookup("RUSAFETY_PROVIDER") {
            self.provider = provider.parse()?;
        }
        if let Some(model) = lookup("RUSAFETY_MODEL").filter(|m| !m.trim().is_empty()) {
            self.model = model.trim().to_owned();
        }
        if let Some(url) = lookup("RUSAFETY_BASE_URL").filter(|u| !u.trim().is_empty()) {
            self.base_url = Some(url.trim().to_owned());
        }
        Ok(self)
    }

    /// Builds the HTTP client for the configured provider.
    pub fn build_client(&self) -> std::result::Result<Box<dyn GenerationClient>, GenerationError> {
        let base_url = self.base_url.as_deref();
        let client: Box<dyn GenerationClient> = match self.provider {
            Provider::Gemini => Box::new(GeminiClient::new(base_url, self.request_timeout_secs)?),
            Provider::OpenAi => {
                Box::new(OpenAiCompatClient::new(base_url, self.request_timeout_secs)?)
            }
        };
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(config.provider, Provider::Gemini);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.response_mode, ResponseMode::Json);
        assert_eq!(config.tags, TagCatalog::default());
    }

    #[test]
    fn parses_full_file() {
        let config = PipelineConfig::from_toml_str(
            r#"
provider = "openai"
model = "llama3.2"
base_url = "http://localhost:11434/v1"
response_mode = "unconstrained"
request_timeout_secs = 30
api_key = "ollama"

[tags]
tags = ["고소작업", "화기작업"]
exclude_placeholders = false
"#,
        )
        .unwrap();
        assert_eq!(config.provider, Provider::OpenAi);
        assert_eq!(config.response_mode, ResponseMode::Unconstrained);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.tags.tags.len(), 2);
        assert!(config.tags.placeholders.is_empty());
        assert!(!format!("{config:?}").contains("ollama\""));
    }

    #[test]
    fn rejects_unknown_provider() {
        assert!(PipelineConfig::from_toml_str("provider = \"bard\"").is_err());
        let vars = HashMap::from([("RUSAFETY_PROVIDER", "bard")]);
        let result = PipelineConfig::default().with_overrides(|k| vars.get(k).map(|v| v.to_string()));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn overrides_replace_file_values() {
        let vars = HashMap::from([
            ("RUSAFETY_PROVIDER", "OpenAI"),
            ("RUSAFETY_MODEL", "gpt-4o-mini"),
            ("RUSAFETY_BASE_URL", " "),
        ]);
        let config = PipelineConfig::default()
            .with_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.provider, Provider::OpenAi);
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.base_url, None);
    }
}
