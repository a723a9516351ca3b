use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use super::client::{LlmClient, MockLlmClient};
use super::client_impl::{AnthropicClient, GeminiClient, OpenAIClient};
use super::error::ModelError;
use crate::config::LlmConfig;
use crate::util::SecretString;

/// Builds a client bound to one caller's credential. Handlers call this once per
/// request, so the key lives exactly as long as the request.
pub trait ClientFactory: Send + Sync {
    fn create(&self, api_key: SecretString) -> Result<Box<dyn LlmClient>, ModelError>;
}

/// Factory for the real providers, sharing one connection pool across requests.
pub struct ProviderFactory {
    config: LlmConfig,
    http: Client,
}

impl ProviderFactory {
    pub fn new(config: LlmConfig) -> Result<Self, ModelError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ModelError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { config, http })
    }
}

impl ClientFactory for ProviderFactory {
    fn create(&self, api_key: SecretString) -> Result<Box<dyn LlmClient>, ModelError> {
        let max_tokens = self.config.get_max_tokens();
        let model = self.config.model.clone();
        let http = self.http.clone();
        let base_url = self.config.base_url.clone();

        match self.config.provider.as_str() {
            "gemini" => {
                let client = GeminiClient::new(http, api_key, model, max_tokens);
                Ok(Box::new(match base_url {
                    Some(url) => client.with_base_url(url),
                    None => client,
                }))
            }

            "anthropic" => {
                let client = AnthropicClient::new(http, api_key, model, max_tokens);
                Ok(Box::new(match base_url {
                    Some(url) => client.with_base_url(url),
                    None => client,
                }))
            }

            "openai" => {
                let client = OpenAIClient::new(http, api_key, model, max_tokens);
                Ok(Box::new(match base_url {
                    Some(url) => client.with_base_url(url),
                    None => client,
                }))
            }

            "openai-compatible" => {
                let base_url = base_url.unwrap_or_else(|| "http://localhost:11434/v1".to_string());
                Ok(Box::new(
                    OpenAIClient::new(http, api_key, model, max_tokens).with_base_url(base_url),
                ))
            }

            unknown => Err(ModelError::Config(format!(
                "Unknown LLM provider: {}",
                unknown
            ))),
        }
    }
}

/// Factory handing out [`MockLlmClient`]s; used by `--dry-run` and tests.
#[derive(Default)]
pub struct MockFactory {
    failure: Option<String>,
}

impl MockFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
        }
    }
}

impl ClientFactory for MockFactory {
    fn create(&self, _api_key: SecretString) -> Result<Box<dyn LlmClient>, ModelError> {
        Ok(Box::new(match self.failure {
            Some(ref message) => MockLlmClient::failing(message.clone()),
            None => MockLlmClient::new(),
        }))
    }
}

/// Create a client factory based on configuration
pub fn create_factory(config: &LlmConfig, dry_run: bool) -> Result<Arc<dyn ClientFactory>, ModelError> {
    if dry_run {
        return Ok(Arc::new(MockFactory::new()));
    }
    Ok(Arc::new(ProviderFactory::new(config.clone())?))
}
