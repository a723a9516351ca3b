use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::client::LlmClient;
use super::error::ModelError;
use crate::util::SecretString;

/// Turn a non-2xx reply into a classified error; pass 2xx through.
async fn check_status(provider: &'static str, response: Response) -> Result<Response, ModelError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let error_text = response.text().await.unwrap_or_default();
    Err(ModelError::from_status(provider, status, error_text))
}

// ============================================================================
// Gemini Client (Google Generative AI)
// ============================================================================

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiClient {
    api_key: SecretString,
    model: String,
    base_url: String,
    max_tokens: u32,
    client: Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiResponseContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: String,
}

impl GeminiResponse {
    /// Concatenated text of the first candidate; long documents arrive split across parts.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().map(|p| p.text).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

impl GeminiClient {
    pub fn new(client: Client, api_key: SecretString, model: String, max_tokens: u32) -> Self {
        Self {
            api_key,
            model,
            base_url: GEMINI_BASE_URL.to_string(),
            max_tokens,
            client,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: Some(GeminiGenerationConfig {
                max_output_tokens: self.max_tokens,
            }),
        };

        debug!("Calling Gemini API with model: {}", self.model);

        // Key goes in a header so it never shows up in reqwest's URL-bearing errors
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.expose())
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ModelError::transport("Gemini", e))?;

        let api_response: GeminiResponse = check_status("Gemini", response)
            .await?
            .json()
            .await
            .map_err(|e| ModelError::transport("Gemini", e))?;

        api_response
            .into_text()
            .ok_or(ModelError::EmptyResponse("Gemini"))
    }
}

// ============================================================================
// Anthropic Client
// ============================================================================

pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";

pub struct AnthropicClient {
    api_key: SecretString,
    model: String,
    base_url: String,
    max_tokens: u32,
    client: Client,
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
}

#[derive(Debug, Deserialize)]
struct AnthropicContent {
    #[serde(default)]
    text: String,
}

impl AnthropicClient {
    pub fn new(client: Client, api_key: SecretString, model: String, max_tokens: u32) -> Self {
        Self {
            api_key,
            model,
            base_url: ANTHROPIC_BASE_URL.to_string(),
            max_tokens,
            client,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        let request = AnthropicRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
        };

        debug!("Calling Anthropic API with model: {}", self.model);

        let response = self
            .client
            .post(format!("{}/messages", self.base_url.trim_end_matches('/')))
            .header("x-api-key", self.api_key.expose())
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ModelError::transport("Anthropic", e))?;

        let api_response: AnthropicResponse = check_status("Anthropic", response)
            .await?
            .json()
            .await
            .map_err(|e| ModelError::transport("Anthropic", e))?;

        api_response
            .content
            .into_iter()
            .map(|c| c.text)
            .find(|t| !t.is_empty())
            .ok_or(ModelError::EmptyResponse("Anthropic"))
    }
}

// ============================================================================
// OpenAI Client (also serves OpenAI-compatible gateways)
// ============================================================================

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

pub struct OpenAIClient {
    api_key: SecretString,
    model: String,
    base_url: String,
    max_tokens: u32,
    client: Client,
}

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: ChatMessage,
}

impl OpenAIClient {
    pub fn new(client: Client, api_key: SecretString, model: String, max_tokens: u32) -> Self {
        Self {
            api_key,
            model,
            base_url: OPENAI_BASE_URL.to_string(),
            max_tokens,
            client,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn build_request(&self, prompt: &str) -> OpenAIRequest {
        // GPT-5+ models use max_completion_tokens instead of max_tokens
        let (max_tokens, max_completion_tokens) = if self.model.starts_with("gpt-5") {
            (None, Some(self.max_tokens))
        } else {
            (Some(self.max_tokens), None)
        };

        OpenAIRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            max_tokens,
            max_completion_tokens,
        }
    }
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        let request = self.build_request(prompt);

        debug!(
            "Calling OpenAI-compatible API at {} with model: {}",
            self.base_url, self.model
        );

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let mut req = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&request);

        // Local models run without a key
        if !self.api_key.is_blank() && self.api_key.expose().to_lowercase() != "none" {
            req = req.header("authorization", format!("Bearer {}", self.api_key.expose()));
        }

        let response = req
            .send()
            .await
            .map_err(|e| ModelError::transport("OpenAI", e))?;

        let api_response: OpenAIResponse = check_status("OpenAI", response)
            .await?
            .json()
            .await
            .map_err(|e| ModelError::transport("OpenAI", e))?;

        api_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .filter(|t| !t.is_empty())
            .ok_or(ModelError::EmptyResponse("OpenAI"))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemini_client_defaults() {
        let client = GeminiClient::new(
            Client::new(),
            "test_key".into(),
            "gemini-2.5-flash".to_string(),
            8192,
        );
        assert_eq!(client.api_key.expose(), "test_key");
        assert_eq!(client.base_url, GEMINI_BASE_URL);
        assert_eq!(client.max_tokens, 8192);
    }

    #[test]
    fn test_gemini_request_structure() {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart {
                    text: "test prompt".to_string(),
                }],
            }],
            generation_config: Some(GeminiGenerationConfig {
                max_output_tokens: 16384,
            }),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "test prompt");
        assert_eq!(json["generationConfig"]["maxOutputTokens"], 16384);
    }

    #[test]
    fn test_gemini_response_joins_parts() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "<html>"}, {"text": "</html>"}]}}
            ]
        }"#;
        let response: GeminiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.into_text().unwrap(), "<html></html>");
    }

    #[test]
    fn test_gemini_response_blocked_candidate_has_no_text() {
        // Safety-blocked candidates come back without content
        let json = r#"{"candidates": [{"finishReason": "SAFETY"}]}"#;
        let response: GeminiResponse = serde_json::from_str(json).unwrap();
        assert!(response.into_text().is_none());

        let response: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert!(response.into_text().is_none());
    }

    #[test]
    fn test_anthropic_response_parsing() {
        let json = r#"{"content": [{"type": "text", "text": "Hello, world!"}]}"#;
        let response: AnthropicResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.content[0].text, "Hello, world!");
    }

    #[test]
    fn test_openai_request_gpt5_uses_max_completion_tokens() {
        let client = OpenAIClient::new(Client::new(), "k".into(), "gpt-5-mini".to_string(), 4096);
        let json = serde_json::to_value(client.build_request("test")).unwrap();
        assert!(json.get("max_tokens").is_none());
        assert_eq!(json["max_completion_tokens"], 4096);
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_openai_request_non_gpt5_uses_max_tokens() {
        let client = OpenAIClient::new(Client::new(), "k".into(), "gpt-4o".to_string(), 4096)
            .with_base_url("http://localhost:11434/v1");
        let json = serde_json::to_value(client.build_request("test")).unwrap();
        assert_eq!(json["max_tokens"], 4096);
        assert!(json.get("max_completion_tokens").is_none());
        assert_eq!(client.base_url, "http://localhost:11434/v1");
    }

    #[test]
    fn test_openai_response_parsing() {
        let json = r#"{
            "choices": [{"message": {"role": "assistant", "content": "Hello, world!"}}]
        }"#;
        let response: OpenAIResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.choices[0].message.content, "Hello, world!");
    }
}
