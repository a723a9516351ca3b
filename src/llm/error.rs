use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single upstream completion call.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The provider rejected the caller's API key
    #[error("invalid API key: {0}")]
    InvalidCredential(String),

    #[error("{provider} API error {status}: {body}")]
    Api {
        provider: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("request to {provider} failed: {message}")]
    Transport {
        provider: &'static str,
        message: String,
    },

    #[error("no content in {0} response")]
    EmptyResponse(&'static str),

    #[error("model client misconfigured: {0}")]
    Config(String),
}

impl ModelError {
    /// Classify a non-success HTTP reply. Providers signal a bad key with
    /// 400/401/403 and wording such as `API_KEY_INVALID` or "invalid x-api-key".
    pub fn from_status(provider: &'static str, status: StatusCode, body: String) -> Self {
        let rejects_key = matches!(
            status,
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN
        ) && mentions_invalid_key(&body);

        if rejects_key || status == StatusCode::UNAUTHORIZED {
            ModelError::InvalidCredential(body)
        } else {
            ModelError::Api {
                provider,
                status,
                body,
            }
        }
    }

    pub fn transport(provider: &'static str, err: reqwest::Error) -> Self {
        ModelError::Transport {
            provider,
            message: err.to_string(),
        }
    }

    pub fn is_invalid_credential(&self) -> bool {
        match self {
            ModelError::InvalidCredential(_) => true,
            other => mentions_invalid_key(&other.to_string()),
        }
    }
}

fn mentions_invalid_key(text: &str) -> bool {
    text.contains("API_KEY_INVALID") || text.to_lowercase().contains("invalid")
}
