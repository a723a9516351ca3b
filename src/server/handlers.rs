use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use super::SharedState;
use crate::artifacts::ArtifactKind;
use crate::config::FailurePolicy;
use crate::llm::ModelError;
use crate::pipeline::generator::fallback_page;
use crate::pipeline::{enhancer, sanitizer};
use crate::util::{non_blank, SecretString};

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct TestKeyRequest {
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Falls back to `generation.enhance_by_default` when absent
    #[serde(default)]
    pub enhance_prompt: Option<bool>,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RefineRequest {
    #[serde(default)]
    pub current_code: Option<String>,
    #[serde(default)]
    pub refinement_prompt: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub code: String,
    pub filename: Option<String>,
    pub enhanced_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    /// Upstream error text when `code` is a fallback page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RefineResponse {
    pub success: bool,
    pub code: String,
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    /// Upstream error text when `code` is the unchanged input
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("No {0} provided")]
    MissingField(&'static str),

    #[error("Invalid API key. Please check your key and try again.")]
    InvalidCredential,

    #[error("{0}")]
    Upstream(String),

    #[error("Invalid request body: {0}")]
    BadRequest(String),
}

/// Only a provider-classified key rejection maps to `InvalidCredential`; the
/// looser text match is reserved for the key check endpoint.
impl From<ModelError> for HandlerError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::InvalidCredential(_) => HandlerError::InvalidCredential,
            other => HandlerError::Upstream(other.to_string()),
        }
    }
}

impl From<JsonRejection> for HandlerError {
    fn from(rejection: JsonRejection) -> Self {
        HandlerError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for HandlerError {
    /// Logical failures are still HTTP 200; the browser reads `success`.
    fn into_response(self) -> Response {
        Json(StatusResponse {
            success: false,
            error: Some(self.to_string()),
        })
        .into_response()
    }
}

fn required<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, HandlerError> {
    non_blank(value.as_deref()).ok_or(HandlerError::MissingField(field))
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn test_api_key(
    State(state): State<SharedState>,
    payload: Result<Json<TestKeyRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, HandlerError> {
    let Json(request) = payload?;
    let api_key = required(&request.api_key, "API key")?;

    match state.generator.test_credential(SecretString::new(api_key)).await {
        Ok(()) => {
            info!("API key accepted by provider");
            Ok(Json(StatusResponse {
                success: true,
                error: None,
            }))
        }
        Err(err) if err.is_invalid_credential() => {
            warn!("API key rejected by provider");
            Err(HandlerError::InvalidCredential)
        }
        Err(err) => {
            warn!("API key check failed: {}", err);
            Err(HandlerError::Upstream(format!("Connection failed: {}", err)))
        }
    }
}

pub async fn generate(
    State(state): State<SharedState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, HandlerError> {
    let Json(request) = payload?;
    let description = required(&request.description, "description")?;
    let api_key = required(&request.api_key, "API key")?;
    let enhance = request.enhance_prompt.unwrap_or(state.enhance_by_default);

    let prompt = if enhance {
        enhancer::enhance(description)
    } else {
        description.to_string()
    };
    let enhanced_prompt = enhance.then(|| prompt.clone());

    // In fallback mode the error page replaces the document and goes through
    // the same session and artifact bookkeeping as a real one.
    let (document, warning) = match state
        .generator
        .generate(&prompt, SecretString::new(api_key))
        .await
    {
        Ok(document) => (document, None),
        Err(err) => {
            warn!("Generation failed: {}", err);
            match state.failure_policy {
                FailurePolicy::Fallback => (fallback_page(&err.to_string()), Some(err.to_string())),
                FailurePolicy::Surface => return Err(err.into()),
            }
        }
    };
    let code = sanitizer::sanitize(&document);

    let version = non_blank(request.session_id.as_deref()).map(|session_id| {
        state
            .sessions
            .start(session_id, code.clone(), description.to_string())
            .version
    });

    let filename = save_artifact(&state, ArtifactKind::Generated, &code).await;
    info!("Generated {} chars of HTML", code.len());

    Ok(Json(GenerateResponse {
        success: true,
        code,
        filename,
        enhanced_prompt,
        version,
        warning,
    }))
}

pub async fn refine(
    State(state): State<SharedState>,
    payload: Result<Json<RefineRequest>, JsonRejection>,
) -> Result<Json<RefineResponse>, HandlerError> {
    let Json(request) = payload?;
    let current_code = required(&request.current_code, "current code")?;
    let instruction = required(&request.refinement_prompt, "refinement prompt")?;
    let api_key = required(&request.api_key, "API key")?;

    let code = match state
        .generator
        .refine(current_code, instruction, SecretString::new(api_key))
        .await
    {
        Ok(code) => sanitizer::sanitize(&code),
        Err(err) => {
            warn!("Refinement failed: {}", err);
            return match state.failure_policy {
                FailurePolicy::Fallback => Ok(Json(RefineResponse {
                    success: true,
                    code: current_code.to_string(),
                    filename: None,
                    version: None,
                    warning: Some(err.to_string()),
                })),
                FailurePolicy::Surface => Err(err.into()),
            };
        }
    };

    let version = non_blank(request.session_id.as_deref())
        .and_then(|session_id| state.sessions.record_refinement(session_id, code.clone()))
        .map(|entry| entry.version);

    let filename = save_artifact(&state, ArtifactKind::Refined, &code).await;
    info!("Refined document now {} chars", code.len());

    Ok(Json(RefineResponse {
        success: true,
        code,
        filename,
        version,
        warning: None,
    }))
}

/// The audit copy is best effort: a failed write is logged, never returned.
async fn save_artifact(state: &SharedState, kind: ArtifactKind, code: &str) -> Option<String> {
    match state.artifacts.write(kind, code).await {
        Ok(filename) => Some(filename),
        Err(err) => {
            warn!("{:#}", err);
            None
        }
    }
}
