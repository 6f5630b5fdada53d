//! API request and response types

use crate::catalog::{Recommendation, SchemeRecord};
use crate::persona::Persona;
use serde::{Deserialize, Serialize};

/// Request to send a chat message
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

/// Response for chat action
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// `false` when the text was blank and nothing was queued
    pub queued: bool,
}

/// Request to select a persona tab.
///
/// Kept as a string so unknown names reach the handler and get a clear 400.
#[derive(Debug, Deserialize)]
pub struct PersonaRequest {
    pub persona: String,
}

/// Response for persona selection
#[derive(Debug, Serialize)]
pub struct PersonaResponse {
    pub persona: Persona,
}

/// Response for lifecycle actions
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Query for scheme lookup
#[derive(Debug, Deserialize)]
pub struct SchemeQuery {
    #[serde(default)]
    pub q: String,
}

/// Result of a scheme lookup
#[derive(Debug, Serialize)]
pub struct SchemeLookupResponse {
    pub scheme: Option<SchemeRecord>,
}

/// Result of a catalog reload
#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub count: usize,
}

/// Recommended schemes for a citizen profile
#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub count: usize,
    pub results: Vec<Recommendation>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
