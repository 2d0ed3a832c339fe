//! Request and envelope shapes that never leave the engine.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{AgentDirectory, BackendError, FailureKind};

#[derive(Debug, Serialize)]
pub(crate) struct RecommendRequest<'a> {
    pub task: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnalyzeEnvelope {
    #[serde(default)]
    pub success: bool,
    pub answer: Option<String>,
    pub question: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AgentsEnvelope {
    pub agents: AgentDirectory,
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    error: Option<String>,
}

/// Pulls the `error` field out of a JSON error body. Non-JSON bodies (HTML
/// error pages, empty bodies) yield `None`.
pub(crate) fn error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorPayload>(body)
        .ok()
        .and_then(|payload| payload.error)
}

pub(crate) fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, BackendError> {
    serde_json::from_slice(body)
        .map_err(|err| BackendError::new(FailureKind::MalformedResponse, err.to_string()))
}
