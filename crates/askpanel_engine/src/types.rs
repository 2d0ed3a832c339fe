use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use thiserror::Error;

/// Correlates a command with its completion event.
pub type CallId = u64;

/// Image bytes plus the metadata the multipart part needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Arc<[u8]>,
}

/// Successful image QA answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeReply {
    pub answer: String,
    /// Question as echoed by the backend.
    pub question: Option<String>,
}

/// Body of a successful `/recommend` call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RecommendationSet {
    pub task: String,
    pub recommendations: Vec<AgentMatch>,
    pub total_agents: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AgentMatch {
    pub name: String,
    pub score: i32,
    #[serde(default)]
    pub explanation: Vec<String>,
    pub agent_info: AgentInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct AgentInfo {
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub ideal_tasks: Vec<String>,
    #[serde(default)]
    pub requires_setup: bool,
    #[serde(default)]
    pub offline_support: bool,
}

/// Every agent the recommender knows, by name.
pub type AgentDirectory = BTreeMap<String, AgentInfo>;

/// Body of the recommender's `/` health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct HealthReport {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub endpoints: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    AnalysisCompleted {
        call_id: CallId,
        result: Result<AnalyzeReply, BackendError>,
    },
    RecommendationsCompleted {
        call_id: CallId,
        result: Result<RecommendationSet, BackendError>,
    },
    AgentsLoaded(Result<AgentDirectory, BackendError>),
    HealthChecked(Result<HealthReport, BackendError>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct BackendError {
    pub kind: FailureKind,
    pub message: String,
    /// `error` text carried by the response payload, if any.
    pub backend_message: Option<String>,
}

impl BackendError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            backend_message: None,
        }
    }

    pub(crate) fn with_backend_message(mut self, backend_message: Option<String>) -> Self {
        self.backend_message = backend_message;
        self
    }

    /// True when the backend answered and explicitly flagged the call as failed.
    pub fn is_rejection(&self) -> bool {
        self.kind == FailureKind::Rejected
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidEndpoint,
    HttpStatus(u16),
    Timeout,
    Network,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    MalformedResponse,
    /// 2xx answer whose `success` flag was false.
    Rejected,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidEndpoint => write!(f, "invalid endpoint"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::MalformedResponse => write!(f, "malformed response"),
            FailureKind::Rejected => write!(f, "rejected by backend"),
        }
    }
}
