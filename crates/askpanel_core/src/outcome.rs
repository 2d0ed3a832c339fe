use std::collections::BTreeMap;

/// Answer shown by the image QA controller on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub answer: String,
    /// Question echoed by the backend, or the submitted one when it echoed nothing.
    pub question: String,
}

/// What the image QA backend returned on success, before the echo fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisReply {
    pub answer: String,
    pub question: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendations {
    pub task: String,
    /// Ranked best first, as returned by the backend.
    pub agents: Vec<RankedAgent>,
    pub total_agents: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankedAgent {
    pub name: String,
    pub score: i32,
    pub explanation: Vec<String>,
    pub profile: AgentProfile,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AgentProfile {
    pub languages: Vec<String>,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub ideal_tasks: Vec<String>,
    pub requires_setup: bool,
    pub offline_support: bool,
}

/// Every agent known to the recommender, keyed by name.
pub type AgentCatalog = BTreeMap<String, AgentProfile>;

/// Why an outbound call did not produce a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallFailure {
    /// The backend answered but flagged the request as failed.
    Reported { message: Option<String> },
    /// The call never produced a usable answer: unreachable host, HTTP error
    /// status, timeout or malformed body. `backend_message` is the error text
    /// found in the response payload, if any.
    Transport { backend_message: Option<String> },
}

/// Fixed texts a controller falls back to when no backend text is available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailureMessages {
    pub validation: &'static str,
    pub reported_default: &'static str,
    pub unreachable: &'static str,
}

pub const IMAGE_QA_MESSAGES: FailureMessages = FailureMessages {
    validation: "Please upload an image and enter a question.",
    reported_default: "An error occurred while analyzing the image.",
    unreachable: "Failed to connect to the server. Please make sure the backend is running.",
};

pub const RECOMMENDER_MESSAGES: FailureMessages = FailureMessages {
    validation: "Please enter a task description",
    reported_default: "The recommender could not process this task.",
    unreachable: "Failed to get recommendations. Please make sure the backend is running.",
};

impl FailureMessages {
    /// Text to display for `failure`. Blank backend text counts as absent.
    pub fn describe(&self, failure: &CallFailure) -> String {
        match failure {
            CallFailure::Reported { message } => non_blank(message.as_deref())
                .unwrap_or(self.reported_default)
                .to_string(),
            CallFailure::Transport { backend_message } => non_blank(backend_message.as_deref())
                .unwrap_or(self.unreachable)
                .to_string(),
        }
    }
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}
