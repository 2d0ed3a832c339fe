use std::time::Duration;

/// Where both backends listen unless configured otherwise.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendSettings {
    /// Base URL of the image QA backend; `/api/analyze` is appended.
    pub image_qa_url: String,
    /// Base URL of the recommender backend; `/recommend`, `/agents` and `/` are appended.
    pub recommender_url: String,
    pub connect_timeout: Duration,
    /// Whole-call limit. Vision inference is slow, so this is generous.
    pub request_timeout: Duration,
    pub max_response_bytes: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            image_qa_url: DEFAULT_BACKEND_URL.to_string(),
            recommender_url: DEFAULT_BACKEND_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
            max_response_bytes: 2 * 1024 * 1024,
        }
    }
}
