use futures_util::StreamExt;
use panel_logging::{panel_debug, panel_warn};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Response, StatusCode, Url};

use crate::wire::{self, AgentsEnvelope, AnalyzeEnvelope, RecommendRequest};
use crate::{
    AgentDirectory, AnalyzeReply, BackendError, BackendSettings, FailureKind, HealthReport,
    ImageUpload, RecommendationSet,
};

/// The outbound calls both front ends need. One call per method invocation,
/// no retries.
#[async_trait::async_trait]
pub trait Backend: Send + Sync {
    /// Uploads `image` and asks `question` about it.
    async fn analyze_image(
        &self,
        image: &ImageUpload,
        question: &str,
    ) -> Result<AnalyzeReply, BackendError>;

    /// Asks for the agents best matching `task`.
    async fn recommend(&self, task: &str) -> Result<RecommendationSet, BackendError>;

    /// Fetches every agent the recommender knows.
    async fn list_agents(&self) -> Result<AgentDirectory, BackendError>;

    /// Pings the recommender's root endpoint.
    async fn health(&self) -> Result<HealthReport, BackendError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    settings: BackendSettings,
    client: reqwest::Client,
}

impl ReqwestBackend {
    pub fn new(settings: BackendSettings) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| BackendError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &BackendSettings {
        &self.settings
    }

    /// Joins `path` below `base`, keeping any path prefix `base` carries.
    fn endpoint(base: &str, path: &str) -> Result<Url, BackendError> {
        let base = format!("{}/", base.trim_end_matches('/'));
        Url::parse(&base)
            .and_then(|base| base.join(path))
            .map_err(|err| {
                BackendError::new(FailureKind::InvalidEndpoint, format!("{base}{path}: {err}"))
            })
    }

    /// Reads the body with the size cap, then turns non-2xx statuses into
    /// errors carrying the payload's `error` text.
    async fn read_body(&self, response: Response) -> Result<Vec<u8>, BackendError> {
        let status = response.status();
        let max_bytes = self.settings.max_response_bytes;

        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(BackendError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(BackendError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            body.extend_from_slice(&chunk);
        }

        check_status(status, &body)?;
        Ok(body)
    }

    async fn get_json(&self, url: Url) -> Result<Vec<u8>, BackendError> {
        panel_debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_reqwest_error)?;
        self.read_body(response).await
    }
}

#[async_trait::async_trait]
impl Backend for ReqwestBackend {
    async fn analyze_image(
        &self,
        image: &ImageUpload,
        question: &str,
    ) -> Result<AnalyzeReply, BackendError> {
        // The backend reads the question from the query string, not the form.
        let mut url = Self::endpoint(&self.settings.image_qa_url, "api/analyze")?;
        url.query_pairs_mut().append_pair("question", question);

        let part = Part::bytes(image.bytes.to_vec())
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)
            .map_err(|err| BackendError::new(FailureKind::InvalidEndpoint, err.to_string()))?;
        let form = Form::new().part("image", part);

        panel_debug!(
            "POST {} image={} bytes={} question_len={}",
            url.path(),
            image.file_name,
            image.bytes.len(),
            question.len()
        );
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body = self.read_body(response).await?;

        let envelope: AnalyzeEnvelope = wire::decode(&body)?;
        if !envelope.success {
            return Err(
                BackendError::new(FailureKind::Rejected, "backend reported failure")
                    .with_backend_message(envelope.error),
            );
        }
        let answer = envelope.answer.ok_or_else(|| {
            BackendError::new(FailureKind::MalformedResponse, "success without answer")
        })?;

        Ok(AnalyzeReply {
            answer,
            question: envelope.question,
        })
    }

    async fn recommend(&self, task: &str) -> Result<RecommendationSet, BackendError> {
        let url = Self::endpoint(&self.settings.recommender_url, "recommend")?;
        let payload = serde_json::to_vec(&RecommendRequest { task })
            .map_err(|err| BackendError::new(FailureKind::MalformedResponse, err.to_string()))?;

        panel_debug!("POST {} task_len={}", url.path(), task.len());
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body = self.read_body(response).await?;

        wire::decode(&body)
    }

    async fn list_agents(&self) -> Result<AgentDirectory, BackendError> {
        let url = Self::endpoint(&self.settings.recommender_url, "agents")?;
        let body = self.get_json(url).await?;
        let envelope: AgentsEnvelope = wire::decode(&body)?;
        Ok(envelope.agents)
    }

    async fn health(&self) -> Result<HealthReport, BackendError> {
        let url = Self::endpoint(&self.settings.recommender_url, "")?;
        let body = self.get_json(url).await?;
        wire::decode(&body)
    }
}

fn check_status(status: StatusCode, body: &[u8]) -> Result<(), BackendError> {
    if status.is_success() {
        return Ok(());
    }
    let backend_message = wire::error_message(body);
    panel_warn!("backend answered {} error={:?}", status, backend_message);
    Err(
        BackendError::new(FailureKind::HttpStatus(status.as_u16()), status.to_string())
            .with_backend_message(backend_message),
    )
}

fn map_reqwest_error(err: reqwest::Error) -> BackendError {
    if err.is_timeout() {
        return BackendError::new(FailureKind::Timeout, err.to_string());
    }
    BackendError::new(FailureKind::Network, err.to_string())
}
