use std::sync::Arc;
use std::time::Duration;

use askpanel_engine::{
    AgentDirectory, AgentInfo, AgentMatch, AnalyzeReply, Backend, BackendError, EngineHandle,
    FailureKind, HealthReport, ImageUpload, RecommendationSet,
};

use super::app::Session;
use super::effects::EffectRunner;

/// Canned answers for every call. An image named `broken.png` is rejected.
pub struct ScriptedBackend {
    pub recommend_delay: Duration,
}

#[async_trait::async_trait]
impl Backend for ScriptedBackend {
    async fn analyze_image(
        &self,
        image: &ImageUpload,
        _question: &str,
    ) -> Result<AnalyzeReply, BackendError> {
        if image.file_name == "broken.png" {
            return Err(BackendError {
                kind: FailureKind::Rejected,
                message: "success=false".to_string(),
                backend_message: Some("Could not decode image".to_string()),
            });
        }
        Ok(AnalyzeReply {
            answer: "A cat on a sofa.".to_string(),
            question: None,
        })
    }

    async fn recommend(&self, task: &str) -> Result<RecommendationSet, BackendError> {
        tokio::time::sleep(self.recommend_delay).await;
        Ok(RecommendationSet {
            task: task.to_string(),
            recommendations: vec![AgentMatch {
                name: "Aider".to_string(),
                score: 7,
                explanation: vec![],
                agent_info: AgentInfo::default(),
            }],
            total_agents: 7,
        })
    }

    async fn list_agents(&self) -> Result<AgentDirectory, BackendError> {
        let mut agents = AgentDirectory::new();
        agents.insert("Aider".to_string(), AgentInfo::default());
        agents.insert("Cursor".to_string(), AgentInfo::default());
        Ok(agents)
    }

    async fn health(&self) -> Result<HealthReport, BackendError> {
        Ok(HealthReport::default())
    }
}

pub fn scripted_session(recommend_delay: Duration) -> Session {
    let backend = Arc::new(ScriptedBackend { recommend_delay });
    let engine = EngineHandle::with_backend(backend).unwrap();
    Session::new(EffectRunner::with_engine(engine))
}
