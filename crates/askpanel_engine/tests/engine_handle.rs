use std::sync::{Arc, Mutex};
use std::time::Duration;

use askpanel_engine::{
    AgentDirectory, AgentInfo, AnalyzeReply, Backend, BackendError, EngineEvent, EngineHandle,
    HealthReport, ImageUpload, RecommendationSet,
};

/// Answers every call from memory and records what it was asked.
#[derive(Default)]
struct StubBackend {
    calls: Mutex<Vec<String>>,
}

impl StubBackend {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait::async_trait]
impl Backend for StubBackend {
    async fn analyze_image(
        &self,
        image: &ImageUpload,
        question: &str,
    ) -> Result<AnalyzeReply, BackendError> {
        self.record(format!("analyze {} {}", image.file_name, question));
        Ok(AnalyzeReply {
            answer: format!("{} bytes", image.bytes.len()),
            question: Some(question.to_string()),
        })
    }

    async fn recommend(&self, task: &str) -> Result<RecommendationSet, BackendError> {
        self.record(format!("recommend {task}"));
        Ok(RecommendationSet {
            task: task.to_string(),
            recommendations: vec![],
            total_agents: 0,
        })
    }

    async fn list_agents(&self) -> Result<AgentDirectory, BackendError> {
        self.record("agents".to_string());
        let mut agents = AgentDirectory::new();
        agents.insert("Cursor".to_string(), AgentInfo::default());
        Ok(agents)
    }

    async fn health(&self) -> Result<HealthReport, BackendError> {
        self.record("health".to_string());
        Ok(HealthReport::default())
    }
}

fn next_event(handle: &EngineHandle) -> EngineEvent {
    handle
        .recv_timeout(Duration::from_secs(5))
        .expect("engine event")
}

#[test]
fn commands_complete_with_matching_call_ids() {
    let backend = Arc::new(StubBackend::default());
    let handle = EngineHandle::with_backend(backend.clone()).expect("engine");

    handle.analyze(
        11,
        ImageUpload {
            file_name: "a.jpg".into(),
            content_type: "image/jpeg".into(),
            bytes: Arc::from(vec![1u8, 2, 3]),
        },
        "what?",
    );
    match next_event(&handle) {
        EngineEvent::AnalysisCompleted { call_id, result } => {
            assert_eq!(call_id, 11);
            assert_eq!(result.unwrap().answer, "3 bytes");
        }
        other => panic!("unexpected event {other:?}"),
    }

    handle.recommend(12, "write tests");
    match next_event(&handle) {
        EngineEvent::RecommendationsCompleted { call_id, result } => {
            assert_eq!(call_id, 12);
            assert_eq!(result.unwrap().task, "write tests");
        }
        other => panic!("unexpected event {other:?}"),
    }

    handle.load_agents();
    match next_event(&handle) {
        EngineEvent::AgentsLoaded(result) => assert!(result.unwrap().contains_key("Cursor")),
        other => panic!("unexpected event {other:?}"),
    }

    assert_eq!(
        *backend.calls.lock().unwrap(),
        vec![
            "analyze a.jpg what?".to_string(),
            "recommend write tests".to_string(),
            "agents".to_string(),
        ]
    );
}

#[test]
fn try_recv_is_empty_without_commands() {
    let handle = EngineHandle::with_backend(Arc::new(StubBackend::default())).expect("engine");
    assert!(handle.try_recv().is_none());

    handle.check_health();
    assert!(matches!(
        next_event(&handle),
        EngineEvent::HealthChecked(Ok(_))
    ));
}
