use std::sync::Arc;
use std::time::Duration;

use askpanel_engine::{
    AgentInfo, AgentMatch, Backend, BackendSettings, FailureKind, ImageUpload, RecommendationSet,
    ReqwestBackend,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{body_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(server: &MockServer) -> ReqwestBackend {
    let settings = BackendSettings {
        image_qa_url: server.uri(),
        recommender_url: server.uri(),
        ..BackendSettings::default()
    };
    ReqwestBackend::new(settings).expect("client")
}

fn png() -> ImageUpload {
    ImageUpload {
        file_name: "cat.png".to_string(),
        content_type: "image/png".to_string(),
        // Multipart body matchers need a UTF-8 body.
        bytes: Arc::from(&b"PNGdata"[..]),
    }
}

fn copilot_info() -> serde_json::Value {
    json!({
        "languages": ["Python", "JavaScript", "TypeScript", "Go", "Ruby"],
        "strengths": ["autocomplete", "frontend", "test writing", "VS Code integration"],
        "weaknesses": ["not great with big architectural planning"],
        "ideal_tasks": ["build React UI", "add unit tests", "auto-complete"],
        "requires_setup": true,
        "offline_support": false
    })
}

#[tokio::test]
async fn analyze_uploads_image_part_and_question_query() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .and(query_param("question", "What is in the picture?"))
        .and(body_string_contains("name=\"image\""))
        .and(body_string_contains("filename=\"cat.png\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "answer": "A cat sitting on a mat.",
            "question": "What is in the picture?"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = backend_for(&server)
        .analyze_image(&png(), "What is in the picture?")
        .await
        .expect("analyze ok");

    assert_eq!(reply.answer, "A cat sitting on a mat.");
    assert_eq!(reply.question.as_deref(), Some("What is in the picture?"));
}

#[tokio::test]
async fn analyze_success_false_is_a_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "success": false, "error": "quota exceeded" })),
        )
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .analyze_image(&png(), "q")
        .await
        .unwrap_err();

    assert!(err.is_rejection());
    assert_eq!(err.backend_message.as_deref(), Some("quota exceeded"));
}

#[tokio::test]
async fn analyze_server_error_carries_payload_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(json!({ "success": false, "error": "invalid api key" })),
        )
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .analyze_image(&png(), "q")
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(500));
    assert_eq!(err.backend_message.as_deref(), Some("invalid api key"));
}

#[tokio::test]
async fn analyze_success_without_answer_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .analyze_image(&png(), "q")
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::MalformedResponse);
}

#[tokio::test]
async fn recommend_posts_task_json_and_decodes_ranking() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/recommend"))
        .and(body_json(json!({ "task": "build react ui" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "task": "build react ui",
            "recommendations": [
                {
                    "name": "Copilot",
                    "score": 2,
                    "explanation": ["✅ Matches strength: frontend"],
                    "agent_info": copilot_info()
                }
            ],
            "total_agents": 7
        })))
        .expect(1)
        .mount(&server)
        .await;

    let set = backend_for(&server)
        .recommend("build react ui")
        .await
        .expect("recommend ok");

    assert_eq!(
        set,
        RecommendationSet {
            task: "build react ui".to_string(),
            recommendations: vec![AgentMatch {
                name: "Copilot".to_string(),
                score: 2,
                explanation: vec!["✅ Matches strength: frontend".to_string()],
                agent_info: AgentInfo {
                    languages: vec![
                        "Python".into(),
                        "JavaScript".into(),
                        "TypeScript".into(),
                        "Go".into(),
                        "Ruby".into()
                    ],
                    strengths: vec![
                        "autocomplete".into(),
                        "frontend".into(),
                        "test writing".into(),
                        "VS Code integration".into()
                    ],
                    weaknesses: vec!["not great with big architectural planning".into()],
                    ideal_tasks: vec![
                        "build React UI".into(),
                        "add unit tests".into(),
                        "auto-complete".into()
                    ],
                    requires_setup: true,
                    offline_support: false,
                },
            }],
            total_agents: 7,
        }
    );
}

#[tokio::test]
async fn recommend_bad_request_surfaces_error_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/recommend"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "error": "Task description is required." })),
        )
        .mount(&server)
        .await;

    let err = backend_for(&server).recommend("").await.unwrap_err();

    assert_eq!(err.kind, FailureKind::HttpStatus(400));
    assert_eq!(
        err.backend_message.as_deref(),
        Some("Task description is required.")
    );
}

#[tokio::test]
async fn recommend_html_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/recommend"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .mount(&server)
        .await;

    let err = backend_for(&server).recommend("x").await.unwrap_err();

    assert_eq!(err.kind, FailureKind::MalformedResponse);
    assert_eq!(err.backend_message, None);
}

#[tokio::test]
async fn list_agents_decodes_directory() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/agents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "agents": {
                "Copilot": copilot_info(),
                "Replit": {
                    "languages": ["Python"],
                    "strengths": ["education"],
                    "weaknesses": [],
                    "ideal_tasks": ["learn coding"],
                    "requires_setup": false,
                    "offline_support": true
                }
            }
        })))
        .mount(&server)
        .await;

    let agents = backend_for(&server).list_agents().await.expect("agents");

    assert_eq!(
        agents.keys().cloned().collect::<Vec<_>>(),
        vec!["Copilot".to_string(), "Replit".to_string()]
    );
    assert!(agents["Replit"].offline_support);
}

#[tokio::test]
async fn health_reads_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "healthy",
            "message": "AI Coding Agent Recommendation System API",
            "endpoints": ["/recommend", "/agents"]
        })))
        .mount(&server)
        .await;

    let report = backend_for(&server).health().await.expect("health");

    assert_eq!(report.status, "healthy");
    assert_eq!(report.endpoints.len(), 2);
}

#[tokio::test]
async fn slow_backend_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/agents"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({ "agents": {} })),
        )
        .mount(&server)
        .await;

    let settings = BackendSettings {
        recommender_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..BackendSettings::default()
    };
    let err = ReqwestBackend::new(settings)
        .unwrap()
        .list_agents()
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/agents"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "application/json")
                .set_body_string("{\"agents\": {}}    "),
        )
        .mount(&server)
        .await;

    let settings = BackendSettings {
        recommender_url: server.uri(),
        max_response_bytes: 8,
        ..BackendSettings::default()
    };
    let err = ReqwestBackend::new(settings)
        .unwrap()
        .list_agents()
        .await
        .unwrap_err();

    assert!(matches!(err.kind, FailureKind::TooLarge { max_bytes: 8, .. }));
}

/// Answers one request with a chunked body and no Content-Length, so the size
/// limit can only be enforced while streaming.
async fn spawn_chunked_server(chunks: &'static [&'static str]) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let Ok((mut socket, _)) = listener.accept().await else {
            return;
        };
        let mut request = vec![0u8; 4096];
        let _ = socket.read(&mut request).await;

        let mut response = String::from(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\
             Transfer-Encoding: chunked\r\nConnection: close\r\n\r\n",
        );
        for chunk in chunks {
            response.push_str(&format!("{:x}\r\n{}\r\n", chunk.len(), chunk));
        }
        response.push_str("0\r\n\r\n");
        let _ = socket.write_all(response.as_bytes()).await;
        let _ = socket.shutdown().await;
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn streamed_body_over_the_limit_is_rejected() {
    let url = spawn_chunked_server(&["{\"agents\":", " {}}", "    "]).await;
    let settings = BackendSettings {
        recommender_url: url,
        max_response_bytes: 12,
        ..BackendSettings::default()
    };

    let err = ReqwestBackend::new(settings)
        .unwrap()
        .list_agents()
        .await
        .unwrap_err();

    assert!(matches!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 12,
            actual: Some(actual)
        } if actual > 12
    ));
}

#[tokio::test]
async fn streamed_body_within_the_limit_decodes() {
    let url = spawn_chunked_server(&["{\"agents\":", " {}}"]).await;
    let settings = BackendSettings {
        recommender_url: url,
        max_response_bytes: 14,
        ..BackendSettings::default()
    };

    let agents = ReqwestBackend::new(settings)
        .unwrap()
        .list_agents()
        .await
        .unwrap();

    assert!(agents.is_empty());
}

#[tokio::test]
async fn unreachable_backend_is_a_network_failure() {
    // Nothing listens on the discard port locally.
    let settings = BackendSettings {
        recommender_url: "http://127.0.0.1:9".to_string(),
        connect_timeout: Duration::from_secs(2),
        ..BackendSettings::default()
    };
    let err = ReqwestBackend::new(settings)
        .unwrap()
        .recommend("x")
        .await
        .unwrap_err();

    assert!(matches!(err.kind, FailureKind::Network | FailureKind::Timeout));
    assert_eq!(err.backend_message, None);
}
