//! HTTP surface tests: the real router served on an ephemeral port.

use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::{json, Value};
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use corvus_backend::core::config::AppConfig;
use corvus_backend::server::router::router;
use corvus_backend::state::AppState;

async fn serve(backend_url: &str, memory_dir: &std::path::Path) -> SocketAddr {
    let config = AppConfig {
        backend_base_url: backend_url.to_string(),
        memory_path: memory_dir.join("conversation_memory.json"),
        log_dir: memory_dir.join("logs"),
        ..AppConfig::default()
    };
    let state: Arc<AppState> = AppState::with_config(config).await.unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    addr
}

#[tokio::test]
async fn chat_endpoint_answers_instant_math() {
    let dir = tempfile::tempdir().unwrap();
    let addr = serve("http://127.0.0.1:9", dir.path()).await;

    let client = reqwest::Client::new();
    let body: Value = client
        .post(format!("http://{addr}/api/chat"))
        .json(&json!({"message": "7+4"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(body["response"].as_str().unwrap().contains("11"));
    assert_eq!(body["metadata"]["path"], "instant_math");
    assert_eq!(body["sources"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn empty_message_is_rejected_with_400() {
    let dir = tempfile::tempdir().unwrap();
    let addr = serve("http://127.0.0.1:9", dir.path()).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{addr}/api/chat"))
        .json(&json!({"message": "   "}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
}

#[tokio::test]
async fn ingestion_grows_the_index_and_stats_reflect_it() {
    let dir = tempfile::tempdir().unwrap();
    let addr = serve("http://127.0.0.1:9", dir.path()).await;
    let client = reqwest::Client::new();

    let before: Value = client
        .get(format!("http://{addr}/api/chatbot/stats"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let seeded = before["documents_count"].as_u64().unwrap();
    assert!(before["embeddings_loaded"].as_bool().unwrap());

    let added: Value = client
        .post(format!("http://{addr}/api/documents"))
        .json(&json!({
            "text": "Photosynthesis converts light into chemical energy.",
            "filename": "Photosynthesis.txt",
            "source_label": "uploaded_document"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(added["chunks_added"], 1);

    let after: Value = client
        .get(format!("http://{addr}/api/chatbot/stats"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(after["documents_count"].as_u64().unwrap(), seeded + 1);
}

#[tokio::test]
async fn empty_document_text_adds_zero_chunks_without_error() {
    let dir = tempfile::tempdir().unwrap();
    let addr = serve("http://127.0.0.1:9", dir.path()).await;

    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{addr}/api/documents"))
        .json(&json!({"text": "", "filename": "Empty.txt"}))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["chunks_added"], 0);
}

#[tokio::test]
async fn health_reports_degraded_when_the_backend_is_down() {
    let dir = tempfile::tempdir().unwrap();
    let addr = serve("http://127.0.0.1:9", dir.path()).await;

    let client = reqwest::Client::new();
    let body: Value = client
        .get(format!("http://{addr}/api/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "degraded");
    assert_eq!(body["generation"]["status"], "connection_error");
    assert!(body["documents_loaded"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn health_reports_healthy_when_the_backend_responds() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "Hello!",
            "eval_count": 2
        })))
        .mount(&backend)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let addr = serve(&backend.uri(), dir.path()).await;

    let client = reqwest::Client::new();
    let body: Value = client
        .get(format!("http://{addr}/api/health"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["generation"]["status"], "healthy");
    assert!(body["generation"]["response_time"].is_number());
}
