use std::collections::HashSet;
use std::time::Duration;

use axum::http::StatusCode;
use http_body_util::BodyExt;
use ollama_agent::{DaemonSupervisor, OllamaClient};
use study_core::topic::{TopicStore, DEFAULT_TOPICS};
use study_server::AppState;
use tempfile::TempDir;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A URL on which nothing is listening.
fn dead_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

/// Fresh data directory with the default topics, talking to Ollama at `url`.
fn app_state(dir: &TempDir, ollama_url: &str) -> AppState {
    let topics = TopicStore::new(dir.path().join("data"));
    topics.ensure_default_topics(DEFAULT_TOPICS).unwrap();
    let client = OllamaClient::new(ollama_url, Duration::from_secs(2)).unwrap();
    AppState::new(topics, DaemonSupervisor::new(client, "/nonexistent/ollama-binary"))
}

/// Send a GET request via `oneshot` and return (status, parsed JSON body).
async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let req = axum::http::Request::builder()
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

async fn mock_tags(server: &mut mockito::Server, status: usize, body: &str) -> mockito::Mock {
    server
        .mock("GET", "/api/tags")
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

// ---------------------------------------------------------------------------
// Smoke
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_data_returns_message() {
    let dir = TempDir::new().unwrap();
    let app = study_server::build_router(app_state(&dir, &dead_url()));
    let (status, json) = get(app, "/api/data").await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["message"].as_str().unwrap().contains("Study Buddy"));
}

#[tokio::test]
async fn cors_mirrors_origin_with_credentials() {
    let dir = TempDir::new().unwrap();
    let app = study_server::build_router(app_state(&dir, &dead_url()));
    let req = axum::http::Request::builder()
        .method("OPTIONS")
        .uri("/api/topics")
        .header("origin", "http://localhost:8080")
        .header("access-control-request-method", "GET")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(req).await.unwrap();

    let headers = response.headers();
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        "http://localhost:8080"
    );
    assert_eq!(
        headers.get("access-control-allow-credentials").unwrap(),
        "true"
    );
}

// ---------------------------------------------------------------------------
// Topics
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fresh_store_lists_default_topics() {
    let dir = TempDir::new().unwrap();
    let app = study_server::build_router(app_state(&dir, &dead_url()));
    let (status, json) = get(app, "/api/topics").await;

    assert_eq!(status, StatusCode::OK);
    let listed: HashSet<String> = json["topics"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    let expected: HashSet<String> = DEFAULT_TOPICS.iter().map(|s| s.to_string()).collect();
    assert_eq!(listed, expected);
}

#[tokio::test]
async fn get_general_topic_returns_greeting() {
    let dir = TempDir::new().unwrap();
    let app = study_server::build_router(app_state(&dir, &dead_url()));
    let (status, json) = get(app, "/api/topics/General").await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["content"].as_str().unwrap().contains("General Chat"));
}

#[tokio::test]
async fn topic_with_space_is_url_decoded() {
    let dir = TempDir::new().unwrap();
    let state = app_state(&dir, &dead_url());
    std::fs::write(dir.path().join("data/Linear Algebra.md"), "# Linear Algebra").unwrap();

    let (status, json) = get(
        study_server::build_router(state),
        "/api/topics/Linear%20Algebra",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["content"], "# Linear Algebra");
}

#[tokio::test]
async fn unknown_topic_returns_404_without_side_effects() {
    let dir = TempDir::new().unwrap();
    let state = app_state(&dir, &dead_url());
    let before: HashSet<String> = state.topics.list_topics().unwrap().into_iter().collect();

    let (status, json) = get(study_server::build_router(state.clone()), "/api/topics/Chemistry").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["detail"].as_str().unwrap().contains("Chemistry"));

    let after: HashSet<String> = state.topics.list_topics().unwrap().into_iter().collect();
    assert_eq!(before, after);
}

#[tokio::test]
async fn traversal_topic_name_is_rejected() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("secret.md"), "do not serve").unwrap();
    let app = study_server::build_router(app_state(&dir, &dead_url()));

    let (status, json) = get(app, "/api/topics/..%2Fsecret").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["detail"].is_string());
}

#[tokio::test]
async fn topics_added_on_disk_are_listed_without_restart() {
    let dir = TempDir::new().unwrap();
    let state = app_state(&dir, &dead_url());
    std::fs::write(dir.path().join("data/Physics.md"), "# Physics").unwrap();
    std::fs::remove_file(dir.path().join("data/History.md")).unwrap();

    let (_, json) = get(study_server::build_router(state), "/api/topics").await;
    let listed: Vec<&str> = json["topics"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert!(listed.contains(&"Physics"));
    assert!(!listed.contains(&"History"));
}

#[tokio::test]
async fn every_listed_topic_is_served() {
    let dir = TempDir::new().unwrap();
    let state = app_state(&dir, &dead_url());
    for file in ["Chapter 1.5.md", "Geschichte-Ü.md", ".hidden.md"] {
        std::fs::write(dir.path().join("data").join(file), "notes").unwrap();
    }

    let (_, json) = get(study_server::build_router(state.clone()), "/api/topics").await;
    let listed: Vec<String> = json["topics"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    assert_eq!(listed.len(), DEFAULT_TOPICS.len() + 2);

    for name in &listed {
        let mut url = reqwest::Url::parse("http://localhost/api/topics").unwrap();
        url.path_segments_mut().unwrap().push(name);
        let (status, json) = get(study_server::build_router(state.clone()), url.path()).await;
        assert_eq!(status, StatusCode::OK, "listed topic {name}: {json}");
    }
}

#[tokio::test]
async fn missing_data_dir_lists_empty() {
    let dir = TempDir::new().unwrap();
    let client = OllamaClient::new(&dead_url(), Duration::from_secs(2)).unwrap();
    let state = AppState::new(
        TopicStore::new(dir.path().join("never-created")),
        DaemonSupervisor::new(client, "ollama"),
    );

    let (status, json) = get(study_server::build_router(state), "/api/topics").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["topics"], serde_json::json!([]));
}

// ---------------------------------------------------------------------------
// Ollama
// ---------------------------------------------------------------------------

#[tokio::test]
async fn status_false_when_daemon_down() {
    let dir = TempDir::new().unwrap();
    let app = study_server::build_router(app_state(&dir, &dead_url()));
    let (status, json) = get(app, "/api/ollama/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["running"], false);
}

#[tokio::test]
async fn status_true_when_daemon_answers() {
    let mut server = mockito::Server::new_async().await;
    let _mock = mock_tags(&mut server, 200, r#"{"models":[]}"#).await;

    let dir = TempDir::new().unwrap();
    let app = study_server::build_router(app_state(&dir, &server.url()));
    let (status, json) = get(app, "/api/ollama/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["running"], true);
}

#[tokio::test]
async fn models_503_when_daemon_down() {
    let dir = TempDir::new().unwrap();
    let app = study_server::build_router(app_state(&dir, &dead_url()));
    let (status, json) = get(app, "/api/ollama/models").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(json["detail"].as_str().unwrap().contains("not running"));
}

#[tokio::test]
async fn models_listed_in_daemon_order() {
    let mut server = mockito::Server::new_async().await;
    let _mock = mock_tags(
        &mut server,
        200,
        r#"{"models":[{"name":"llama3"},{"name":"mistral"}]}"#,
    )
    .await;

    let dir = TempDir::new().unwrap();
    let app = study_server::build_router(app_state(&dir, &server.url()));
    let (status, json) = get(app, "/api/ollama/models").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["models"], serde_json::json!(["llama3", "mistral"]));
}

#[tokio::test]
async fn models_malformed_json_is_500() {
    let mut server = mockito::Server::new_async().await;
    let _mock = mock_tags(&mut server, 200, "{\"models\": [oops").await;

    let dir = TempDir::new().unwrap();
    let app = study_server::build_router(app_state(&dir, &server.url()));
    let (status, json) = get(app, "/api/ollama/models").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(json["detail"].is_string());
}

#[tokio::test]
async fn models_recover_once_daemon_starts() {
    // Reserve a port, leave it unbound for the first request, then start a
    // fake daemon on it.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let dir = TempDir::new().unwrap();
    let state = app_state(&dir, &format!("http://{addr}"));

    let (status, _) = get(study_server::build_router(state.clone()), "/api/ollama/models").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    let fake = axum::Router::new().route(
        "/api/tags",
        axum::routing::get(|| async {
            axum::Json(serde_json::json!({ "models": [{ "name": "llama3" }] }))
        }),
    );
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    tokio::spawn(async move {
        axum::serve(listener, fake).await.unwrap();
    });

    let (status, json) = get(study_server::build_router(state), "/api/ollama/models").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["models"], serde_json::json!(["llama3"]));
}

// ---------------------------------------------------------------------------
// Live servers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn serve_api_answers_until_shutdown() {
    let dir = TempDir::new().unwrap();
    let state = app_state(&dir, &dead_url());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    let server = tokio::spawn(study_server::serve_api(listener, state, async move {
        let _ = rx.await;
    }));

    let url = format!("http://127.0.0.1:{port}/api/data");
    study_server::readiness::wait_until_ready(
        &url,
        Duration::from_secs(5),
        study_server::readiness::DEFAULT_POLL_INTERVAL,
    )
    .await
    .unwrap();

    let body: serde_json::Value = reqwest::get(&url).await.unwrap().json().await.unwrap();
    assert!(body["message"].is_string());

    tx.send(()).unwrap();
    server.await.unwrap().unwrap();
}
