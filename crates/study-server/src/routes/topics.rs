use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/topics: names of every topic in the store.
///
/// A store that cannot be read is reported as empty rather than an error.
pub async fn list_topics(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    let store = app.topics.clone();
    let topics = tokio::task::spawn_blocking(move || store.list_topics())
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))?
        .unwrap_or_else(|e| {
            tracing::warn!("failed to list topics: {e}");
            Vec::new()
        });

    Ok(Json(serde_json::json!({ "topics": topics })))
}

/// GET /api/topics/{name}: raw markdown content of one topic.
pub async fn get_topic(
    State(app): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let store = app.topics.clone();
    let content = tokio::task::spawn_blocking(move || store.read_topic(&name))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!({ "content": content })))
}
