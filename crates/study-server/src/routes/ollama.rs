use axum::extract::State;
use axum::Json;
use ollama_agent::OllamaError;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/ollama/status: live reachability probe, never cached.
pub async fn get_status(State(app): State<AppState>) -> Json<serde_json::Value> {
    let running = app.ollama.is_running().await;
    Json(serde_json::json!({ "running": running }))
}

/// GET /api/ollama/models: installed model names.
///
/// 503 when the daemon does not answer the probe; 500 when it answers but
/// the listing cannot be fetched or parsed.
pub async fn list_models(State(app): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    if !app.ollama.is_running().await {
        return Err(OllamaError::Unavailable(app.ollama.base_url().to_string()).into());
    }
    let models = app.ollama.list_models().await?;
    Ok(Json(serde_json::json!({ "models": models })))
}
