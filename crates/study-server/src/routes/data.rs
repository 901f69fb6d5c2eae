use axum::Json;

/// GET /api/data: smoke endpoint the frontend calls on load.
pub async fn get_data() -> Json<serde_json::Value> {
    tracing::debug!("backend accessed");
    Json(serde_json::json!({
        "message": "Hello from the Study Buddy backend!",
    }))
}
